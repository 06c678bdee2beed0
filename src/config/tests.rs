use super::*;
use serial_test::serial;
use std::env;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_tierstore_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("TIERSTORE_CACHE_TTL_SECS");
        env::remove_var("TIERSTORE_CACHE_ERROR_POLICY");
        env::remove_var("TIERSTORE_RUNTIME_CAPACITY");
        env::remove_var("TIERSTORE_USE_CACHE");
    }
}

#[test]
fn test_default_config() {
    let config = StoreConfig::default();

    assert_eq!(config.cache_ttl, Duration::from_secs(3600));
    assert_eq!(config.cache_error_policy, CacheErrorPolicy::Log);
    assert_eq!(config.runtime_capacity, 10_000);
    assert!(config.use_cache);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_tierstore_env();

    let config = StoreConfig::from_env().expect("should parse with defaults");
    assert_eq!(config, StoreConfig::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_tierstore_env();

    let config = with_env_vars(
        &[
            ("TIERSTORE_CACHE_TTL_SECS", "120"),
            ("TIERSTORE_CACHE_ERROR_POLICY", "throw"),
            ("TIERSTORE_RUNTIME_CAPACITY", "64"),
            ("TIERSTORE_USE_CACHE", "off"),
        ],
        StoreConfig::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(config.cache_ttl, Duration::from_secs(120));
    assert_eq!(config.cache_error_policy, CacheErrorPolicy::Throw);
    assert_eq!(config.runtime_capacity, 64);
    assert!(!config.use_cache);
}

#[test]
#[serial]
fn test_from_env_zero_ttl_means_no_expiry() {
    clear_tierstore_env();

    let config = with_env_vars(&[("TIERSTORE_CACHE_TTL_SECS", "0")], StoreConfig::from_env)
        .expect("zero ttl is valid");
    assert!(config.cache_ttl.is_zero());
}

#[test]
#[serial]
fn test_from_env_invalid_number() {
    clear_tierstore_env();

    let result = with_env_vars(
        &[("TIERSTORE_CACHE_TTL_SECS", "soon")],
        StoreConfig::from_env,
    );
    assert!(matches!(
        result,
        Err(ConfigError::InvalidNumber {
            name: "TIERSTORE_CACHE_TTL_SECS",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_from_env_invalid_policy() {
    clear_tierstore_env();

    let result = with_env_vars(
        &[("TIERSTORE_CACHE_ERROR_POLICY", "retry")],
        StoreConfig::from_env,
    );
    match result {
        Err(ConfigError::InvalidPolicy { value }) => assert_eq!(value, "retry"),
        other => panic!("expected InvalidPolicy, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_from_env_invalid_bool() {
    clear_tierstore_env();

    let result = with_env_vars(&[("TIERSTORE_USE_CACHE", "maybe")], StoreConfig::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidBool { .. })));
}

#[test]
#[serial]
fn test_from_env_zero_capacity_rejected() {
    clear_tierstore_env();

    let result = with_env_vars(
        &[("TIERSTORE_RUNTIME_CAPACITY", "0")],
        StoreConfig::from_env,
    );
    assert!(matches!(result, Err(ConfigError::ZeroRuntimeCapacity)));
}

#[test]
fn test_error_messages() {
    let err = ConfigError::InvalidPolicy {
        value: "x".to_string(),
    };
    assert!(err.to_string().contains("throw, log or ignore"));
    assert_eq!(
        ConfigError::ZeroRuntimeCapacity.to_string(),
        "runtime capacity must be at least 1"
    );
}
