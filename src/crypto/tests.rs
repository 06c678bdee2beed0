use super::*;
use crate::constants::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

// Fixed test keys; never use in production.
fn test_secret(id: &str, fill: u8) -> Secret {
    Secret::new(id, [fill; KEY_SIZE])
}

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let cipher = ChaChaCipher::new();
    let secret = test_secret("k1", 0x42);
    let aad = build_aad("app.mailer.smtp", 1);

    let sealed = cipher
        .encrypt(&secret, b"hello world", &aad)
        .expect("encrypt");

    assert_eq!(sealed.iv.len(), NONCE_SIZE);
    assert_eq!(sealed.tag.len(), TAG_SIZE);
    assert_eq!(sealed.ciphertext.len(), b"hello world".len());
    assert_ne!(sealed.ciphertext.as_slice(), b"hello world");

    let plaintext = cipher
        .decrypt(&secret, &sealed.ciphertext, &sealed.iv, &sealed.tag, &aad)
        .expect("decrypt");
    assert_eq!(plaintext, b"hello world");
}

#[test]
fn test_fresh_nonce_per_encryption() {
    let cipher = ChaChaCipher::new();
    let secret = test_secret("k1", 0x42);

    let a = cipher.encrypt(&secret, b"same", b"aad").unwrap();
    let b = cipher.encrypt(&secret, b"same", b"aad").unwrap();

    assert_ne!(a.iv, b.iv);
    assert_ne!(a.ciphertext, b.ciphertext);
}

#[test]
fn test_decrypt_with_wrong_key_fails() {
    let cipher = ChaChaCipher::new();
    let sealed = cipher
        .encrypt(&test_secret("v1", 1), b"payload", b"aad")
        .unwrap();

    let result = cipher.decrypt(
        &test_secret("v2", 2),
        &sealed.ciphertext,
        &sealed.iv,
        &sealed.tag,
        b"aad",
    );
    assert_eq!(result, Err(CipherError::AuthenticationFailed));
}

#[test]
fn test_decrypt_with_wrong_aad_fails() {
    let cipher = ChaChaCipher::new();
    let secret = test_secret("k", 7);
    let sealed = cipher
        .encrypt(&secret, b"payload", &build_aad("a", 1))
        .unwrap();

    let result = cipher.decrypt(
        &secret,
        &sealed.ciphertext,
        &sealed.iv,
        &sealed.tag,
        &build_aad("a", 2),
    );
    assert_eq!(result, Err(CipherError::AuthenticationFailed));
}

#[test]
fn test_decrypt_rejects_bad_iv_and_tag_lengths() {
    let cipher = ChaChaCipher::new();
    let secret = test_secret("k", 7);
    let sealed = cipher.encrypt(&secret, b"payload", b"").unwrap();

    assert_eq!(
        cipher.decrypt(&secret, &sealed.ciphertext, &sealed.iv[..4], &sealed.tag, b""),
        Err(CipherError::InvalidNonceLength {
            expected: NONCE_SIZE,
            actual: 4
        })
    );
    assert_eq!(
        cipher.decrypt(&secret, &sealed.ciphertext, &sealed.iv, &sealed.tag[..8], b""),
        Err(CipherError::InvalidTagLength {
            expected: TAG_SIZE,
            actual: 8
        })
    );
}

#[test]
fn test_build_aad_layout() {
    let aad = build_aad("abc", 256);
    assert_eq!(aad, vec![0x00, 0x03, b'a', b'b', b'c', 0x01, 0x00]);
}

#[test]
fn test_build_aad_distinguishes_ref_and_version() {
    assert_ne!(build_aad("ab", 1), build_aad("a", 1));
    assert_ne!(build_aad("a", 1), build_aad("a", 2));
}

#[test]
fn test_secret_from_slice_checks_length() {
    assert!(Secret::from_slice("k", &[0u8; KEY_SIZE]).is_ok());
    assert!(matches!(
        Secret::from_slice("k", &[0u8; 16]),
        Err(SecretError::InvalidKeyMaterial { .. })
    ));
}

#[test]
fn test_secret_debug_redacts_key() {
    let secret = test_secret("mailer-2024", 0xAB);
    let debug = format!("{:?}", secret);

    assert!(debug.contains("mailer-2024"));
    assert!(debug.contains("<redacted>"));
    assert!(!debug.contains("171"));
}

#[test]
fn test_key_ring_resolve() {
    let ring = KeyRing::with_secrets([test_secret("a", 1), test_secret("b", 2)]);

    assert_eq!(ring.len(), 2);
    let resolved = ring.resolve("b").expect("registered");
    assert_eq!(resolved.reference(), "b");
    assert_eq!(resolved.key_bytes(), &[2u8; KEY_SIZE]);

    assert_eq!(
        ring.resolve("missing").unwrap_err(),
        SecretError::UnknownKey {
            key_id: "missing".to_string()
        }
    );
}

#[test]
fn test_key_ring_insert_replaces_and_remove() {
    let ring = KeyRing::new();
    ring.insert(test_secret("a", 1));
    ring.insert(test_secret("a", 9));

    assert_eq!(ring.len(), 1);
    assert_eq!(ring.resolve("a").unwrap().key_bytes(), &[9u8; KEY_SIZE]);

    assert!(ring.remove("a"));
    assert!(!ring.remove("a"));
    assert!(ring.is_empty());
}

#[test]
fn test_key_ring_parse() {
    let spec = format!(
        "v1={}, v2={}",
        BASE64.encode([1u8; KEY_SIZE]),
        BASE64.encode([2u8; KEY_SIZE])
    );
    let ring = KeyRing::parse(&spec).expect("valid spec");

    assert!(ring.contains("v1"));
    assert!(ring.contains("v2"));
    assert_eq!(ring.resolve("v2").unwrap().key_bytes(), &[2u8; KEY_SIZE]);
}

#[test]
fn test_key_ring_parse_errors() {
    assert!(matches!(
        KeyRing::parse("no-separator"),
        Err(SecretError::Malformed { .. })
    ));
    assert!(matches!(
        KeyRing::parse("=abcd"),
        Err(SecretError::Malformed { .. })
    ));
    assert!(matches!(
        KeyRing::parse("v1=not base64!"),
        Err(SecretError::InvalidKeyMaterial { .. })
    ));
    let short = format!("v1={}", BASE64.encode([0u8; 8]));
    assert!(matches!(
        KeyRing::parse(&short),
        Err(SecretError::InvalidKeyMaterial { .. })
    ));
}

#[test]
fn test_key_ring_debug_lists_ids_only() {
    let ring = KeyRing::with_secrets([test_secret("zeta", 1), test_secret("alpha", 2)]);
    let debug = format!("{:?}", ring);
    assert_eq!(debug, r#"KeyRing { key_ids: ["alpha", "zeta"] }"#);
}
