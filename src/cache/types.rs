/// Tier that served a lookup, in lookup-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Tier 0: process-local memory.
    Runtime,
    /// Tier 1: distributed cache.
    Cache,
    /// Tier 2: durable table.
    Database,
}

impl Tier {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Runtime => "HIT_RUNTIME",
            Tier::Cache => "HIT_CACHE",
            Tier::Database => "HIT_DATABASE",
        }
    }

    /// Tier index (0, 1, 2).
    #[inline]
    pub fn level(&self) -> u8 {
        match self {
            Tier::Runtime => 0,
            Tier::Cache => 1,
            Tier::Database => 2,
        }
    }

    /// `true` when a backend round trip was needed.
    #[inline]
    pub fn is_remote(&self) -> bool {
        !matches!(self, Tier::Runtime)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
