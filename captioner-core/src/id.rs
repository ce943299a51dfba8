//! # IDs
//! Every text layer carries a [`LayerID`], unique within its document and stable for the
//! whole lifetime of the layer. Unlike a process-local counter these are persisted
//! alongside the layer and must survive a reload, so they are random (v4) UUIDs.

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LayerID(uuid::Uuid);

impl LayerID {
    /// Generate a fresh random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
    /// Build an ID from a fixed value. Intended for tests and fixtures.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(uuid::Uuid::from_u128(value))
    }
    /// A short prefix of the ID, for human-facing names like "Layer 3f2a".
    #[must_use]
    pub fn short(&self) -> String {
        let mut simple = self.0.simple().to_string();
        simple.truncate(4);
        simple
    }
}
impl Default for LayerID {
    fn default() -> Self {
        Self::new()
    }
}
impl std::fmt::Display for LayerID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
impl std::fmt::Debug for LayerID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LayerID#{}", self.short())
    }
}
impl std::str::FromStr for LayerID {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s.trim()).map(Self)
    }
}
