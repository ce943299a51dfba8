//! Utility types, used throughout the crate.

/// A float which is neither NaN nor infinite.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[repr(transparent)]
pub struct FiniteF32(f32);
impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);
    pub fn new(val: f32) -> Result<Self, FiniteF32Error> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(FiniteF32Error::NotFinite)
        }
    }
    /// Take `val` if finite, otherwise `fallback`.
    #[must_use]
    pub fn or(val: f32, fallback: f32) -> f32 {
        Self::new(val).map_or(fallback, Self::get)
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for FiniteF32 {
    type Error = FiniteF32Error;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}
impl std::str::FromStr for FiniteF32 {
    type Err = FiniteF32Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val: f32 = s.trim().parse().map_err(|_| FiniteF32Error::NotANumber)?;
        Self::new(val)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteF32Error {
    #[error("not finite")]
    NotFinite,
    #[error("not a number")]
    NotANumber,
}
