/// A straight-alpha sRGB color, as written in CSS hex notation.
///
/// Serialized as its hex string form (`#rrggbb`, or `#rrggbbaa` when not opaque), which is
/// also how color pickers hand values over.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Rgba8(pub [u8; 4]);

impl Rgba8 {
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.0[3]
    }
    /// Alpha as a `0..=1` float.
    #[must_use]
    pub fn alpha_f32(&self) -> f32 {
        f32::from(self.0[3]) / 255.0
    }
    #[must_use]
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0;
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("expected 3, 4, 6, or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error("invalid hex digit")]
    BadDigit,
}

impl std::str::FromStr for Rgba8 {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingHash)?;
        if !digits.is_ascii() {
            return Err(ColorParseError::BadDigit);
        }
        let nibble = |c: u8| -> Result<u8, ColorParseError> {
            char::from(c)
                .to_digit(16)
                .and_then(|d| u8::try_from(d).ok())
                .ok_or(ColorParseError::BadDigit)
        };
        let bytes = digits.as_bytes();
        let mut out = [0, 0, 0, 255];
        match bytes.len() {
            // Short forms repeat each digit, #abc == #aabbcc
            3 | 4 => {
                for (slot, &c) in out.iter_mut().zip(bytes) {
                    let n = nibble(c)?;
                    *slot = n << 4 | n;
                }
            }
            6 | 8 => {
                for (slot, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
                    *slot = nibble(pair[0])? << 4 | nibble(pair[1])?;
                }
            }
            other => return Err(ColorParseError::BadLength(other)),
        }
        Ok(Self(out))
    }
}

impl std::fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}
impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
