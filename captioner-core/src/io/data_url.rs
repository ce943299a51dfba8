//! `data:` URLs, for carrying binary images inside JSON.
//!
//! Only the base64 form is produced or accepted.

use base64::Engine;

pub const PNG_MIME: &str = "image/png";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a data URL")]
    NotDataUrl,
    #[error("data URL is not base64 encoded")]
    NotBase64,
    #[error("bad base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

/// A decoded data URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[must_use]
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    let prefix = format!("data:{mime};base64,");
    let mut url = String::with_capacity(prefix.len() + bytes.len().div_ceil(3) * 4);
    url.push_str(&prefix);
    base64::engine::general_purpose::STANDARD.encode_string(bytes, &mut url);
    url
}

#[must_use]
pub fn encode_png(bytes: &[u8]) -> String {
    encode(PNG_MIME, bytes)
}

/// Split a data URL into its MIME type and decoded bytes.
pub fn decode(url: &str) -> Result<DataUrl, DataUrlError> {
    let rest = url
        .trim_start()
        .strip_prefix("data:")
        .ok_or(DataUrlError::NotDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(DataUrlError::NotDataUrl)?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or(DataUrlError::NotBase64)?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim_end())?;
    Ok(DataUrl {
        mime: mime.to_owned(),
        bytes,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn png_prefix() {
        assert_eq!(encode_png(b"hi"), "data:image/png;base64,aGk=");
        assert_eq!(encode_png(b""), "data:image/png;base64,");
    }
    #[test]
    fn decodes() {
        let url = decode("data:image/png;base64,aGk=").unwrap();
        assert_eq!(url.mime, PNG_MIME);
        assert_eq!(url.bytes, b"hi");
    }
    #[test]
    fn rejects() {
        assert_eq!(decode("http://x/y.png"), Err(DataUrlError::NotDataUrl));
        assert_eq!(decode("data:image/png;base64"), Err(DataUrlError::NotDataUrl));
        assert_eq!(decode("data:text/plain,hi"), Err(DataUrlError::NotBase64));
        assert!(matches!(
            decode("data:image/png;base64,!!!"),
            Err(DataUrlError::Payload(_))
        ));
    }
}
