//! Checks on user-supplied files, before any decoding is attempted.

/// Largest background image accepted, in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

/// File extensions accepted as fonts.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "woff", "woff2"];

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please upload a PNG image.")]
    NotPng,
    #[error("Image is too large ({}). Max {}.", human(.size), human(.max))]
    TooLarge { size: u64, max: u64 },
    #[error("Unsupported font file. Use {}.", FONT_EXTENSIONS.join(", "))]
    UnsupportedFont,
    #[error("Could not determine a font family name.")]
    NoFamily,
}

// By reference, for use in error formatting.
#[allow(clippy::cast_precision_loss, clippy::trivially_copy_pass_by_ref)]
fn human(bytes: &u64) -> String {
    human_bytes::human_bytes(*bytes as f64)
}

fn extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    (!stem.is_empty() || !ext.is_empty()).then_some(ext)
}

/// Accept a background image by declared MIME type or, failing that, by file name.
pub fn validate_png(
    name: &str,
    mime: Option<&str>,
    size: u64,
    max_bytes: u64,
) -> Result<(), UploadError> {
    let is_png = mime == Some(super::data_url::PNG_MIME)
        || extension(name).is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        return Err(UploadError::NotPng);
    }
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            max: max_bytes,
        });
    }
    Ok(())
}

/// Whether the bytes start with the PNG signature. A renamed JPEG passes [`validate_png`]
/// but fails this.
#[must_use]
pub fn has_png_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(PNG_SIGNATURE)
}

/// Family name guessed from a font file name: extension dropped, runs of `_` and `-`
/// turned into a space.
#[must_use]
pub fn infer_family_name(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    let mut family = String::with_capacity(stem.len());
    let mut in_separator = false;
    for c in stem.chars() {
        if c == '_' || c == '-' {
            if !in_separator {
                family.push(' ');
            }
            in_separator = true;
        } else {
            family.push(c);
            in_separator = false;
        }
    }
    family.trim().to_owned()
}

/// Accept a font file by extension and settle on its family name. A non-blank `family`
/// override wins over the name inferred from the file.
pub fn validate_font(file_name: &str, family: Option<&str>) -> Result<String, UploadError> {
    let supported = extension(file_name).is_some_and(|ext| {
        FONT_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    });
    if !supported {
        return Err(UploadError::UnsupportedFont);
    }
    let family = match family.map(str::trim) {
        Some(family) if !family.is_empty() => family.to_owned(),
        _ => infer_family_name(file_name),
    };
    if family.is_empty() {
        return Err(UploadError::NoFamily);
    }
    Ok(family)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn png_by_mime_or_name() {
        let max = DEFAULT_MAX_UPLOAD_BYTES;
        assert_eq!(validate_png("photo", Some("image/png"), 10, max), Ok(()));
        assert_eq!(validate_png("photo.PNG", None, 10, max), Ok(()));
        assert_eq!(
            validate_png("photo.jpg", Some("image/jpeg"), 10, max),
            Err(UploadError::NotPng)
        );
        assert_eq!(validate_png("png", None, 10, max), Err(UploadError::NotPng));
    }
    #[test]
    fn size_limit() {
        let max = DEFAULT_MAX_UPLOAD_BYTES;
        assert_eq!(validate_png("a.png", None, max, max), Ok(()));
        let err = validate_png("a.png", None, max + 1, max).unwrap_err();
        assert_eq!(
            err,
            UploadError::TooLarge {
                size: max + 1,
                max
            }
        );
        assert!(err.to_string().contains("Max 15"), "{err}");
    }
    #[test]
    fn signature() {
        assert!(has_png_signature(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"));
        assert!(!has_png_signature(b"\xff\xd8\xff\xe0"));
    }
    #[test]
    fn family_names() {
        assert_eq!(infer_family_name("Open_Sans-Bold.ttf"), "Open Sans Bold");
        assert_eq!(infer_family_name("my__font--x.woff2"), "my font x");
        assert_eq!(infer_family_name("_Lobster_.otf"), "Lobster");
        assert_eq!(infer_family_name("NoExtension"), "NoExtension");
    }
    #[test]
    fn fonts() {
        assert_eq!(validate_font("Lobster.TTF", None), Ok("Lobster".to_owned()));
        assert_eq!(
            validate_font("Lobster.ttf", Some("  Fancy ")),
            Ok("Fancy".to_owned())
        );
        assert_eq!(
            validate_font("Lobster.ttf", Some("   ")),
            Ok("Lobster".to_owned())
        );
        assert_eq!(
            validate_font("Lobster.zip", None),
            Err(UploadError::UnsupportedFont)
        );
        assert_eq!(validate_font("__.ttf", None), Err(UploadError::NoFamily));
    }
}
