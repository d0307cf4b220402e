//! Image upload rules for the media store.
//!
//! Uploaded files are stored flat under the media root, keyed by a generated
//! filename. The filename carries the upload time plus a random suffix so
//! that concurrent uploads of identically named files cannot collide, and it
//! preserves the original extension so stored files can be served with a
//! sensible content type.

use crate::error::{Error, Result};
use rand::Rng;
use time::OffsetDateTime;

/// Maximum accepted image payload (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Longest extension carried over from an uploaded filename.
const MAX_EXTENSION_LEN: usize = 8;

/// Check whether a content type names an image format.
///
/// Parameters after a `;` (e.g. `image/svg+xml; charset=utf-8`) are ignored.
pub fn is_image_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("image/") && essence.len() > "image/".len()
}

/// Validate an uploaded image payload against type and size rules.
pub fn validate_image(content_type: &str, size: usize) -> Result<()> {
    if !is_image_content_type(content_type) {
        return Err(Error::UnsupportedImageType(content_type.to_string()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(Error::ImageTooLarge {
            size,
            max: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Extract a safe extension (without the dot) from an uploaded filename.
///
/// Only ASCII alphanumeric extensions survive; anything else is dropped
/// rather than sanitized, since the extension is purely advisory.
pub fn sanitized_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Generate a collision-resistant storage filename for an upload.
///
/// Format: `<unix millis>-<8 hex chars>[.<ext>]`, with the extension taken
/// from the original filename when it passes [`sanitized_extension`].
pub fn unique_filename(
    original_name: Option<&str>,
    uploaded_at: OffsetDateTime,
    rng: &mut impl Rng,
) -> String {
    let millis = uploaded_at.unix_timestamp_nanos() / 1_000_000;
    let suffix: u32 = rng.r#gen();
    match original_name.and_then(sanitized_extension) {
        Some(ext) => format!("{millis}-{suffix:08x}.{ext}"),
        None => format!("{millis}-{suffix:08x}"),
    }
}

/// Content type to serve a stored filename with, inferred from its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
