//! Still-image decoding: raw bytes to one canonical raster.
//!
//! Decoding sniffs the actual pixel format from the byte stream's magic
//! bytes rather than trusting the extension that routed us here, so a JPEG
//! saved as `.png` decodes fine and random bytes named `.png` fail cleanly.
//! This is a pure format decode: no resizing, no rotation, no color
//! correction beyond the channel-order flattening [`Raster`] performs.

use crate::error::DocrError;
use crate::raster::Raster;
use tracing::debug;

/// Decode image bytes into a single raster.
///
/// Fails with [`DocrError::DecodeFailed`] when no supported codec can parse
/// the bytes, or when the decode produces a zero-size image.
pub fn decode_image(filename: &str, bytes: &[u8]) -> Result<Raster, DocrError> {
    let img = image::load_from_memory(bytes).map_err(|e| DocrError::DecodeFailed {
        filename: filename.to_string(),
        detail: e.to_string(),
    })?;

    let raster = Raster::from_dynamic(&img);
    if raster.is_empty() {
        return Err(DocrError::DecodeFailed {
            filename: filename.to_string(),
            detail: "decoded to an empty image".to_string(),
        });
    }

    debug!(
        filename,
        width = raster.width(),
        height = raster.height(),
        "decoded image"
    );
    Ok(raster)
}
