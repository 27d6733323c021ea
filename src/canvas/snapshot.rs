//! Self-contained buffer snapshots: PNG bytes plus data-URI packing.
//!
//! A snapshot is what leaves the drawing surface: the save flow stores it in
//! a memory record's `imageUrl`, the narrative assist receives it inline,
//! and resize uses it to carry pixels across a reallocation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::raster::{PixelBuffer, Rgb};
use crate::{Error, Result};

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// An encoded capture of a pixel buffer.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Snapshot {
    /// Encode the buffer's current contents as PNG.
    pub fn capture(buf: &PixelBuffer) -> Result<Snapshot> {
        let mut png_data = Vec::new();
        let encoder = PngEncoder::new(&mut png_data);
        encoder.write_image(
            buf.as_bytes(),
            buf.width(),
            buf.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(Snapshot {
            width: buf.width(),
            height: buf.height(),
            png_data,
        })
    }

    /// Pack the PNG bytes into a `data:image/png;base64,` URI.
    pub fn to_data_uri(&self) -> String {
        format!("{DATA_URI_PREFIX}{}", BASE64.encode(&self.png_data))
    }

    /// Decode a data URI produced by [`Snapshot::to_data_uri`].
    pub fn from_data_uri(uri: &str) -> Result<Snapshot> {
        let payload = base64_payload(uri)
            .ok_or_else(|| Error::Image("Not a base64 image data URI".into()))?;
        let png_data = BASE64
            .decode(payload)
            .map_err(|e| Error::Image(format!("Invalid base64 payload: {e}")))?;
        let decoded = image::load_from_memory(&png_data)?;
        Ok(Snapshot {
            width: decoded.width(),
            height: decoded.height(),
            png_data,
        })
    }

    /// Decode and composite this snapshot onto `buf` at the origin,
    /// clipped to the buffer's bounds. Pixels outside the snapshot are
    /// left untouched.
    pub fn composite_onto(&self, buf: &mut PixelBuffer) -> Result<()> {
        let decoded = image::load_from_memory(&self.png_data)?.to_rgb8();
        let w = decoded.width().min(buf.width());
        let h = decoded.height().min(buf.height());
        for y in 0..h {
            for x in 0..w {
                let px = decoded.get_pixel(x, y).0;
                buf.set_pixel(x, y, Rgb(px[0], px[1], px[2]));
            }
        }
        Ok(())
    }
}

/// The base64 payload of an image data URI, or `None` when the string is
/// not one (e.g. an external URL stored in `imageUrl`).
pub fn base64_payload(uri: &str) -> Option<&str> {
    let rest = uri.strip_prefix("data:image/")?;
    let (_, payload) = rest.split_once(";base64,")?;
    Some(payload)
}
