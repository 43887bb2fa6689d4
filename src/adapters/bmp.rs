//! BMP icon decoder.
//!
//! The phone ships weather icons as uncompressed bitmaps. [`BmpDecoder`]
//! turns them into [`Icon`]s with `tinybmp`; [`encode_bmp24`] writes the
//! same format for the simulator's asset table.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use log::debug;
use tinybmp::Bmp;

use crate::app::ports::IconDecoder;
use crate::error::IngestError;
use crate::weather::Icon;
pub use crate::weather::MAX_ICON_DIM;

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;
const PIXELS_PER_METRE: i32 = 2835;

#[derive(Debug, Clone, Copy, Default)]
pub struct BmpDecoder;

impl IconDecoder for BmpDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Icon, IngestError> {
        let bmp = Bmp::<Rgb888>::from_slice(bytes).map_err(|e| {
            debug!("BMP parse error: {:?}", e);
            IngestError::Decode
        })?;

        let size = bmp.size();
        if size.width == 0 || size.height == 0 || size.width.max(size.height) > MAX_ICON_DIM {
            debug!("BMP rejected: {}x{}", size.width, size.height);
            return Err(IngestError::Decode);
        }

        let width = size.width as usize;
        let mut pixels = vec![Rgb888::BLACK; width * size.height as usize];
        for Pixel(p, color) in bmp.pixels() {
            let (Ok(x), Ok(y)) = (usize::try_from(p.x), usize::try_from(p.y)) else {
                continue;
            };
            if let Some(slot) = pixels.get_mut(y * width + x) {
                *slot = color;
            }
        }
        Icon::new(size, pixels).ok_or(IngestError::Decode)
    }
}

/// Encode an icon as a bottom-up 24-bit BMP.
pub fn encode_bmp24(icon: &Icon) -> Vec<u8> {
    let Size { width, height } = icon.size();
    let stride = (width as usize * 3).next_multiple_of(4);
    let data_len = stride * height as usize;
    let offset = FILE_HEADER_LEN + INFO_HEADER_LEN;

    let mut out = Vec::with_capacity(offset + data_len);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&((offset + data_len) as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(offset as u32).to_le_bytes());

    out.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&(data_len as u32).to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    for y in (0..height).rev() {
        let row_start = out.len();
        for x in 0..width {
            let c = icon.pixel(x, y).unwrap_or(Rgb888::BLACK);
            out.extend_from_slice(&[c.b(), c.g(), c.r()]);
        }
        out.resize(row_start + stride, 0);
    }
    out
}
