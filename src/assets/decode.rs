use std::{path::Path, sync::Arc};

use crate::foundation::{
    core::Size,
    error::{FlashbangError, FlashbangResult},
    math::mul_div255_u8,
};

/// The overlay image: decoded once at startup, immutable afterwards.
#[derive(Clone, Debug)]
pub struct StaticImage {
    width: u32,
    height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    rgba8_premul: Arc<Vec<u8>>,
}

impl StaticImage {
    /// Wrap already-premultiplied RGBA8 pixels. Both dimensions must be at least 1.
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> FlashbangResult<Self> {
        if width == 0 || height == 0 {
            return Err(FlashbangError::decode(format!(
                "image has empty dimensions {width}x{height}"
            )));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(FlashbangError::validation(format!(
                "image data has {} bytes, expected {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Width in pixels (at least 1).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels (at least 1).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a `kurbo` size.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Premultiplied RGBA8 bytes.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

/// Decode an encoded image (PNG, JPEG, ...) from memory.
pub fn decode_image(bytes: &[u8]) -> FlashbangResult<StaticImage> {
    if bytes.is_empty() {
        return Err(FlashbangError::media("image data is missing"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| FlashbangError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);

    StaticImage::from_rgba8_premul(width, height, data)
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> FlashbangResult<StaticImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        FlashbangError::media(format!("read image '{}': {e}", path.display()))
    })?;
    let img = decode_image(&bytes)?;
    tracing::info!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "decoded overlay image"
    );
    Ok(img)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
