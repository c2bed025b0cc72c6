use image::imageops::FilterType;

use crate::{
    assets::decode::StaticImage,
    foundation::{
        core::{Rect, Rgba8Premul, Size},
        math::{mul_div255_u8, unit_to_u8},
    },
    render::surface::Surface,
    timeline::{controller::FrameState, phase::Phase},
};

/// Source-over blend of `src` onto `dst`, with `src` further scaled by `opacity`.
pub fn over(dst: Rgba8Premul, src: Rgba8Premul, opacity: f32) -> Rgba8Premul {
    let op = u16::from(unit_to_u8(opacity));
    if op == 0 || src.a == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src.a), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let ch = |s: u8, d: u8| {
        mul_div255_u8(u16::from(s), op).saturating_add(mul_div255_u8(u16::from(d), inv))
    };
    Rgba8Premul {
        r: ch(src.r, dst.r),
        g: ch(src.g, dst.g),
        b: ch(src.b, dst.b),
        a: sa.saturating_add(mul_div255_u8(u16::from(dst.a), inv)),
    }
}

/// Aspect-fit placement of an `image`-sized box inside `surface`.
///
/// Uses the uniform scale `min(sw / iw, sh / ih)`, so the image never crops and never stretches,
/// and centers the result on both axes. Degenerate sizes yield [`Rect::ZERO`].
pub fn fit_rect(surface: Size, image: Size) -> Rect {
    if image.width <= 0.0 || image.height <= 0.0 || surface.is_zero_area() {
        return Rect::ZERO;
    }
    let scale = (surface.width / image.width).min(surface.height / image.height);
    let w = image.width * scale;
    let h = image.height * scale;
    let x = (surface.width - w) / 2.0;
    let y = (surface.height - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}

/// Paints [`FrameState`]s: a white layer at window opacity, then the aspect-fit image.
///
/// The compositor only reads the state it is given. Its one piece of mutable state is a cache of
/// the image rescaled for the last surface size, so steady-state frames only blend.
#[derive(Debug)]
pub struct Compositor {
    image: StaticImage,
    fitted: Option<FittedImage>,
}

#[derive(Debug)]
struct FittedImage {
    surface_size: (u32, u32),
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rgba8_premul: Vec<u8>,
}

impl Compositor {
    /// Create a compositor for the overlay image.
    pub fn new(image: StaticImage) -> Self {
        Self {
            image,
            fitted: None,
        }
    }

    /// Paint `state` into `surface`, replacing its previous contents.
    ///
    /// - `Waiting` clears to fully transparent so nothing is visible before the flash.
    /// - Otherwise the surface becomes white at `window_opacity`.
    /// - Outside `Flash`, a positive `image_opacity` blends the centered, aspect-fit image on top.
    pub fn render(&mut self, surface: &mut Surface, state: &FrameState) {
        if state.phase == Phase::Waiting {
            surface.fill(Rgba8Premul::transparent());
            return;
        }

        surface.fill(Rgba8Premul::white(state.window_opacity));

        if state.phase == Phase::Flash || state.image_opacity <= 0.0 || surface.is_empty() {
            return;
        }

        if let Some(fitted) = self.fitted_for(surface.width(), surface.height()) {
            blend_fitted(surface, fitted, state.image_opacity);
        }
    }

    fn fitted_for(&mut self, sw: u32, sh: u32) -> Option<&FittedImage> {
        let stale = self
            .fitted
            .as_ref()
            .is_none_or(|f| f.surface_size != (sw, sh));
        if stale {
            self.fitted = fit_image(&self.image, sw, sh);
        }
        self.fitted.as_ref()
    }
}

fn fit_image(image: &StaticImage, sw: u32, sh: u32) -> Option<FittedImage> {
    let rect = fit_rect(Size::new(f64::from(sw), f64::from(sh)), image.size()).round();
    let x0 = rect.x0.clamp(0.0, f64::from(sw)) as u32;
    let y0 = rect.y0.clamp(0.0, f64::from(sh)) as u32;
    let x1 = rect.x1.clamp(0.0, f64::from(sw)) as u32;
    let y1 = rect.y1.clamp(0.0, f64::from(sh)) as u32;
    let (width, height) = (x1.saturating_sub(x0), y1.saturating_sub(y0));
    if width == 0 || height == 0 {
        return None;
    }

    let rgba8_premul = if (width, height) == (image.width(), image.height()) {
        image.rgba8_premul().to_vec()
    } else {
        let src = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
            image.width(),
            image.height(),
            image.rgba8_premul(),
        )?;
        // Filtering premultiplied pixels keeps edges free of dark fringes.
        image::imageops::resize(&src, width, height, FilterType::Triangle).into_raw()
    };

    tracing::debug!(sw, sh, x0, y0, width, height, "rescaled overlay image");
    Some(FittedImage {
        surface_size: (sw, sh),
        x: x0,
        y: y0,
        width,
        height,
        rgba8_premul,
    })
}

fn blend_fitted(surface: &mut Surface, fitted: &FittedImage, opacity: f32) {
    let stride = surface.width() as usize * 4;
    let row_len = fitted.width as usize * 4;
    let dst = surface.data_mut();

    for (row, src_row) in fitted.rgba8_premul.chunks_exact(row_len).enumerate() {
        let off = (fitted.y as usize + row) * stride + fitted.x as usize * 4;
        let dst_row = &mut dst[off..off + row_len];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = over(
                Rgba8Premul::from([d[0], d[1], d[2], d[3]]),
                Rgba8Premul::from([s[0], s[1], s[2], s[3]]),
                opacity,
            );
            d.copy_from_slice(&out.to_array());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
