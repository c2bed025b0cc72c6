use super::*;
use crate::{
    assets::decode::StaticImage,
    render::composite::Compositor,
    timeline::{controller::FrameState, phase::Phase},
};
use wgpu::{CompositeAlphaMode as M, TextureFormat as F};

fn frame_for(phase: Phase, window_opacity: f32, image_opacity: f32) -> Surface {
    let image = StaticImage::from_rgba8_premul(1, 1, vec![0, 0, 255, 255]).unwrap();
    let mut compositor = Compositor::new(image);
    let mut frame = Surface::new(4, 2);
    compositor.render(
        &mut frame,
        &FrameState {
            phase,
            window_opacity,
            image_opacity,
            finished: false,
        },
    );
    frame
}

#[test]
fn premultiplied_alpha_mode_is_preferred() {
    assert_eq!(
        select_alpha_mode(&[M::Opaque, M::PostMultiplied, M::PreMultiplied]),
        M::PreMultiplied
    );
    assert_eq!(select_alpha_mode(&[M::Opaque, M::PostMultiplied]), M::PostMultiplied);
    assert_eq!(select_alpha_mode(&[M::Opaque, M::Inherit]), M::Inherit);
    assert_eq!(select_alpha_mode(&[M::Opaque]), M::Opaque);
    assert_eq!(select_alpha_mode(&[]), M::Auto);
}

#[test]
fn only_post_multiplied_surfaces_unpremultiply_in_the_blit() {
    assert!(blit_unpremultiplies(M::PostMultiplied));
    for mode in [M::PreMultiplied, M::Inherit, M::Opaque, M::Auto] {
        assert!(!blit_unpremultiplies(mode), "{mode:?}");
    }
}

#[test]
fn unorm_swapchain_formats_are_preferred_over_srgb() {
    assert_eq!(
        select_surface_format(&[F::Bgra8UnormSrgb, F::Bgra8Unorm]),
        Some(F::Bgra8Unorm)
    );
    assert_eq!(
        select_surface_format(&[F::Rgba16Float, F::Rgba8Unorm]),
        Some(F::Rgba8Unorm)
    );
    // sRGB-only surfaces are still usable: the blit renders through a non-sRGB view.
    let format = select_surface_format(&[F::Bgra8UnormSrgb]).unwrap();
    assert_eq!(format.remove_srgb_suffix(), F::Bgra8Unorm);
    assert_eq!(select_surface_format(&[]), None);
}

#[test]
fn frame_texture_takes_surface_bytes_unconverted() {
    assert_eq!(FRAME_TEXTURE_FORMAT, F::Rgba8Unorm);
    assert!(!FRAME_TEXTURE_FORMAT.is_srgb());

    let frame = Surface::new(5, 3);
    let (layout, extent) = frame_upload_layout(&frame);
    assert_eq!(layout.offset, 0);
    assert_eq!(layout.bytes_per_row, Some(5 * 4));
    assert_eq!(layout.rows_per_image, Some(3));
    assert_eq!((extent.width, extent.height, extent.depth_or_array_layers), (5, 3, 1));
    assert_eq!(
        u64::from(layout.bytes_per_row.unwrap()) * u64::from(extent.height),
        frame.data().len() as u64
    );
}

#[test]
fn uploaded_frames_keep_the_alpha_the_compositor_computed() {
    // Waiting must reach the screen as fully transparent, not opaque black.
    let waiting = frame_for(Phase::Waiting, 1.0, 1.0);
    assert!(waiting.data().iter().all(|&b| b == 0));

    // Half-way through the fade-out the margins are half-transparent white.
    let fading = frame_for(Phase::FadeOut, 0.5, 0.5);
    assert_eq!(&fading.data()[0..4], &[128, 128, 128, 128]);
    assert!(fading.data().chunks_exact(4).all(|px| px[3] < 255));

    // Flash is opaque white everywhere.
    let flash = frame_for(Phase::Flash, 1.0, 0.0);
    assert!(flash.data().iter().all(|&b| b == 255));
}
