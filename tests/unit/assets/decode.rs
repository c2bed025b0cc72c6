use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100u8, 50u8, 200u8, 128u8]);

    let img = decode_image(&buf).unwrap();
    assert_eq!(img.width(), 1);
    assert_eq!(img.height(), 1);
    assert_eq!(
        img.rgba8_premul(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn fully_transparent_pixels_drop_color() {
    let buf = png_bytes(2, 1, vec![255, 255, 255, 0, 10, 20, 30, 255]);
    let img = decode_image(&buf).unwrap();
    assert_eq!(img.rgba8_premul(), &[0, 0, 0, 0, 10, 20, 30, 255]);
    assert_eq!(img.size(), Size::new(2.0, 1.0));
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = decode_image(b"definitely not a png").unwrap_err();
    assert!(matches!(err, FlashbangError::Decode(_)), "{err}");
}

#[test]
fn empty_bytes_are_a_missing_resource() {
    let err = decode_image(&[]).unwrap_err();
    assert!(matches!(err, FlashbangError::Media(_)), "{err}");
}

#[test]
fn zero_sized_images_are_rejected() {
    assert!(StaticImage::from_rgba8_premul(0, 4, Vec::new()).is_err());
    assert!(StaticImage::from_rgba8_premul(2, 2, vec![0; 3]).is_err());
    assert!(StaticImage::from_rgba8_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn load_image_reports_missing_file() {
    let err = load_image(Path::new("definitely/not/here.png")).unwrap_err();
    assert!(matches!(err, FlashbangError::Media(_)), "{err}");
}
