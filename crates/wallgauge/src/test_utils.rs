//! Synthetic image helpers shared by unit tests.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Render a flat rectangle `[x, y, w, h]` of `wall_pix` on a `bg_pix` background.
pub(crate) fn draw_wall_image(
    w: u32,
    h: u32,
    rect: [u32; 4],
    wall_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    let [rx, ry, rw, rh] = rect;
    GrayImage::from_fn(w, h, |x, y| {
        let inside = x >= rx && x < rx + rw && y >= ry && y < ry + rh;
        Luma([if inside { wall_pix } else { bg_pix }])
    })
}

/// Add seeded uniform noise in `[-amplitude, amplitude]`, saturating at 0/255.
pub(crate) fn add_uniform_noise(img: &mut GrayImage, amplitude: u8, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = i16::from(amplitude);
    for p in img.pixels_mut() {
        let v = i16::from(p[0]) + rng.gen_range(-a..=a);
        p[0] = v.clamp(0, 255) as u8;
    }
}

/// Encode as PNG bytes, as an upload would carry them.
pub(crate) fn encode_png(img: &GrayImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(img.clone())
        .write_to(&mut buf, ImageFormat::Png)
        .expect("png encode");
    buf.into_inner()
}
