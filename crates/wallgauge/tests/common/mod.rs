use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};

/// Flat bright wall `[x, y, w, h]` on a darker background.
pub fn wall_image(w: u32, h: u32, rect: [u32; 4]) -> GrayImage {
    let [rx, ry, rw, rh] = rect;
    GrayImage::from_fn(w, h, |x, y| {
        let inside = x >= rx && x < rx + rw && y >= ry && y < ry + rh;
        Luma([if inside { 200 } else { 60 }])
    })
}

pub fn png_bytes(img: &GrayImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(img.clone())
        .write_to(&mut buf, ImageFormat::Png)
        .expect("png encode");
    buf.into_inner()
}
