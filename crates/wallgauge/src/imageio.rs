//! Image decoding into 8-bit luminance rasters.

use std::path::Path;

use image::GrayImage;

use crate::error::MeasureError;

/// Decode an encoded image (PNG, JPEG, ...) from memory.
pub fn decode_gray(bytes: &[u8]) -> Result<GrayImage, MeasureError> {
    if bytes.is_empty() {
        return Err(MeasureError::ImageDecode("image data is empty".into()));
    }
    let img = image::load_from_memory(bytes)?;
    non_empty(img.to_luma8())
}

/// Open and decode an image file.
pub fn open_gray(path: &Path) -> Result<GrayImage, MeasureError> {
    let img = image::open(path).map_err(|e| {
        MeasureError::ImageDecode(format!("cannot open image {}: {}", path.display(), e))
    })?;
    non_empty(img.to_luma8())
}

fn non_empty(gray: GrayImage) -> Result<GrayImage, MeasureError> {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return Err(MeasureError::ImageDecode(format!(
            "decoded image has no pixels ({}x{})",
            w, h
        )));
    }
    Ok(gray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_utils::{draw_wall_image, encode_png};

    #[test]
    fn decodes_png_to_luma() {
        let img = draw_wall_image(32, 24, [4, 4, 20, 10], 200, 10);
        let gray = decode_gray(&encode_png(&img)).unwrap();
        assert_eq!(gray.dimensions(), (32, 24));
        assert_eq!(gray, img);
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let err = decode_gray(b"definitely not an image").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImageDecode);
        assert_eq!(decode_gray(&[]).unwrap_err().kind(), ErrorKind::ImageDecode);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = open_gray(Path::new("/nonexistent/front.png")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImageDecode);
        assert!(err.to_string().contains("/nonexistent/front.png"));
    }
}
