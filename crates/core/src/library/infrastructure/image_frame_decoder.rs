use crate::library::domain::frame_decoder::{DecodeError, FrameDecoder};
use crate::shared::frame::Frame;

/// Decodes JPEG/PNG bytes with the pure-Rust `image` crate.
///
/// The format is sniffed from the content, not the file name, so a
/// mislabelled file still decodes and a corrupt one fails cleanly.
pub struct ImageFrameDecoder;

impl ImageFrameDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder for ImageFrameDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, DecodeError> {
        let img = image::load_from_memory(bytes).map_err(|e| DecodeError(e.to_string()))?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Frame::new(rgb.into_raw(), width, height, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(width: u32, height: u32, rgb: [u8; 3], format: image::ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decodes_png() {
        let bytes = encode(20, 10, [50, 100, 200], image::ImageFormat::Png);
        let frame = ImageFrameDecoder::new().decode(&bytes).unwrap();
        assert_eq!((frame.width(), frame.height()), (20, 10));
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.pixel(0, 0), Some([50, 100, 200]));
    }

    #[test]
    fn test_decodes_jpeg() {
        let bytes = encode(16, 16, [128, 128, 128], image::ImageFormat::Jpeg);
        let frame = ImageFrameDecoder::new().decode(&bytes).unwrap();
        assert_eq!((frame.width(), frame.height()), (16, 16));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = ImageFrameDecoder::new().decode(b"definitely not an image");
        assert!(result.is_err());
    }

    #[test]
    fn test_truncated_png_is_decode_error() {
        let bytes = encode(20, 20, [1, 2, 3], image::ImageFormat::Png);
        let result = ImageFrameDecoder::new().decode(&bytes[..bytes.len() / 2]);
        assert!(result.is_err());
    }
}
