//! Image decoder seam.
//!
//! Payloads are decoded once to validate them; the original bytes are kept
//! for the presentation layer.

/// Container format of a decoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
    /// GIF.
    Gif,
    /// WebP.
    WebP,
}

impl ImageFormat {
    /// Maps the `image` crate's format, rejecting containers we do not serve.
    #[must_use]
    pub const fn from_image_crate(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Gif => Some(Self::Gif),
            image::ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    const fn to_image_crate(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Gif => image::ImageFormat::Gif,
            Self::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Image payload accepted by a decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Detected container format.
    pub format: ImageFormat,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Raw bytes as downloaded.
    pub bytes: Vec<u8>,
}

/// Turns downloaded bytes into an image, or rejects them.
pub trait ImageDecoder: Send + Sync {
    /// Returns `None` if `bytes` is not a usable image.
    fn decode(&self, bytes: Vec<u8>) -> Option<EncodedImage>;
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl RasterDecoder {
    /// Detects the container format from the leading bytes.
    #[must_use]
    pub fn guess(bytes: &[u8]) -> Option<ImageFormat> {
        image::guess_format(bytes)
            .ok()
            .and_then(ImageFormat::from_image_crate)
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: Vec<u8>) -> Option<EncodedImage> {
        let format = Self::guess(&bytes)?;
        let decoded = match image::load_from_memory_with_format(&bytes, format.to_image_crate()) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(?format, error = %e, "image payload failed to decode");
                return None;
            }
        };
        Some(EncodedImage {
            format,
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Cursor;

    use super::*;

    fn encode(format: image::ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 3, image::Rgb([200, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_guess_known_formats() {
        // Arrange
        let png = encode(image::ImageFormat::Png);
        let jpeg = encode(image::ImageFormat::Jpeg);
        let gif = encode(image::ImageFormat::Gif);

        // Act & Assert
        assert_eq!(RasterDecoder::guess(&png), Some(ImageFormat::Png));
        assert_eq!(RasterDecoder::guess(&jpeg), Some(ImageFormat::Jpeg));
        assert_eq!(RasterDecoder::guess(&gif), Some(ImageFormat::Gif));
        assert_eq!(RasterDecoder::guess(b"<html>"), None);
    }

    #[test]
    fn test_decode_rejects_non_image() {
        // Arrange
        let body = b"<html>not found</html>".to_vec();

        // Act
        let decoded = RasterDecoder.decode(body);

        // Assert
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        // Arrange
        let mut body = encode(image::ImageFormat::Png);
        body.truncate(16);

        // Act
        let decoded = RasterDecoder.decode(body);

        // Assert
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_decode_reports_dimensions_and_keeps_bytes() {
        // Arrange
        let body = encode(image::ImageFormat::Jpeg);

        // Act
        let decoded = RasterDecoder.decode(body.clone()).unwrap();

        // Assert
        assert_eq!(decoded.format, ImageFormat::Jpeg);
        assert_eq!((decoded.width, decoded.height), (4, 3));
        assert_eq!(decoded.bytes, body);
    }
}
