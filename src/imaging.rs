use image::DynamicImage;

use crate::helpers::base64_decode;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid base64 string: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Undecodable image data: {0}")]
    Format(#[from] image::ImageError),
}

/// Decode a base64 payload into an RGB image.
///
/// Data-URI inputs (`data:image/png;base64,...`) are recognized and stripped
/// before decoding. The parsed image is always converted to RGB, whatever the
/// source color space.
///
/// # Errors
///
/// Returns an error if the payload is not valid base64, or if the decoded
/// bytes are not in a recognizable image format.
pub fn decode(raw: &str) -> Result<DynamicImage, DecodeError> {
    let encoded = raw.split("base64,").last().unwrap_or(raw);

    let bytes = base64_decode(encoded)?;
    let image = image::load_from_memory(&bytes)?;

    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::base64_encode;
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_base64() -> String {
        let mut bytes = Vec::new();
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255])));
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();

        base64_encode(bytes)
    }

    #[test]
    fn test_decodes_plain_base64() {
        let image = decode(&png_base64()).unwrap();

        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 2);
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_strips_data_uri_prefix() {
        let payload = format!("data:image/png;base64,{}", png_base64());

        assert!(decode(&payload).is_ok());
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let error = decode("definitely not base64!!!").unwrap_err();

        assert!(matches!(error, DecodeError::Base64(_)));
        assert!(error.to_string().starts_with("Invalid base64 string:"));
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        let payload = base64_encode(b"just some text");

        assert!(matches!(decode(&payload), Err(DecodeError::Format(_))));
    }
}
