use image::{ColorType, DynamicImage, GrayImage, RgbImage};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid image: {0}")]
    InvalidImage(#[from] image::ImageError),
}

/// A decoded upload, sorted into the channel layouts the screening gate
/// distinguishes. Alpha-bearing and other exotic layouts stay as decoded
/// under `Other`; the gate waves those through.
#[derive(Debug)]
pub enum DecodedImage {
    Gray(GrayImage),
    Rgb(RgbImage),
    Other(DynamicImage),
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        match self {
            DecodedImage::Gray(img) => img.width(),
            DecodedImage::Rgb(img) => img.width(),
            DecodedImage::Other(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            DecodedImage::Gray(img) => img.height(),
            DecodedImage::Rgb(img) => img.height(),
            DecodedImage::Other(img) => img.height(),
        }
    }

    pub fn channel_count(&self) -> u8 {
        match self {
            DecodedImage::Gray(_) => 1,
            DecodedImage::Rgb(_) => 3,
            DecodedImage::Other(img) => img.color().channel_count(),
        }
    }

    /// Three-channel copy for the classifier, which always takes RGB input.
    /// Grayscale is replicated across channels, alpha is dropped.
    pub fn to_rgb8(&self) -> RgbImage {
        match self {
            DecodedImage::Gray(img) => DynamicImage::ImageLuma8(img.clone()).into_rgb8(),
            DecodedImage::Rgb(img) => img.clone(),
            DecodedImage::Other(img) => img.to_rgb8(),
        }
    }
}

/// Decodes raw upload bytes, inferring the format from the content.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, LoadError> {
    let decoded = image::load_from_memory(bytes)?;
    Ok(normalize(decoded))
}

fn normalize(decoded: DynamicImage) -> DecodedImage {
    match decoded.color() {
        ColorType::L8 | ColorType::L16 => DecodedImage::Gray(decoded.into_luma8()),
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => {
            DecodedImage::Rgb(decoded.into_rgb8())
        }
        _ => DecodedImage::Other(decoded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_rgb_png() {
        let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 80, Rgb([10, 20, 30])));
        let decoded = decode(&png_bytes(&src)).unwrap();
        assert!(matches!(decoded, DecodedImage::Rgb(_)));
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
        assert_eq!(decoded.channel_count(), 3);
    }

    #[test]
    fn decodes_grayscale_png() {
        let src = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, Luma([200])));
        let decoded = decode(&png_bytes(&src)).unwrap();
        assert!(matches!(decoded, DecodedImage::Gray(_)));
        assert_eq!(decoded.channel_count(), 1);
    }

    #[test]
    fn alpha_layout_lands_in_other() {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([5, 5, 5, 255])));
        let decoded = decode(&png_bytes(&src)).unwrap();
        assert!(matches!(decoded, DecodedImage::Other(_)));
        assert_eq!(decoded.channel_count(), 4);
    }

    #[test]
    fn garbage_bytes_are_an_invalid_image() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, LoadError::InvalidImage(_)));
    }

    #[test]
    fn gray_replicates_into_rgb_for_the_classifier() {
        let decoded = DecodedImage::Gray(GrayImage::from_pixel(4, 4, Luma([77])));
        let rgb = decoded.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [77, 77, 77]);
    }
}
