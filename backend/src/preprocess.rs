use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::ImageFormat;
use ndarray::{Array4, ArrayView4};
use serde::Deserialize;

pub const INPUT_HEIGHT: u32 = 256;
pub const INPUT_WIDTH: u32 = 256;
pub const INPUT_CHANNELS: usize = 3;
/// NHWC, batch of one.
pub const INPUT_SHAPE: [usize; 4] = [1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, INPUT_CHANNELS];

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("no image data received")]
    Empty,
    #[error("unsupported image format {0}; upload a JPEG or PNG")]
    UnsupportedFormat(String),
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Pixel intensity scale fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelScale {
    /// Decoded 0..=255 values, unchanged.
    #[default]
    Raw,
    /// Values divided by 255.
    Unit,
}

impl PixelScale {
    fn factor(self) -> f32 {
        match self {
            PixelScale::Raw => 1.0,
            PixelScale::Unit => 1.0 / 255.0,
        }
    }
}

impl FromStr for PixelScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(PixelScale::Raw),
            "unit" => Ok(PixelScale::Unit),
            other => Err(format!("unknown pixel scale {:?} (expected \"raw\" or \"unit\")", other)),
        }
    }
}

impl fmt::Display for PixelScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelScale::Raw => write!(f, "raw"),
            PixelScale::Unit => write!(f, "unit"),
        }
    }
}

/// Fixed-shape `(1, 256, 256, 3)` RGB input for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Array4<f32>,
}

impl NormalizedTensor {
    pub fn zeros() -> Self {
        Self {
            data: Array4::zeros(shape_tuple()),
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    /// Row-major NHWC values.
    pub fn to_vec(&self) -> Vec<f32> {
        self.view().iter().copied().collect()
    }
}

fn shape_tuple() -> (usize, usize, usize, usize) {
    (INPUT_SHAPE[0], INPUT_SHAPE[1], INPUT_SHAPE[2], INPUT_SHAPE[3])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePreprocessor {
    scale: PixelScale,
}

impl ImagePreprocessor {
    pub fn new(scale: PixelScale) -> Self {
        Self { scale }
    }

    pub fn preprocess(&self, bytes: &[u8]) -> Result<NormalizedTensor, PreprocessError> {
        if bytes.is_empty() {
            return Err(PreprocessError::Empty);
        }

        let format = image::guess_format(bytes)?;
        if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
            return Err(PreprocessError::UnsupportedFormat(format!("{:?}", format)));
        }

        let decoded = image::load_from_memory_with_format(bytes, format)?;
        let rgb = decoded.to_rgb8();
        let resized = imageops::resize(&rgb, INPUT_WIDTH, INPUT_HEIGHT, FilterType::Triangle);

        let factor = self.scale.factor();
        let data = Array4::from_shape_fn(shape_tuple(), |(_, y, x, c)| {
            resized.get_pixel(x as u32, y as u32)[c] as f32 * factor
        });

        Ok(NormalizedTensor { data })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
    use std::io::Cursor;

    pub(crate) fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    pub(crate) fn solid_rgb(width: u32, height: u32, color: [u8; 3], format: ImageFormat) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb(color));
        encode(DynamicImage::ImageRgb8(img), format)
    }

    #[test]
    fn jpeg_300_square_resizes_to_input_shape() {
        let bytes = solid_rgb(300, 300, [40, 160, 60], ImageFormat::Jpeg);
        let tensor = ImagePreprocessor::default().preprocess(&bytes).unwrap();
        assert_eq!(tensor.shape(), &INPUT_SHAPE);
    }

    #[test]
    fn non_square_png_is_resized_not_cropped() {
        let bytes = solid_rgb(400, 120, [1, 2, 3], ImageFormat::Png);
        let tensor = ImagePreprocessor::default().preprocess(&bytes).unwrap();
        assert_eq!(tensor.shape(), &INPUT_SHAPE);
        let view = tensor.view();
        assert_eq!(view[[0, 255, 255, 2]], 3.0);
    }

    #[test]
    fn raw_scale_keeps_decoded_range_in_rgb_order() {
        let bytes = solid_rgb(64, 64, [10, 20, 250], ImageFormat::Png);
        let tensor = ImagePreprocessor::new(PixelScale::Raw).preprocess(&bytes).unwrap();
        let view = tensor.view();
        assert_eq!(view[[0, 0, 0, 0]], 10.0);
        assert_eq!(view[[0, 0, 0, 1]], 20.0);
        assert_eq!(view[[0, 0, 0, 2]], 250.0);
    }

    #[test]
    fn unit_scale_divides_by_255() {
        let bytes = solid_rgb(32, 32, [255, 0, 51], ImageFormat::Png);
        let tensor = ImagePreprocessor::new(PixelScale::Unit).preprocess(&bytes).unwrap();
        let view = tensor.view();
        assert!((view[[0, 10, 10, 0]] - 1.0).abs() < 1e-6);
        assert_eq!(view[[0, 10, 10, 1]], 0.0);
        assert!((view[[0, 10, 10, 2]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let img = ImageBuffer::from_pixel(50, 80, Rgba([9u8, 8, 7, 0]));
        let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);
        let tensor = ImagePreprocessor::default().preprocess(&bytes).unwrap();
        assert_eq!(tensor.shape(), &INPUT_SHAPE);
        assert_eq!(tensor.view()[[0, 5, 5, 0]], 9.0);
    }

    #[test]
    fn same_bytes_same_tensor() {
        let img = ImageBuffer::from_fn(120, 90, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 77]));
        let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg);
        let pre = ImagePreprocessor::default();
        assert_eq!(pre.preprocess(&bytes).unwrap(), pre.preprocess(&bytes).unwrap());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = ImagePreprocessor::default().preprocess(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PreprocessError::Decode(_)));
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let mut bytes = solid_rgb(40, 40, [1, 1, 1], ImageFormat::Png);
        bytes.truncate(40);
        let err = ImagePreprocessor::default().preprocess(&bytes).unwrap_err();
        assert!(matches!(err, PreprocessError::Decode(_)));
    }

    #[test]
    fn other_formats_are_rejected() {
        let bytes = solid_rgb(16, 16, [1, 2, 3], ImageFormat::Bmp);
        let err = ImagePreprocessor::default().preprocess(&bytes).unwrap_err();
        assert!(matches!(err, PreprocessError::UnsupportedFormat(_)));
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = ImagePreprocessor::default().preprocess(&[]).unwrap_err();
        assert!(matches!(err, PreprocessError::Empty));
    }

    #[test]
    fn parses_pixel_scale() {
        assert_eq!("RAW".parse::<PixelScale>().unwrap(), PixelScale::Raw);
        assert_eq!("unit".parse::<PixelScale>().unwrap(), PixelScale::Unit);
        assert!("zscore".parse::<PixelScale>().is_err());
    }
}
