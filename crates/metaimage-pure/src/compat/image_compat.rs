use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage, RgbaImage};

use crate::document::MetaImage;
use crate::error::{Error, Result};
use crate::pixel::PixelArray;

impl MetaImage {
    /// Convert a 2D 8-bit document to an `image` buffer.
    ///
    /// One channel becomes `Luma8`, three `Rgb8` and four `Rgba8`.
    pub fn to_image(&self) -> Result<DynamicImage> {
        if self.dimensionality() != 2 {
            return Err(Error::InvalidArgument("only 2D images convert to a picture"));
        }
        let values = self.pixels().as_slice::<u8>().ok_or_else(|| {
            Error::UnsupportedElementType(format!(
                "{} cannot be shown as an 8-bit picture",
                self.element_type()
            ))
        })?;
        let width = u32::try_from(self.dimensions()[0])
            .map_err(|_| Error::InvalidArgument("width exceeds u32"))?;
        let height = u32::try_from(self.dimensions()[1])
            .map_err(|_| Error::InvalidArgument("height exceeds u32"))?;
        let buf = values.to_vec();
        let mismatch = || Error::ShapeMismatch {
            expected: width as usize * height as usize * self.channels(),
            actual: values.len(),
        };
        let image = match self.channels() {
            1 => DynamicImage::ImageLuma8(
                GrayImage::from_raw(width, height, buf).ok_or_else(mismatch)?,
            ),
            3 => DynamicImage::ImageRgb8(
                RgbImage::from_raw(width, height, buf).ok_or_else(mismatch)?,
            ),
            4 => DynamicImage::ImageRgba8(
                RgbaImage::from_raw(width, height, buf).ok_or_else(mismatch)?,
            ),
            _ => {
                return Err(Error::InvalidArgument(
                    "picture conversion needs 1, 3 or 4 channels",
                ))
            }
        };
        Ok(image)
    }

    /// Build a document from a decoded picture.
    ///
    /// Grayscale stays single-channel and RGBA keeps its alpha; every other
    /// color type is converted to 8-bit RGB.
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        match image {
            DynamicImage::ImageLuma8(buf) => MetaImage::from_array(
                PixelArray::from_vec(vec![height, width], buf.as_raw().clone())?,
                false,
            ),
            DynamicImage::ImageRgba8(buf) => rgb_like(buf, height, width, 4),
            other => rgb_like(&other.to_rgb8(), height, width, 3),
        }
    }
}

fn rgb_like<P: image::Pixel<Subpixel = u8>>(
    buf: &ImageBuffer<P, Vec<u8>>,
    height: usize,
    width: usize,
    channels: usize,
) -> Result<MetaImage> {
    let pixels = PixelArray::from_vec(vec![height, width, channels], buf.as_raw().clone())?;
    MetaImage::from_array(pixels, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;
    use image::{Luma, Rgb};

    #[test]
    fn grayscale_to_luma() {
        let values: Vec<u8> = (0..6).collect();
        let img =
            MetaImage::from_array(PixelArray::from_vec(vec![2, 3], values).unwrap(), false)
                .unwrap();
        let pic = img.to_image().unwrap().into_luma8();
        assert_eq!((pic.width(), pic.height()), (3, 2));
        assert_eq!(pic.get_pixel(2, 1), &Luma([5]));
    }

    #[test]
    fn rgb_round_trip() {
        let mut pic = RgbImage::new(4, 2);
        pic.put_pixel(3, 1, Rgb([1, 2, 3]));
        let img = MetaImage::from_image(&DynamicImage::ImageRgb8(pic.clone())).unwrap();
        assert_eq!(img.dimensions(), &[4, 2]);
        assert_eq!(img.channels(), 3);
        assert_eq!(img.to_image().unwrap().into_rgb8(), pic);
    }

    #[test]
    fn non_u8_is_rejected() {
        let img =
            MetaImage::from_array(PixelArray::zeros(&[2, 2], ElementType::UShort), false).unwrap();
        assert!(matches!(
            img.to_image(),
            Err(Error::UnsupportedElementType(_))
        ));
    }

    #[test]
    fn volume_is_rejected() {
        let img = MetaImage::from_array(PixelArray::zeros(&[2, 2, 2], ElementType::UChar), false)
            .unwrap();
        assert!(matches!(img.to_image(), Err(Error::InvalidArgument(_))));
    }
}
