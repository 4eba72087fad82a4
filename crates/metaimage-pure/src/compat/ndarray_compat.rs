use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn};

use crate::document::MetaImage;
use crate::error::{Error, Result};
use crate::pixel::{Element, PixelArray};

impl PixelArray {
    /// Copy an `ndarray` array of any dimensionality, in logical row-major order.
    pub fn from_ndarray<T, S, D>(array: &ArrayBase<S, D>) -> Result<Self>
    where
        T: Element,
        S: Data<Elem = T>,
        D: Dimension,
    {
        let shape = array.shape().to_vec();
        let values: Vec<T> = array.iter().copied().collect();
        PixelArray::from_vec(shape, values)
    }

    /// Copy into a dynamic-dimensional `ndarray` array of `T`.
    ///
    /// `T` must match the element type; no numeric conversion is performed.
    pub fn to_ndarray<T: Element>(&self) -> Result<ArrayD<T>> {
        let values = self.as_slice::<T>().ok_or_else(|| {
            Error::UnsupportedElementType(format!(
                "{} requested, array holds {}",
                T::ELEMENT_TYPE,
                self.element_type()
            ))
        })?;
        ArrayD::from_shape_vec(IxDyn(self.shape()), values.to_vec())
            .map_err(|_| Error::InvalidArgument("array shape does not match pixel count"))
    }
}

impl MetaImage {
    /// Wrap an `ndarray` array; see [`MetaImage::from_array`].
    pub fn from_ndarray<T, S, D>(array: &ArrayBase<S, D>, channels: bool) -> Result<Self>
    where
        T: Element,
        S: Data<Elem = T>,
        D: Dimension,
    {
        MetaImage::from_array(PixelArray::from_ndarray(array)?, channels)
    }

    /// Pixel data as an `ndarray` array shaped `(height, width[, depth][, channels])`.
    pub fn to_ndarray<T: Element>(&self) -> Result<ArrayD<T>> {
        self.pixels().to_ndarray()
    }
}
