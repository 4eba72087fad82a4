//! Dense pixel arrays and their sidecar byte representation.
//!
//! MetaImage sidecars store elements little-endian in row-major order
//! (height, width, depth, channel). Conversion goes through `bytemuck` so the
//! payload is copied once into a properly aligned typed buffer.

use alloc::vec;
use alloc::vec::Vec;

use bytemuck::{pod_collect_to_vec, Pod};

use crate::element::ElementType;
use crate::error::{Error, Result};

/// Pixel values of a MetaImage, typed by `ElementType`.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F32(Vec<f32>),
}

mod sealed {
    pub trait Sealed {}
}

/// Rust scalar types that map one-to-one onto a MetaImage element type.
pub trait Element: Pod + sealed::Sealed {
    const ELEMENT_TYPE: ElementType;

    fn wrap(values: Vec<Self>) -> PixelData;

    fn unwrap(data: &PixelData) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($t:ty, $variant:ident, $ety:expr) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const ELEMENT_TYPE: ElementType = $ety;

            fn wrap(values: Vec<Self>) -> PixelData {
                PixelData::$variant(values)
            }

            fn unwrap(data: &PixelData) -> Option<&[Self]> {
                match data {
                    PixelData::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(i8, I8, ElementType::Char);
impl_element!(u8, U8, ElementType::UChar);
impl_element!(i16, I16, ElementType::Short);
impl_element!(u16, U16, ElementType::UShort);
impl_element!(i32, I32, ElementType::Int);
impl_element!(u32, U32, ElementType::UInt);
impl_element!(f32, F32, ElementType::Float);

impl PixelData {
    /// A zero-filled buffer of `len` elements.
    pub fn zeros(element_type: ElementType, len: usize) -> Self {
        match element_type {
            ElementType::Char => PixelData::I8(vec![0; len]),
            ElementType::UChar => PixelData::U8(vec![0; len]),
            ElementType::Short => PixelData::I16(vec![0; len]),
            ElementType::UShort => PixelData::U16(vec![0; len]),
            ElementType::Int => PixelData::I32(vec![0; len]),
            ElementType::UInt => PixelData::U32(vec![0; len]),
            ElementType::Float => PixelData::F32(vec![0.0; len]),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            PixelData::I8(_) => ElementType::Char,
            PixelData::U8(_) => ElementType::UChar,
            PixelData::I16(_) => ElementType::Short,
            PixelData::U16(_) => ElementType::UShort,
            PixelData::I32(_) => ElementType::Int,
            PixelData::U32(_) => ElementType::UInt,
            PixelData::F32(_) => ElementType::Float,
        }
    }

    /// Number of elements (not bytes).
    pub fn len(&self) -> usize {
        match self {
            PixelData::I8(v) => v.len(),
            PixelData::U8(v) => v.len(),
            PixelData::I16(v) => v.len(),
            PixelData::U16(v) => v.len(),
            PixelData::I32(v) => v.len(),
            PixelData::U32(v) => v.len(),
            PixelData::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the values as `T`, or `None` if the element type differs.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::unwrap(self)
    }

    /// Serialize to the little-endian sidecar byte stream.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            PixelData::I8(v) => pod_collect_to_vec(v),
            PixelData::U8(v) => v.clone(),
            PixelData::I16(v) => collect_le(v, |x: i16| x.to_le()),
            PixelData::U16(v) => collect_le(v, |x: u16| x.to_le()),
            PixelData::I32(v) => collect_le(v, |x: i32| x.to_le()),
            PixelData::U32(v) => collect_le(v, |x: u32| x.to_le()),
            PixelData::F32(v) => collect_le(v, |x: f32| f32::from_bits(x.to_bits().to_le())),
        }
    }

    /// Interpret a little-endian byte stream as elements of `element_type`.
    ///
    /// The byte count must be a whole number of elements.
    pub fn from_le_bytes(raw: &[u8], element_type: ElementType) -> Result<Self> {
        check_whole_elements(raw, element_type)?;
        let data = match element_type {
            ElementType::Char => PixelData::I8(pod_collect_to_vec(raw)),
            ElementType::UChar => PixelData::U8(raw.to_vec()),
            ElementType::Short => PixelData::I16(decode_le(raw, i16::from_le)),
            ElementType::UShort => PixelData::U16(decode_le(raw, u16::from_le)),
            ElementType::Int => PixelData::I32(decode_le(raw, i32::from_le)),
            ElementType::UInt => PixelData::U32(decode_le(raw, u32::from_le)),
            ElementType::Float => PixelData::F32(decode_le(raw, f32_from_le)),
        };
        Ok(data)
    }

    /// Legacy float decoding: scale each `f32` by 255 and truncate to `u8`.
    ///
    /// Values outside `[0, 1]` saturate at 0 or 255. This path is lossy and is
    /// only used when explicitly requested by the caller.
    pub fn from_le_f32_rescaled(raw: &[u8]) -> Result<Self> {
        check_whole_elements(raw, ElementType::Float)?;
        let values: Vec<f32> = decode_le(raw, f32_from_le);
        Ok(PixelData::U8(
            values.into_iter().map(|v| (v * 255.0) as u8).collect(),
        ))
    }
}

fn check_whole_elements(raw: &[u8], element_type: ElementType) -> Result<()> {
    let size = element_type.size();
    if raw.len() % size != 0 {
        return Err(Error::ShapeMismatch {
            expected: raw.len() - raw.len() % size,
            actual: raw.len(),
        });
    }
    Ok(())
}

fn f32_from_le(x: f32) -> f32 {
    f32::from_bits(u32::from_le(x.to_bits()))
}

fn collect_le<T: Pod>(values: &[T], to_le: impl Fn(T) -> T) -> Vec<u8> {
    if cfg!(target_endian = "little") {
        return pod_collect_to_vec(values);
    }
    let swapped: Vec<T> = values.iter().map(|&v| to_le(v)).collect();
    pod_collect_to_vec(&swapped)
}

fn decode_le<T: Pod>(raw: &[u8], from_le: impl Fn(T) -> T) -> Vec<T> {
    let mut values: Vec<T> = pod_collect_to_vec(raw);
    if cfg!(target_endian = "big") {
        for v in &mut values {
            *v = from_le(*v);
        }
    }
    values
}

/// Product of the extents in `shape`, or `None` on overflow.
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

/// A dense, row-major pixel array: shape plus typed values.
///
/// Shapes follow the in-memory layout, `(height, width[, depth][, channels])`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelArray {
    shape: Vec<usize>,
    data: PixelData,
}

impl PixelArray {
    /// Pair `data` with `shape`, checking the element count.
    pub fn new(shape: Vec<usize>, data: PixelData) -> Result<Self> {
        if shape.is_empty() || element_count(&shape) != Some(data.len()) {
            return Err(Error::InvalidArgument(
                "pixel count does not match array shape",
            ));
        }
        Ok(PixelArray { shape, data })
    }

    /// Build an array from a typed vector.
    pub fn from_vec<T: Element>(shape: Vec<usize>, values: Vec<T>) -> Result<Self> {
        PixelArray::new(shape, T::wrap(values))
    }

    /// A zero-filled array.
    pub fn zeros(shape: &[usize], element_type: ElementType) -> Self {
        let len = shape.iter().product();
        PixelArray {
            shape: shape.to_vec(),
            data: PixelData::zeros(element_type, len),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn data(&self) -> &PixelData {
        &self.data
    }

    pub fn into_data(self) -> PixelData {
        self.data
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// Borrow the flat row-major values as `T`.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        self.data.as_slice()
    }

    /// Total payload size in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len() * self.element_type().size()
    }
}
