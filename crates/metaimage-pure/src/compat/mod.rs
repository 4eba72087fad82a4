//! Conversions to and from third-party array and image types.

#[cfg(feature = "array")]
pub mod ndarray_compat;

#[cfg(feature = "image")]
pub mod image_compat;
