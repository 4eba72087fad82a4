#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod compress;
pub mod document;
pub mod element;
pub mod error;
pub mod header;
pub mod pixel;
pub mod value;

#[cfg(feature = "std")]
pub mod file;

#[cfg(any(feature = "array", feature = "image"))]
pub mod compat;

pub use document::{MetaImage, ReadOptions, WriteOptions};
pub use element::ElementType;
pub use error::{Error, Result};
pub use header::Header;
pub use pixel::{PixelArray, PixelData};
pub use value::Value;
