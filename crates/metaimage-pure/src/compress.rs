//! zlib compression for `.zraw` sidecars.

use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Level used when the caller asks for the default (`-1`).
pub const DEFAULT_LEVEL: u8 = 6;

/// Highest accepted level; matches zlib's range.
pub const MAX_LEVEL: i32 = 9;

/// Map a zlib-style level (`-1` = default, `0..=9`) to a miniz level.
pub fn resolve_level(level: i32) -> Result<u8> {
    match level {
        -1 => Ok(DEFAULT_LEVEL),
        0..=MAX_LEVEL => Ok(level as u8),
        _ => Err(Error::InvalidArgument(
            "compression level must be -1 or within 0..=9",
        )),
    }
}

/// Compress `data` into a zlib stream.
pub fn deflate(data: &[u8], level: i32) -> Result<Vec<u8>> {
    let level = resolve_level(level)?;
    Ok(miniz_oxide::deflate::compress_to_vec_zlib(data, level))
}

/// Decompress a zlib stream, falling back to raw deflate for headerless payloads.
pub fn inflate(compressed: &[u8]) -> Result<Vec<u8>> {
    miniz_oxide::inflate::decompress_to_vec_zlib(compressed)
        .or_else(|_| miniz_oxide::inflate::decompress_to_vec(compressed))
        .map_err(|_| Error::Decompress)
}
