//! Reading and writing `.mhd` header / sidecar file pairs.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::{MetaImage, ReadOptions, WriteOptions};
use crate::error::{Error, Result};
use crate::header::Header;

/// Path of the sidecar written next to `header_path`.
///
/// The header's extension is replaced by `.raw`, or `.zraw` when compressing.
pub fn sidecar_path(header_path: &Path, options: &WriteOptions) -> Result<PathBuf> {
    if header_path.file_stem().is_none() {
        return Err(Error::InvalidArgument("header path has no file name"));
    }
    let data_path = header_path.with_extension(options.sidecar_extension());
    if data_path == header_path {
        return Err(Error::InvalidArgument(
            "header path has the sidecar's extension",
        ));
    }
    Ok(data_path)
}

/// Read only the header of an `.mhd` file.
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<Header> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    Header::parse(&text)
}

/// Resolve the sidecar named by `header` relative to the header's directory.
pub fn resolve_data_file(header_path: &Path, header: &Header) -> Result<PathBuf> {
    let data_file = header.data_file()?;
    let base = header_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(base.join(data_file))
}

impl MetaImage {
    /// Read a MetaImage file pair with default options.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        MetaImage::read_with(path, &ReadOptions::default())
    }

    /// Read a MetaImage file pair.
    pub fn read_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = read_header(path)?;
        let data_path = resolve_data_file(path, &header)?;
        if !data_path.is_file() {
            return Err(Error::FileNotFound(data_path));
        }
        let sidecar = std::fs::read(&data_path)?;
        debug!(
            header = %path.display(),
            sidecar = %data_path.display(),
            bytes = sidecar.len(),
            compressed = header.is_compressed(),
            "reading MetaImage"
        );
        MetaImage::decode(header, &sidecar, options)
    }

    /// Write an uncompressed file pair with default options.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_with(path, &WriteOptions::default())
    }

    /// Write the header to `path` and the sidecar next to it.
    ///
    /// The header is written first. If the sidecar write fails the header is
    /// left in place.
    pub fn write_with<P: AsRef<Path>>(&self, path: P, options: &WriteOptions) -> Result<()> {
        let path = path.as_ref();
        let data_path = sidecar_path(path, options)?;
        let data_file = data_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(Error::InvalidArgument("sidecar file name is not UTF-8"))?;
        let encoded = self.encode(data_file, options)?;
        std::fs::write(path, encoded.header.as_bytes())?;
        std::fs::write(&data_path, &encoded.payload)?;
        debug!(
            header = %path.display(),
            sidecar = %data_path.display(),
            bytes = encoded.payload.len(),
            "wrote MetaImage"
        );
        Ok(())
    }
}
