use alloc::string::String;

/// All errors that can occur during MetaImage I/O operations.
#[derive(Debug)]
pub enum Error {
    /// A header or sidecar file does not exist.
    #[cfg(feature = "std")]
    FileNotFound(std::path::PathBuf),
    /// A header line did not split into exactly one `key = value` pair.
    Parse {
        /// 1-based line number within the header text.
        line: usize,
        reason: &'static str,
    },
    /// A header value could not be parsed as the type its tag requires.
    InvalidValue(&'static str),
    /// A required tag was not found in the header.
    MissingTag(&'static str),
    /// The payload byte count disagrees with the declared dimensions.
    ShapeMismatch { expected: usize, actual: usize },
    /// An `ElementType` with no pixel mapping, or a mismatched element type.
    UnsupportedElementType(String),
    /// A caller-supplied argument is out of range.
    InvalidArgument(&'static str),
    /// The compressed payload is not a valid zlib stream.
    Decompress,
    /// An I/O error from the standard library.
    #[cfg(feature = "std")]
    Io(std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Returns `true` for the header grammar errors (`Parse` and `InvalidValue`).
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse { .. } | Error::InvalidValue(_))
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(feature = "std")]
            Error::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Error::Parse { line, reason } => {
                write!(f, "unable to parse MetaImage header at line {line}: {reason}")
            }
            Error::InvalidValue(tag) => write!(f, "invalid value for tag {tag}"),
            Error::MissingTag(tag) => write!(f, "missing required tag: {tag}"),
            Error::ShapeMismatch { expected, actual } => write!(
                f,
                "pixel data size mismatch: expected {expected} bytes, found {actual}"
            ),
            Error::UnsupportedElementType(ty) => write!(f, "unsupported element type: {ty}"),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::Decompress => write!(f, "corrupt compressed pixel data"),
            #[cfg(feature = "std")]
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
