//! MetaImage header parsing and serialization.
//!
//! A header is UTF-8 text with one `Tag = value` pair per line. Tag order is
//! not significant on read; entries are kept in file order so unknown tags
//! are written back the way they arrived.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use tracing::trace;

use crate::error::{Error, Result};
use crate::value::{parse_floats, parse_ints, Value};

/// Well-known header tag names.
pub mod tags {
    pub const N_DIMS: &str = "NDims";
    pub const DIM_SIZE: &str = "DimSize";
    pub const ELEMENT_TYPE: &str = "ElementType";
    pub const ELEMENT_SPACING: &str = "ElementSpacing";
    pub const NUM_CHANNELS: &str = "ElementNumberOfChannels";
    pub const OFFSET: &str = "Offset";
    pub const COMPRESSED_DATA: &str = "CompressedData";
    pub const COMPRESSED_DATA_SIZE: &str = "CompressedDataSize";
    pub const ELEMENT_DATA_FILE: &str = "ElementDataFile";
    /// Written form of the slice-axis extension tag.
    pub const SLICE_AXIS: &str = "SliceAxis";
    /// Older spelling of the slice-axis tag, accepted on read.
    pub const SLICE_AXIS_INDEX: &str = "SliceAxisIndex";
    pub const TIME_STAMP: &str = "TimeStamp";
}

/// Tags the writer emits itself; they are never copied through as custom tags.
pub const RESERVED_TAGS: [&str; 11] = [
    tags::N_DIMS,
    tags::DIM_SIZE,
    tags::ELEMENT_TYPE,
    tags::ELEMENT_SPACING,
    tags::NUM_CHANNELS,
    tags::OFFSET,
    tags::COMPRESSED_DATA,
    tags::COMPRESSED_DATA_SIZE,
    tags::ELEMENT_DATA_FILE,
    tags::SLICE_AXIS,
    tags::SLICE_AXIS_INDEX,
];

/// Returns `true` if `tag` is written by the codec rather than passed through.
pub fn is_reserved(tag: &str) -> bool {
    RESERVED_TAGS.contains(&tag)
}

/// Returns `true` for either spelling of the slice-axis tag.
pub fn is_slice_axis_tag(tag: &str) -> bool {
    tag == tags::SLICE_AXIS || tag == tags::SLICE_AXIS_INDEX
}

/// Ordered tag/value map of a MetaImage header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    entries: Vec<(String, Value)>,
}

impl Header {
    pub fn new() -> Self {
        Header::default()
    }

    /// Parse header text.
    ///
    /// Every line must contain exactly one `=`. Spacing and offset become
    /// float sequences, the slice-axis tag an integer sequence; everything
    /// else is kept as text. A repeated tag replaces the earlier value.
    pub fn parse(text: &str) -> Result<Header> {
        let mut header = Header::new();
        for (idx, line) in text.lines().enumerate() {
            let mut parts = line.split('=');
            let (key, raw) = match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(raw), None) => (key.trim(), raw.trim()),
                _ => {
                    return Err(Error::Parse {
                        line: idx + 1,
                        reason: "expected exactly one '='",
                    })
                }
            };
            if key.is_empty() {
                return Err(Error::Parse {
                    line: idx + 1,
                    reason: "empty tag name",
                });
            }
            trace!(tag = key, value = raw, "header entry");
            let value = parse_entry(key, raw)?;
            header.set(key, value);
        }
        Ok(header)
    }

    /// Serialize every entry as `Tag = value` lines, in order.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (tag, value) in &self.entries {
            push_line(&mut out, tag, value);
        }
        out
    }

    pub fn get(&self, tag: &str) -> Option<&Value> {
        self.entries.iter().find(|(t, _)| t == tag).map(|(_, v)| v)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Insert or replace a tag. Replacement keeps the original position.
    pub fn set(&mut self, tag: impl Into<String>, value: Value) {
        let tag = tag.into();
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((tag, value)),
        }
    }

    pub fn remove(&mut self, tag: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(t, _)| t == tag)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries the writer copies through verbatim.
    pub fn custom(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(t, _)| !is_reserved(t))
    }

    /// Text of a required tag, or `MissingTag`.
    pub fn require_text(&self, tag: &'static str) -> Result<&str> {
        match self.get(tag) {
            Some(Value::Text(s)) => Ok(s),
            Some(_) => Err(Error::InvalidValue(tag)),
            None => Err(Error::MissingTag(tag)),
        }
    }

    /// Whether the header declares a compressed sidecar.
    pub fn is_compressed(&self) -> bool {
        matches!(self.get(tags::COMPRESSED_DATA), Some(Value::Text(s)) if s == "True")
    }

    /// The sidecar file name, relative to the header's directory.
    pub fn data_file(&self) -> Result<&str> {
        self.require_text(tags::ELEMENT_DATA_FILE)
    }
}

/// Append one `Tag = value` line.
pub(crate) fn push_line(out: &mut String, tag: &str, value: &dyn core::fmt::Display) {
    out.push_str(tag);
    out.push_str(" = ");
    out.push_str(&value.to_string());
    out.push('\n');
}

fn parse_entry(key: &str, raw: &str) -> Result<Value> {
    let value = match key {
        tags::ELEMENT_SPACING => Value::Floats(parse_floats(raw, tags::ELEMENT_SPACING)?),
        tags::OFFSET => Value::Floats(parse_floats(raw, tags::OFFSET)?),
        tags::SLICE_AXIS | tags::SLICE_AXIS_INDEX => {
            Value::Ints(parse_ints(raw, tags::SLICE_AXIS)?)
        }
        _ => Value::Text(raw.to_string()),
    };
    Ok(value)
}
