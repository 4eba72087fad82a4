//! Scalar element types and their `ElementType` header tags.

use alloc::string::ToString;

use crate::error::{Error, Result};

/// The scalar type of each pixel component, as declared by `ElementType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Signed 8-bit integer (`MET_CHAR`).
    Char,
    /// Unsigned 8-bit integer (`MET_UCHAR`).
    UChar,
    /// Signed 16-bit integer (`MET_SHORT`).
    Short,
    /// Unsigned 16-bit integer (`MET_USHORT`).
    UShort,
    /// Signed 32-bit integer (`MET_INT`).
    Int,
    /// Unsigned 32-bit integer (`MET_UINT`).
    UInt,
    /// 32-bit IEEE 754 float (`MET_FLOAT`).
    Float,
}

impl ElementType {
    /// All supported element types, in tag-table order.
    pub const ALL: [ElementType; 7] = [
        ElementType::Char,
        ElementType::UChar,
        ElementType::Short,
        ElementType::UShort,
        ElementType::Int,
        ElementType::UInt,
        ElementType::Float,
    ];

    /// The header tag value written for this type.
    pub fn tag(self) -> &'static str {
        match self {
            ElementType::Char => "MET_CHAR",
            ElementType::UChar => "MET_UCHAR",
            ElementType::Short => "MET_SHORT",
            ElementType::UShort => "MET_USHORT",
            ElementType::Int => "MET_INT",
            ElementType::UInt => "MET_UINT",
            ElementType::Float => "MET_FLOAT",
        }
    }

    /// Parse an `ElementType` header value.
    pub fn from_tag(tag: &str) -> Result<Self> {
        ElementType::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| Error::UnsupportedElementType(tag.to_string()))
    }

    /// Size in bytes of one element.
    pub fn size(self) -> usize {
        match self {
            ElementType::Char | ElementType::UChar => 1,
            ElementType::Short | ElementType::UShort => 2,
            ElementType::Int | ElementType::UInt | ElementType::Float => 4,
        }
    }

    pub fn is_float(self) -> bool {
        self == ElementType::Float
    }
}

impl core::fmt::Display for ElementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}
