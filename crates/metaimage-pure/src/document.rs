//! The in-memory MetaImage document and its header/payload codec.
//!
//! [`MetaImage::encode`] and [`MetaImage::decode`] work on text and bytes
//! only; the file functions in [`crate::file`] wrap them with path handling.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::compress;
use crate::element::ElementType;
use crate::error::{Error, Result};
use crate::header::{is_reserved, is_slice_axis_tag, push_line, tags, Header};
use crate::pixel::{element_count, PixelArray, PixelData};
use crate::value::{join, join_floats, parse_extents, Value};

/// Spacing assumed when a header or caller supplies none.
pub const DEFAULT_SPACING: [f64; 3] = [1.0, 1.0, 1.0];

/// Origin assumed when a header or caller supplies none.
///
/// Two components even for volumes; explicit origins may have two or three.
pub const DEFAULT_ORIGIN: [f64; 2] = [0.0, 0.0];

/// Options for decoding a MetaImage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Decode `MET_FLOAT` payloads as `u8` after scaling by 255, the way
    /// older exports expect. Off by default: floats decode losslessly.
    pub legacy_float_rescale: bool,
}

impl ReadOptions {
    pub fn legacy_float_rescale(mut self, enabled: bool) -> Self {
        self.legacy_float_rescale = enabled;
        self
    }
}

/// Options for encoding a MetaImage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write a zlib-compressed `.zraw` sidecar instead of `.raw`.
    pub compress: bool,
    /// zlib level, `-1` for the default or `0..=9`.
    pub compression_level: i32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            compress: false,
            compression_level: -1,
        }
    }
}

impl WriteOptions {
    pub fn compressed(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    /// Extension of the sidecar these options produce.
    pub fn sidecar_extension(&self) -> &'static str {
        if self.compress {
            "zraw"
        } else {
            "raw"
        }
    }
}

/// Header text and sidecar bytes produced by [`MetaImage::encode`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub header: String,
    pub payload: Vec<u8>,
}

/// A decoded or to-be-encoded MetaImage.
///
/// `dims` is width-first, `(width, height[, depth])`, while the pixel array is
/// row-major `(height, width[, depth][, channels])`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaImage {
    header: Header,
    dims: Vec<usize>,
    channels: usize,
    pixels: PixelArray,
}

impl MetaImage {
    /// Wrap an in-memory array.
    ///
    /// With `channels` set, the last axis holds interleaved components and the
    /// remaining axes are spatial. The spatial rank must be 2 or 3.
    pub fn from_array(pixels: PixelArray, channels: bool) -> Result<Self> {
        let shape = pixels.shape();
        let (ndims, channel_count) = match shape.last() {
            Some(&last) if channels => (shape.len() - 1, last),
            _ => (shape.len(), 1),
        };
        if ndims != 2 && ndims != 3 {
            return Err(Error::InvalidArgument(
                "array must have 2 or 3 spatial axes",
            ));
        }
        if channel_count == 0 {
            return Err(Error::InvalidArgument("channel axis must be non-empty"));
        }
        let mut dims = vec![shape[1], shape[0]];
        if ndims == 3 {
            dims.push(shape[2]);
        }
        // A unit channel axis is stored without the trailing axis.
        let pixels = if channels && channel_count == 1 {
            let spatial = shape[..ndims].to_vec();
            PixelArray::new(spatial, pixels.into_data())?
        } else {
            pixels
        };

        let mut header = Header::new();
        header.set(tags::ELEMENT_SPACING, Value::Floats(DEFAULT_SPACING.to_vec()));
        header.set(tags::NUM_CHANNELS, Value::Int(channel_count as i64));
        header.set(tags::OFFSET, Value::Floats(DEFAULT_ORIGIN.to_vec()));

        Ok(MetaImage {
            header,
            dims,
            channels: channel_count,
            pixels,
        })
    }

    /// Build a document from a parsed header and its raw sidecar bytes.
    ///
    /// `sidecar` is the file content as stored, compressed or not.
    pub fn decode(mut header: Header, sidecar: &[u8], options: &ReadOptions) -> Result<Self> {
        let ndims: usize = header
            .require_text(tags::N_DIMS)?
            .trim()
            .parse()
            .map_err(|_| Error::InvalidValue(tags::N_DIMS))?;
        if ndims != 2 && ndims != 3 {
            return Err(Error::InvalidValue(tags::N_DIMS));
        }
        let dims = parse_extents(header.require_text(tags::DIM_SIZE)?, tags::DIM_SIZE)?;
        if dims.len() != ndims {
            return Err(Error::InvalidValue(tags::DIM_SIZE));
        }
        let element_type = ElementType::from_tag(header.require_text(tags::ELEMENT_TYPE)?.trim())?;
        let channels = match header.get(tags::NUM_CHANNELS) {
            Some(v) => match v.to_int() {
                Some(n) if n >= 1 => n as usize,
                _ => return Err(Error::InvalidValue(tags::NUM_CHANNELS)),
            },
            None => 1,
        };
        header.set(tags::NUM_CHANNELS, Value::Int(channels as i64));
        if !header.contains(tags::ELEMENT_SPACING) {
            header.set(tags::ELEMENT_SPACING, Value::Floats(DEFAULT_SPACING.to_vec()));
        }
        if !header.contains(tags::OFFSET) {
            header.set(tags::OFFSET, Value::Floats(DEFAULT_ORIGIN.to_vec()));
        }

        let raw = if header.is_compressed() {
            if let Some(declared) = header.get(tags::COMPRESSED_DATA_SIZE).and_then(Value::to_int) {
                if declared != sidecar.len() as i64 {
                    warn!(
                        declared,
                        actual = sidecar.len(),
                        "CompressedDataSize disagrees with sidecar length"
                    );
                }
            }
            compress::inflate(sidecar)?
        } else {
            sidecar.to_vec()
        };

        let mut shape = vec![dims[1], dims[0]];
        shape.extend_from_slice(&dims[2..]);
        if channels > 1 {
            shape.push(channels);
        }
        let expected = element_count(&shape)
            .and_then(|count| count.checked_mul(element_type.size()))
            .ok_or(Error::InvalidValue(tags::DIM_SIZE))?;
        if raw.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: raw.len(),
            });
        }

        let data = if element_type.is_float() && options.legacy_float_rescale {
            warn!("rescaling MET_FLOAT payload to 8-bit; precision is lost");
            PixelData::from_le_f32_rescaled(&raw)?
        } else {
            PixelData::from_le_bytes(&raw, element_type)?
        };
        debug!(
            ?dims,
            channels,
            element_type = element_type.tag(),
            bytes = raw.len(),
            "decoded MetaImage payload"
        );

        Ok(MetaImage {
            header,
            dims,
            channels,
            pixels: PixelArray::new(shape, data)?,
        })
    }

    /// Produce the header text and sidecar bytes.
    ///
    /// `data_file` is the sidecar name recorded in `ElementDataFile`.
    pub fn encode(&self, data_file: &str, options: &WriteOptions) -> Result<EncodedImage> {
        let raw = self.pixels.data().to_le_bytes();
        let payload = if options.compress {
            compress::deflate(&raw, options.compression_level)?
        } else {
            raw
        };

        let mut out = String::new();
        push_line(&mut out, tags::N_DIMS, &self.dimensionality());
        push_line(&mut out, tags::DIM_SIZE, &join(&self.dims));
        push_line(&mut out, tags::ELEMENT_TYPE, &self.element_type());
        push_line(&mut out, tags::ELEMENT_SPACING, &join_floats(self.spacing()));
        push_line(&mut out, tags::NUM_CHANNELS, &self.channels);
        push_line(&mut out, tags::OFFSET, &join_floats(self.origin()));
        if options.compress {
            push_line(&mut out, tags::COMPRESSED_DATA, &"True");
            push_line(&mut out, tags::COMPRESSED_DATA_SIZE, &payload.len());
        }
        push_line(&mut out, tags::ELEMENT_DATA_FILE, &data_file);
        if let Some(axis) = self.slice_axis() {
            push_line(&mut out, tags::SLICE_AXIS, &join(axis));
        }
        for (tag, value) in self.header.custom() {
            check_custom_entry(tag, value)?;
            push_line(&mut out, tag, value);
        }

        debug!(
            data_file,
            compressed = options.compress,
            bytes = payload.len(),
            "encoded MetaImage"
        );
        Ok(EncodedImage {
            header: out,
            payload,
        })
    }

    pub fn pixels(&self) -> &PixelArray {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelArray {
        self.pixels
    }

    /// Axis extents, width first.
    pub fn dimensions(&self) -> &[usize] {
        &self.dims
    }

    /// Number of spatial axes, 2 or 3.
    pub fn dimensionality(&self) -> usize {
        self.dims.len()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn element_type(&self) -> ElementType {
        self.pixels.element_type()
    }

    /// All header attributes, including pass-through custom tags.
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn attribute(&self, tag: &str) -> Option<&Value> {
        self.header.get(tag)
    }

    /// Set a header attribute by tag name.
    ///
    /// Tags derived from the pixel array (`NDims`, `DimSize`, `ElementType`,
    /// `ElementNumberOfChannels`) and the file-layout tags cannot be set.
    /// Spacing, offset and slice axis are validated like their setters.
    pub fn set_attribute(&mut self, tag: &str, value: Value) -> Result<()> {
        match tag {
            tags::ELEMENT_SPACING => {
                self.set_spacing(&floats_of(value, tags::ELEMENT_SPACING)?)
            }
            tags::OFFSET => self.set_origin(&floats_of(value, tags::OFFSET)?),
            t if is_slice_axis_tag(t) => {
                let axis = match value {
                    Value::Ints(v) => v,
                    Value::Int(n) => vec![n],
                    Value::Text(s) => crate::value::parse_ints(&s, tags::SLICE_AXIS)?,
                    Value::Floats(_) => return Err(Error::InvalidValue(tags::SLICE_AXIS)),
                };
                self.set_slice_axis(axis);
                Ok(())
            }
            t if is_reserved(t) => Err(Error::InvalidArgument(
                "tag is derived from the pixel data or file layout",
            )),
            _ => {
                check_custom_entry(tag, &value)?;
                self.header.set(tag, value);
                Ok(())
            }
        }
    }

    pub fn spacing(&self) -> &[f64] {
        self.header
            .get(tags::ELEMENT_SPACING)
            .and_then(Value::as_floats)
            .unwrap_or(&DEFAULT_SPACING)
    }

    /// Set the physical sample spacing; must have 2 or 3 components.
    pub fn set_spacing(&mut self, spacing: &[f64]) -> Result<()> {
        check_components(spacing, "spacing must have 2 or 3 components")?;
        self.header
            .set(tags::ELEMENT_SPACING, Value::Floats(spacing.to_vec()));
        Ok(())
    }

    pub fn origin(&self) -> &[f64] {
        self.header
            .get(tags::OFFSET)
            .and_then(Value::as_floats)
            .unwrap_or(&DEFAULT_ORIGIN)
    }

    /// Set the physical position of the first sample; must have 2 or 3 components.
    pub fn set_origin(&mut self, origin: &[f64]) -> Result<()> {
        check_components(origin, "origin must have 2 or 3 components")?;
        self.header.set(tags::OFFSET, Value::Floats(origin.to_vec()));
        Ok(())
    }

    /// The volume axis this slice was extracted along, if recorded.
    pub fn slice_axis(&self) -> Option<&[i64]> {
        self.header
            .get(tags::SLICE_AXIS)
            .or_else(|| self.header.get(tags::SLICE_AXIS_INDEX))
            .and_then(Value::as_ints)
    }

    pub fn set_slice_axis(&mut self, axis: Vec<i64>) {
        self.header.remove(tags::SLICE_AXIS_INDEX);
        self.header.set(tags::SLICE_AXIS, Value::Ints(axis));
    }
}

fn floats_of(value: Value, tag: &'static str) -> Result<Vec<f64>> {
    match value {
        Value::Floats(v) => Ok(v),
        Value::Text(s) => crate::value::parse_floats(&s, tag),
        Value::Ints(v) => Ok(v.into_iter().map(|n| n as f64).collect()),
        Value::Int(_) => Err(Error::InvalidValue(tag)),
    }
}

/// A custom entry must survive being written as one `Tag = value` line.
fn check_custom_entry(tag: &str, value: &Value) -> Result<()> {
    let breaks_line = |s: &str| s.contains(['=', '\r', '\n']);
    if tag.trim().is_empty() || tag.trim() != tag || breaks_line(tag) {
        return Err(Error::InvalidArgument(
            "custom tag must be a non-empty name without '=' or line breaks",
        ));
    }
    if let Value::Text(text) = value {
        if breaks_line(text.as_str()) || text.trim() != text.as_str() {
            return Err(Error::InvalidArgument(
                "custom value must not contain '=', line breaks or edge whitespace",
            ));
        }
    }
    Ok(())
}

fn check_components(values: &[f64], msg: &'static str) -> Result<()> {
    if values.len() == 2 || values.len() == 3 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;

    fn grayscale() -> MetaImage {
        MetaImage::from_array(PixelArray::zeros(&[50, 100], ElementType::UChar), false).unwrap()
    }

    fn decode_text(text: &str, payload: &[u8]) -> Result<MetaImage> {
        MetaImage::decode(Header::parse(text)?, payload, &ReadOptions::default())
    }

    #[test]
    fn from_array_grayscale() {
        let img = grayscale();
        assert_eq!(img.dimensionality(), 2);
        assert_eq!(img.dimensions(), &[100, 50]);
        assert_eq!(img.channels(), 1);
        assert_eq!(img.spacing(), &[1.0, 1.0, 1.0]);
        assert_eq!(img.origin(), &[0.0, 0.0]);
        assert!(img.slice_axis().is_none());
    }

    #[test]
    fn from_array_with_channels() {
        let img =
            MetaImage::from_array(PixelArray::zeros(&[10, 20, 3], ElementType::UChar), true)
                .unwrap();
        assert_eq!(img.dimensionality(), 2);
        assert_eq!(img.dimensions(), &[20, 10]);
        assert_eq!(img.channels(), 3);
    }

    #[test]
    fn from_array_volume() {
        let img =
            MetaImage::from_array(PixelArray::zeros(&[4, 5, 6], ElementType::Short), false)
                .unwrap();
        assert_eq!(img.dimensionality(), 3);
        assert_eq!(img.dimensions(), &[5, 4, 6]);
        assert_eq!(img.channels(), 1);
    }

    #[test]
    fn from_array_rejects_bad_rank() {
        let flat = PixelArray::zeros(&[8], ElementType::UChar);
        assert!(matches!(
            MetaImage::from_array(flat.clone(), false),
            Err(Error::InvalidArgument(_))
        ));
        let rgb_line = PixelArray::zeros(&[8, 3], ElementType::UChar);
        assert!(MetaImage::from_array(rgb_line, true).is_err());
        let hyper = PixelArray::zeros(&[2, 2, 2, 2], ElementType::UChar);
        assert!(MetaImage::from_array(hyper, false).is_err());
    }

    #[test]
    fn encode_grayscale_header() {
        let enc = grayscale()
            .encode("img.raw", &WriteOptions::default())
            .unwrap();
        assert_eq!(
            enc.header,
            "NDims = 2\n\
             DimSize = 100 50\n\
             ElementType = MET_UCHAR\n\
             ElementSpacing = 1.0 1.0 1.0\n\
             ElementNumberOfChannels = 1\n\
             Offset = 0.0 0.0\n\
             ElementDataFile = img.raw\n"
        );
        assert_eq!(enc.payload.len(), 5000);
    }

    #[test]
    fn encode_compressed_records_size() {
        let enc = grayscale()
            .encode("img.zraw", &WriteOptions::default().compressed(true))
            .unwrap();
        let h = Header::parse(&enc.header).unwrap();
        assert!(h.is_compressed());
        assert_eq!(
            h.get(tags::COMPRESSED_DATA_SIZE).and_then(Value::to_int),
            Some(enc.payload.len() as i64)
        );
        assert!(enc.payload.len() < 5000);
    }

    #[test]
    fn encode_orders_slice_axis_and_custom_tags() {
        let mut img = grayscale();
        img.set_attribute("Modality", Value::from("MET_MOD_US")).unwrap();
        img.set_slice_axis(vec![2]);
        img.set_spacing(&[0.5, 0.5]).unwrap();
        let enc = img.encode("a.raw", &WriteOptions::default()).unwrap();
        let lines: Vec<&str> = enc.header.lines().collect();
        assert_eq!(lines[3], "ElementSpacing = 0.5 0.5");
        assert_eq!(lines[6], "ElementDataFile = a.raw");
        assert_eq!(lines[7], "SliceAxis = 2");
        assert_eq!(lines[8], "Modality = MET_MOD_US");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn decode_round_trip_multichannel() {
        let values: Vec<u16> = (0..2 * 3 * 4).map(|v| v as u16 * 1000).collect();
        let arr = PixelArray::from_vec(vec![2, 3, 4], values).unwrap();
        let img = MetaImage::from_array(arr, true).unwrap();
        let enc = img.encode("x.raw", &WriteOptions::default()).unwrap();
        let back = decode_text(&enc.header, &enc.payload).unwrap();
        assert_eq!(back.pixels(), img.pixels());
        assert_eq!(back.channels(), 4);
        assert_eq!(back.dimensions(), &[3, 2]);
    }

    #[test]
    fn decode_volume_shape() {
        let text = "NDims = 3\nDimSize = 4 3 2\nElementType = MET_CHAR\nElementDataFile = v.raw\n";
        let img = decode_text(text, &[1u8; 24]).unwrap();
        assert_eq!(img.pixels().shape(), &[3, 4, 2]);
        assert_eq!(img.dimensions(), &[4, 3, 2]);
        assert_eq!(img.spacing(), &DEFAULT_SPACING);
        assert_eq!(img.origin(), &DEFAULT_ORIGIN);
    }

    #[test]
    fn decode_size_mismatch() {
        let text = "NDims = 2\nDimSize = 4 3\nElementType = MET_SHORT\nElementDataFile = v.raw\n";
        let err = decode_text(text, &[0u8; 23]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: 24,
                actual: 23
            }
        ));
    }

    #[test]
    fn decode_dim_count_must_match() {
        let text = "NDims = 3\nDimSize = 4 3\nElementType = MET_UCHAR\nElementDataFile = v.raw\n";
        let err = decode_text(text, &[0u8; 12]).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(tags::DIM_SIZE)));
    }

    #[test]
    fn decode_missing_tags() {
        let err = decode_text("NDims = 2\nElementType = MET_UCHAR\n", &[]).unwrap_err();
        assert!(matches!(err, Error::MissingTag(tags::DIM_SIZE)));
        let err = decode_text("DimSize = 1 1\n", &[0]).unwrap_err();
        assert!(matches!(err, Error::MissingTag(tags::N_DIMS)));
    }

    #[test]
    fn decode_unknown_element_type() {
        let text = "NDims = 2\nDimSize = 1 1\nElementType = MET_DOUBLE\n";
        let err = decode_text(text, &[0u8; 8]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedElementType(_)));
    }

    #[test]
    fn decode_float_lossless_and_legacy() {
        let text = "NDims = 2\nDimSize = 2 1\nElementType = MET_FLOAT\nElementDataFile = f.raw\n";
        let payload = PixelData::F32(vec![0.25, 1.0]).to_le_bytes();

        let exact = decode_text(text, &payload).unwrap();
        assert_eq!(exact.pixels().as_slice::<f32>(), Some(&[0.25f32, 1.0][..]));

        let legacy = MetaImage::decode(
            Header::parse(text).unwrap(),
            &payload,
            &ReadOptions::default().legacy_float_rescale(true),
        )
        .unwrap();
        assert_eq!(legacy.pixels().as_slice::<u8>(), Some(&[63u8, 255][..]));
        assert_eq!(legacy.element_type(), ElementType::UChar);
    }

    #[test]
    fn decode_keeps_custom_tags() {
        let text = "NDims = 2\nDimSize = 1 1\nElementType = MET_UCHAR\n\
                    ElementDataFile = p.raw\nTimeStamp = 42.5\nSliceAxisIndex = 1\n";
        let img = decode_text(text, &[9]).unwrap();
        assert_eq!(img.attribute(tags::TIME_STAMP), Some(&Value::from("42.5")));
        assert_eq!(img.slice_axis(), Some(&[1i64][..]));
        let enc = img.encode("p.raw", &WriteOptions::default()).unwrap();
        assert!(enc.header.contains("SliceAxis = 1\n"));
        assert!(enc.header.ends_with("TimeStamp = 42.5\n"));
        assert!(!enc.header.contains("SliceAxisIndex"));
    }

    #[test]
    fn spacing_and_origin_validation() {
        let mut img = grayscale();
        assert!(img.set_spacing(&[1.0]).is_err());
        assert!(img.set_spacing(&[1.0, 2.0, 3.0, 4.0]).is_err());
        img.set_spacing(&[0.1, 0.2, 0.3]).unwrap();
        assert_eq!(img.spacing(), &[0.1, 0.2, 0.3]);

        assert!(img.set_origin(&[]).is_err());
        img.set_origin(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(img.origin(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn set_attribute_routes_known_tags() {
        let mut img = grayscale();
        img.set_attribute(tags::ELEMENT_SPACING, Value::from("0.5 2"))
            .unwrap();
        assert_eq!(img.spacing(), &[0.5, 2.0]);
        assert!(img
            .set_attribute(tags::OFFSET, Value::Floats(vec![1.0]))
            .is_err());
        assert!(matches!(
            img.set_attribute(tags::DIM_SIZE, Value::from("1 1")),
            Err(Error::InvalidArgument(_))
        ));
        img.set_attribute(tags::SLICE_AXIS_INDEX, Value::Int(0))
            .unwrap();
        assert_eq!(img.slice_axis(), Some(&[0i64][..]));
        img.set_attribute("PatientName", "anon".to_string().into())
            .unwrap();
        assert_eq!(img.attribute("PatientName"), Some(&Value::from("anon")));
    }

    #[test]
    fn unit_channel_axis_is_dropped() {
        let values: Vec<u8> = (0..20).collect();
        let arr = PixelArray::from_vec(vec![4, 5, 1], values.clone()).unwrap();
        let img = MetaImage::from_array(arr, true).unwrap();
        assert_eq!(img.channels(), 1);
        assert_eq!(img.dimensions(), &[5, 4]);
        assert_eq!(img.pixels().shape(), &[4, 5]);

        let enc = img.encode("u.raw", &WriteOptions::default()).unwrap();
        let back = decode_text(&enc.header, &enc.payload).unwrap();
        assert_eq!(back.pixels(), img.pixels());
        assert_eq!(back.pixels().as_slice::<u8>(), Some(&values[..]));
    }

    #[test]
    fn decode_rejects_overflowing_dims() {
        let text = "NDims = 2\nDimSize = 4294967296 4294967296\n\
                    ElementType = MET_UCHAR\nElementDataFile = h.raw\n";
        let err = decode_text(text, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(tags::DIM_SIZE)));

        let wide = format!(
            "NDims = 2\nDimSize = {} 1\nElementType = MET_INT\nElementDataFile = h.raw\n",
            usize::MAX / 2
        );
        let err = decode_text(&wide, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(tags::DIM_SIZE)));
    }

    #[test]
    fn custom_entries_must_fit_one_line() {
        let mut img = grayscale();
        for (tag, value) in [
            ("Comment", "a=b"),
            ("Comment", "two\nlines"),
            ("Comment", "cr\r"),
            ("Comment", " padded"),
            ("Bad=Tag", "x"),
            ("Bad\nTag", "x"),
            ("", "x"),
            (" Spaced", "x"),
        ] {
            assert!(
                matches!(
                    img.set_attribute(tag, Value::from(value)),
                    Err(Error::InvalidArgument(_))
                ),
                "{tag:?} = {value:?} accepted"
            );
        }
        assert!(img.header().custom().next().is_none());

        img.set_attribute("Comment", Value::from("a b")).unwrap();
        let enc = img.encode("c.raw", &WriteOptions::default()).unwrap();
        let back = decode_text(&enc.header, &enc.payload).unwrap();
        assert_eq!(back.attribute("Comment"), Some(&Value::from("a b")));
    }

    #[test]
    fn encode_rejects_unwritable_header_entries() {
        let mut header = Header::new();
        header.set("Comment", Value::from("x = y"));
        let img = MetaImage {
            header,
            ..grayscale()
        };
        let err = img.encode("c.raw", &WriteOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
