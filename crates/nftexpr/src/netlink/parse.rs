//! Parser combinators for netlink attribute streams.
//!
//! This module provides:
//! - `parse_header`, a winnow combinator for the 4-byte attribute header
//! - `parse_attrs` / `parse_attrs_raw`, strict decoders that report
//!   truncated or inconsistent streams instead of stopping early
//!
//! Headers are read byte by byte, so the input may start at any address.
//!
//! # Example
//!
//! ```ignore
//! use nftexpr::netlink::parse::parse_attrs;
//!
//! for (kind, payload) in parse_attrs(&data)? {
//!     println!("attr {} ({} bytes)", kind, payload.len());
//! }
//! ```

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;

use super::attr::{NLA_HDRLEN, NLA_TYPE_MASK, nla_align};
use super::error::{Error, Result};

/// Result type for winnow parsers.
pub type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

/// Parse a u16 in native endian.
pub fn parse_u16_ne(input: &mut &[u8]) -> PResult<u16> {
    let bytes: &[u8] = take(2usize).parse_next(input)?;
    Ok(u16::from_ne_bytes([bytes[0], bytes[1]]))
}

/// Parse an attribute header and return (length, raw type).
pub fn parse_header(input: &mut &[u8]) -> PResult<(u16, u16)> {
    let len = parse_u16_ne(input)?;
    let attr_type = parse_u16_ne(input)?;
    Ok((len, attr_type))
}

/// Decode every attribute in `data`, keeping the flag bits of each type.
///
/// Fails on the first record that is cut off or whose length field
/// disagrees with the buffer. No partial result is returned. Alignment
/// padding may be missing after the last attribute, but a partial pad is
/// an error.
pub fn parse_attrs_raw(data: &[u8]) -> Result<Vec<(u16, &[u8])>> {
    let mut input = data;
    let mut attrs = Vec::new();

    while !input.is_empty() {
        let offset = data.len() - input.len();
        let remaining = input.len();

        let (len, attr_type) = parse_header(&mut input).map_err(|_| Error::Truncated {
            expected: NLA_HDRLEN,
            actual: remaining,
        })?;
        let len = len as usize;

        if len < NLA_HDRLEN {
            return Err(Error::InvalidAttribute(format!(
                "attribute at offset {} has length {}",
                offset, len
            )));
        }

        let payload: &[u8] = take(len - NLA_HDRLEN)
            .parse_next(&mut input)
            .map_err(|_: ErrMode<ContextError>| Error::Truncated {
                expected: len,
                actual: remaining,
            })?;

        let padding = nla_align(len) - len;
        if input.len() >= padding {
            input = &input[padding..];
        } else if !input.is_empty() {
            return Err(Error::Truncated {
                expected: padding,
                actual: input.len(),
            });
        }

        attrs.push((attr_type, payload));
    }

    Ok(attrs)
}

/// Decode every attribute in `data` and return (type without flags, payload).
pub fn parse_attrs(data: &[u8]) -> Result<Vec<(u16, &[u8])>> {
    let attrs = parse_attrs_raw(data)?;
    Ok(attrs
        .into_iter()
        .map(|(attr_type, payload)| (attr_type & NLA_TYPE_MASK, payload))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::NLA_F_NESTED;
    use crate::netlink::builder::AttrBuilder;

    #[test]
    fn test_parse_attrs() {
        let mut builder = AttrBuilder::new();
        builder.append_attr_u32_be(1, 7).unwrap();
        builder.append_attr_str(2, "x").unwrap();
        let buf = builder.finish();

        let attrs = parse_attrs(&buf).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0], (1, &[0, 0, 0, 7][..]));
        assert_eq!(attrs[1], (2, &b"x\0"[..]));
    }

    #[test]
    fn test_parse_masks_flags() {
        let mut builder = AttrBuilder::new();
        let nest = builder.nest_start(2);
        builder.nest_end(nest).unwrap();
        let buf = builder.finish();

        assert_eq!(parse_attrs_raw(&buf).unwrap(), vec![(2 | NLA_F_NESTED, &[][..])]);
        assert_eq!(parse_attrs(&buf).unwrap(), vec![(2, &[][..])]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_attrs(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_unaligned_input() {
        let mut builder = AttrBuilder::new();
        builder.append_attr_u32_be(1, 7).unwrap();
        builder.append_attr(2, &[9]).unwrap();
        let encoded = builder.finish();

        // Shift the stream to an odd address
        let mut buf = vec![0u8];
        buf.extend_from_slice(&encoded);
        let shifted = &buf[1..];

        assert_eq!(
            parse_attrs(shifted).unwrap(),
            vec![(1, &[0, 0, 0, 7][..]), (2, &[9][..])]
        );
    }

    #[test]
    fn test_truncated_header() {
        let mut builder = AttrBuilder::new();
        builder.append_attr_u32_be(1, 7).unwrap();
        let mut buf = builder.finish().to_vec();
        buf.extend_from_slice(&[8, 0]);

        let err = parse_attrs(&buf).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let mut builder = AttrBuilder::new();
        builder.append_attr_u32_be(1, 7).unwrap();
        let buf = builder.finish();

        let err = parse_attrs(&buf[..6]).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                expected: 8,
                actual: 6
            }
        ));
    }

    #[test]
    fn test_short_length_field() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u16.to_ne_bytes());
        buf.extend_from_slice(&1u16.to_ne_bytes());

        let err = parse_attrs(&buf).unwrap_err();
        assert!(matches!(err, Error::InvalidAttribute(_)));
    }

    #[test]
    fn test_missing_final_padding() {
        let mut builder = AttrBuilder::new();
        builder.append_attr(1, &[9]).unwrap();
        let buf = builder.finish();

        let attrs = parse_attrs(&buf[..5]).unwrap();
        assert_eq!(attrs, vec![(1, &[9][..])]);
    }

    #[test]
    fn test_partial_padding() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&5u16.to_ne_bytes());
        buf.extend_from_slice(&1u16.to_ne_bytes());
        buf.extend_from_slice(&[9, 0xff, 0xff]);

        let err = parse_attrs(&buf).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                expected: 3,
                actual: 2
            }
        ));
    }
}
