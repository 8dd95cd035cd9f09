//! Attribute builder for constructing netlink attribute streams.

use bytes::{BufMut, Bytes, BytesMut};

use super::attr::{NLA_F_NESTED, NlAttr, nla_align};
use super::error::{Error, Result};

/// Token returned when starting a nested attribute.
/// Used to finalize the nested attribute length.
#[derive(Debug, Clone, Copy)]
pub struct NestToken {
    /// Offset of the nested attribute header in the buffer.
    offset: usize,
}

/// Builder for a flat stream of netlink attributes.
///
/// Headers are written in host byte order. Fixed-width payload helpers
/// write network order.
#[derive(Debug, Clone, Default)]
pub struct AttrBuilder {
    buf: BytesMut,
}

impl AttrBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current stream length.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop everything written after the first `len` bytes.
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Run `write`, undoing any partial output if it fails.
    pub fn write_all_or_nothing(
        &mut self,
        write: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let mark = self.len();
        let result = write(self);
        if result.is_err() {
            self.truncate(mark);
        }
        result
    }

    fn pad(&mut self) {
        let aligned = nla_align(self.buf.len());
        self.buf.resize(aligned, 0);
    }

    /// Append an attribute with the given type and data.
    pub fn append_attr(&mut self, attr_type: u16, data: &[u8]) -> Result<()> {
        let attr = NlAttr::new(attr_type, data.len())?;
        self.buf.put_slice(attr.as_bytes());
        self.buf.put_slice(data);
        self.pad();
        Ok(())
    }

    /// Append a u32 attribute (big endian / network order).
    pub fn append_attr_u32_be(&mut self, attr_type: u16, value: u32) -> Result<()> {
        self.append_attr(attr_type, &value.to_be_bytes())
    }

    /// Append a null-terminated string attribute.
    pub fn append_attr_str(&mut self, attr_type: u16, value: &str) -> Result<()> {
        let mut data = Vec::with_capacity(value.len() + 1);
        data.extend_from_slice(value.as_bytes());
        data.push(0);
        self.append_attr(attr_type, &data)
    }

    /// Start a nested attribute. Returns a token to finalize it.
    pub fn nest_start(&mut self, attr_type: u16) -> NestToken {
        let offset = self.buf.len();
        // Placeholder header, length is patched by nest_end
        self.buf.put_u16_ne(0);
        self.buf.put_u16_ne(attr_type | NLA_F_NESTED);
        NestToken { offset }
    }

    /// End a nested attribute started with `nest_start`.
    pub fn nest_end(&mut self, token: NestToken) -> Result<()> {
        let len = self.buf.len() - token.offset;
        let len = u16::try_from(len).map_err(|_| Error::AttributeTooLarge { len })?;
        self.buf[token.offset..token.offset + 2].copy_from_slice(&len.to_ne_bytes());
        self.pad();
        Ok(())
    }

    /// Finalize and return the stream bytes.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::{NLA_HDRLEN, NLA_MAX_PAYLOAD};

    #[test]
    fn test_attribute_padding() {
        let mut builder = AttrBuilder::new();
        builder.append_attr(1, &[7]).unwrap();
        let buf = builder.finish();

        assert_eq!(buf.len(), 8);
        assert_eq!(u16::from_ne_bytes([buf[0], buf[1]]), 5);
        assert_eq!(u16::from_ne_bytes([buf[2], buf[3]]), 1);
        assert_eq!(&buf[4..], &[7, 0, 0, 0]);
    }

    #[test]
    fn test_u32_big_endian() {
        let mut builder = AttrBuilder::new();
        builder.append_attr_u32_be(1, 0x0102_0304).unwrap();
        let buf = builder.finish();

        assert_eq!(&buf[4..8], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_string_attribute() {
        let mut builder = AttrBuilder::new();
        builder.append_attr_str(1, "dup").unwrap();
        let buf = builder.finish();

        assert_eq!(buf.len(), 8);
        assert_eq!(&buf[4..], b"dup\0");
    }

    #[test]
    fn test_nested_attribute() {
        let mut builder = AttrBuilder::new();
        let nest = builder.nest_start(2);
        builder.append_attr_u32_be(1, 100).unwrap();
        builder.nest_end(nest).unwrap();
        let buf = builder.finish();

        assert_eq!(buf.len(), NLA_HDRLEN + 8);
        assert_eq!(u16::from_ne_bytes([buf[0], buf[1]]), 12);
        assert_eq!(u16::from_ne_bytes([buf[2], buf[3]]), 2 | NLA_F_NESTED);
    }

    #[test]
    fn test_empty_nest() {
        let mut builder = AttrBuilder::new();
        let nest = builder.nest_start(2);
        builder.nest_end(nest).unwrap();
        assert_eq!(builder.len(), NLA_HDRLEN);
    }

    #[test]
    fn test_oversized_attribute() {
        let mut builder = AttrBuilder::new();
        let data = vec![0u8; NLA_MAX_PAYLOAD + 1];
        let err = builder.append_attr(1, &data).unwrap_err();
        assert!(err.is_encode_error());
        assert!(builder.is_empty());
    }

    #[test]
    fn test_oversized_nest() {
        let mut builder = AttrBuilder::new();
        let nest = builder.nest_start(2);
        builder.append_attr(1, &vec![0u8; NLA_MAX_PAYLOAD]).unwrap();
        let err = builder.nest_end(nest).unwrap_err();
        assert!(matches!(err, Error::AttributeTooLarge { .. }));
    }

    #[test]
    fn test_write_all_or_nothing() {
        let mut builder = AttrBuilder::new();
        builder.append_attr_u32_be(1, 5).unwrap();

        let err = builder
            .write_all_or_nothing(|b| {
                b.append_attr_str(2, "partial")?;
                let nest = b.nest_start(3);
                b.append_attr(4, &vec![0u8; NLA_MAX_PAYLOAD])?;
                b.nest_end(nest)
            })
            .unwrap_err();

        assert!(err.is_encode_error());
        assert_eq!(builder.len(), 8);

        builder
            .write_all_or_nothing(|b| b.append_attr_u32_be(2, 6))
            .unwrap();
        assert_eq!(builder.len(), 16);
    }
}
