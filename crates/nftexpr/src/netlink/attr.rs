//! Netlink attribute (nlattr) handling.

use super::error::{Error, Result};
use zerocopy::{Immutable, IntoBytes};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4; // nla_align(size_of::<NlAttr>())

/// Largest payload that still fits the u16 length field.
pub const NLA_MAX_PAYLOAD: usize = u16::MAX as usize - NLA_HDRLEN;

/// Netlink attribute header (mirrors struct nlattr).
///
/// Both fields are in host byte order. Only used for writing; incoming
/// headers are read field by field in [`parse`](super::parse) so input
/// buffers need no alignment.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, IntoBytes, Immutable)]
pub struct NlAttr {
    /// Length including header, excluding padding.
    pub nla_len: u16,
    /// Attribute type, possibly carrying flag bits.
    pub nla_type: u16,
}

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

impl NlAttr {
    /// Create a new attribute header.
    ///
    /// Fails when the payload does not fit the 16-bit length field.
    pub fn new(attr_type: u16, data_len: usize) -> Result<Self> {
        if data_len > NLA_MAX_PAYLOAD {
            return Err(Error::AttributeTooLarge {
                len: NLA_HDRLEN + data_len,
            });
        }
        Ok(Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        })
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }
}

/// Helper functions for extracting typed values from attribute payloads.
///
/// Fixed-width getters require the payload to be exactly the width of the
/// value; anything else is an invalid attribute.
pub mod get {
    use super::*;

    fn exact<const N: usize>(data: &[u8], what: &str) -> Result<[u8; N]> {
        data.try_into().map_err(|_| {
            Error::InvalidAttribute(format!(
                "{} attribute has length {}, expected {}",
                what,
                data.len(),
                N
            ))
        })
    }

    /// Extract a u32 value (big endian / network order).
    pub fn u32_be(data: &[u8]) -> Result<u32> {
        exact(data, "u32").map(u32::from_be_bytes)
    }

    /// Extract a null-terminated string.
    pub fn string(data: &[u8]) -> Result<&str> {
        let len = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        std::str::from_utf8(&data[..len])
            .map_err(|e| Error::InvalidAttribute(format!("invalid UTF-8: {}", e)))
    }
}
