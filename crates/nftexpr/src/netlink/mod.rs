//! Netlink attribute framing.
//!
//! Attributes are TLV records: a 4-byte header (`u16` length, `u16` type,
//! both in host byte order) followed by the payload, padded with zeroes to
//! a 4-byte boundary. Nesting is expressed by setting [`NLA_F_NESTED`] on
//! the type of an attribute whose payload is itself an attribute stream.
//!
//! # Quick Start
//!
//! ```ignore
//! use nftexpr::netlink::{AttrBuilder, parse::parse_attrs};
//!
//! let mut builder = AttrBuilder::new();
//! builder.append_attr_u32_be(1, 42)?;
//! let bytes = builder.finish();
//!
//! for (kind, payload) in parse_attrs(&bytes)? {
//!     println!("{} => {:?}", kind, payload);
//! }
//! ```

pub mod attr;
mod builder;
mod error;
pub mod parse;

pub use attr::{NLA_F_NESTED, NLA_F_NET_BYTEORDER, NlAttr};
pub use builder::{AttrBuilder, NestToken};
pub use error::{Error, Result};
