//! nf_tables expressions.
//!
//! Every expression travels in the same envelope: an `NFTA_EXPR_NAME`
//! string attribute naming the expression, followed by a nested
//! `NFTA_EXPR_DATA` attribute with the expression's own attributes.
//!
//! Decoding looks the name up in a static registry. Names without a
//! registered decoder come back as [`Expr::Other`] with their data kept
//! verbatim, so they can be passed through and re-encoded unchanged.
//!
//! # Example
//!
//! ```ignore
//! use nftexpr::nftables::expr::{Dup, Expr, ExprConfig};
//!
//! let bytes = Dup::new(1, 2).to_bytes()?;
//!
//! match Expr::from_bytes(&bytes)? {
//!     Expr::Dup(dup) => println!("{}", dup),
//!     Expr::Other(raw) => println!("unsupported expression {}", raw.name()),
//! }
//! ```

mod dup;

use std::fmt;

use bytes::Bytes;

use crate::netlink::attr::{NLA_TYPE_MASK, get};
use crate::netlink::parse::parse_attrs_raw;
use crate::netlink::{AttrBuilder, Error, NLA_F_NESTED, Result};

pub use dup::{Dup, DupBuilder, NFTA_DUP_SREG_ADDR, NFTA_DUP_SREG_DEV};

/// Expression name (null-terminated string).
pub const NFTA_EXPR_NAME: u16 = 1;
/// Expression data (nested attributes).
pub const NFTA_EXPR_DATA: u16 = 2;

// ============================================================================
// ExprConfig trait
// ============================================================================

/// Trait for expressions that can be written to the kernel.
pub trait ExprConfig: Send + Sync {
    /// Get the expression name (e.g., "dup").
    fn name(&self) -> &'static str;

    /// Write the attributes that go inside `NFTA_EXPR_DATA`.
    fn write_data(&self, builder: &mut AttrBuilder) -> Result<()>;

    /// Append the full expression envelope to `builder`.
    ///
    /// On error `builder` is left as it was.
    fn write_to(&self, builder: &mut AttrBuilder) -> Result<()> {
        write_envelope(builder, self.name(), |b| self.write_data(b))
    }

    /// Encode the full expression envelope.
    fn to_bytes(&self) -> Result<Bytes> {
        let mut builder = AttrBuilder::new();
        self.write_to(&mut builder)?;
        tracing::trace!(expr = self.name(), len = builder.len(), "encoded expression");
        Ok(builder.finish())
    }
}

fn write_envelope(
    builder: &mut AttrBuilder,
    name: &str,
    write_data: impl FnOnce(&mut AttrBuilder) -> Result<()>,
) -> Result<()> {
    builder.write_all_or_nothing(|b| {
        b.append_attr_str(NFTA_EXPR_NAME, name)?;
        let nest = b.nest_start(NFTA_EXPR_DATA);
        write_data(b)?;
        b.nest_end(nest)
    })
}

// ============================================================================
// Registry
// ============================================================================

type DecodeFn = fn(&[u8]) -> Result<Expr>;

fn decode_dup(data: &[u8]) -> Result<Expr> {
    Dup::parse_data(data).map(Expr::Dup)
}

static REGISTRY: &[(&str, DecodeFn)] = &[(dup::NAME, decode_dup)];

fn lookup(name: &str) -> Option<DecodeFn> {
    REGISTRY
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, decode)| *decode)
}

/// Check whether expressions called `name` decode to a typed variant.
pub fn is_registered(name: &str) -> bool {
    lookup(name).is_some()
}

// ============================================================================
// Expr
// ============================================================================

/// An expression whose name has no registered decoder.
///
/// The data attribute is kept as received, including whether it was present
/// and the flag bits of its type. An envelope in the kernel's layout (name
/// first, null-terminated) re-encodes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawExprFields")
)]
pub struct RawExpr {
    name: String,
    data: Option<Vec<u8>>,
    data_flags: u16,
}

impl RawExpr {
    /// Create a raw expression with a nested `NFTA_EXPR_DATA` payload.
    ///
    /// Names with a typed variant are rejected, since they would decode
    /// back as that variant.
    pub fn new(name: impl Into<String>, data: Option<Vec<u8>>) -> Result<Self> {
        let name = name.into();
        if is_registered(&name) {
            return Err(Error::RegisteredExpression { name });
        }
        Ok(Self {
            name,
            data,
            data_flags: NLA_F_NESTED,
        })
    }

    /// Set the flag bits carried on the `NFTA_EXPR_DATA` type.
    pub fn with_data_flags(mut self, flags: u16) -> Self {
        self.data_flags = flags & !NLA_TYPE_MASK;
        self
    }

    /// Expression name as carried in `NFTA_EXPR_NAME`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw payload of `NFTA_EXPR_DATA`, if the attribute was present.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Flag bits of the `NFTA_EXPR_DATA` type.
    pub fn data_flags(&self) -> u16 {
        self.data_flags
    }

    fn write_to(&self, builder: &mut AttrBuilder) -> Result<()> {
        builder.write_all_or_nothing(|b| {
            b.append_attr_str(NFTA_EXPR_NAME, &self.name)?;
            match &self.data {
                Some(data) => b.append_attr(NFTA_EXPR_DATA | self.data_flags, data),
                None => Ok(()),
            }
        })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawExprFields {
    name: String,
    data: Option<Vec<u8>>,
    #[serde(default = "nested_flag")]
    data_flags: u16,
}

#[cfg(feature = "serde")]
fn nested_flag() -> u16 {
    NLA_F_NESTED
}

#[cfg(feature = "serde")]
impl TryFrom<RawExprFields> for RawExpr {
    type Error = Error;

    fn try_from(fields: RawExprFields) -> Result<Self> {
        Ok(Self::new(fields.name, fields.data)?.with_data_flags(fields.data_flags))
    }
}

/// A decoded expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Expr {
    /// Packet duplication.
    Dup(Dup),
    /// Anything else, kept verbatim.
    Other(RawExpr),
}

impl Expr {
    /// Get the expression name.
    pub fn name(&self) -> &str {
        match self {
            Self::Dup(e) => e.name(),
            Self::Other(raw) => raw.name(),
        }
    }

    /// Append the expression envelope to `builder`.
    pub fn write_to(&self, builder: &mut AttrBuilder) -> Result<()> {
        match self {
            Self::Dup(e) => e.write_to(builder),
            Self::Other(raw) => raw.write_to(builder),
        }
    }

    /// Encode the expression envelope.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut builder = AttrBuilder::new();
        self.write_to(&mut builder)?;
        Ok(builder.finish())
    }

    /// Decode an expression envelope.
    ///
    /// Attribute order does not matter and unknown envelope attributes are
    /// skipped. A missing `NFTA_EXPR_DATA` decodes as an empty block.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut name = None;
        let mut expr_data: Option<(u16, &[u8])> = None;

        for (attr_type, value) in parse_attrs_raw(data)? {
            match attr_type & NLA_TYPE_MASK {
                NFTA_EXPR_NAME => name = Some(get::string(value)?),
                NFTA_EXPR_DATA => expr_data = Some((attr_type & !NLA_TYPE_MASK, value)),
                other => tracing::trace!(attr = other, "skipping expression attribute"),
            }
        }

        let name = name.ok_or_else(|| {
            Error::InvalidMessage("expression without NFTA_EXPR_NAME".into())
        })?;

        match lookup(name) {
            Some(decode) => {
                let payload = expr_data.map_or(&[][..], |(_, value)| value);
                tracing::trace!(expr = name, len = payload.len(), "decoding expression");
                decode(payload)
            }
            None => {
                tracing::debug!(expr = name, "no decoder registered, keeping raw data");
                Ok(Self::Other(RawExpr {
                    name: name.to_string(),
                    data: expr_data.map(|(_, value)| value.to_vec()),
                    data_flags: expr_data.map_or(NLA_F_NESTED, |(flags, _)| flags),
                }))
            }
        }
    }
}

impl From<Dup> for Expr {
    fn from(dup: Dup) -> Self {
        Self::Dup(dup)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dup(e) => fmt::Display::fmt(e, f),
            Self::Other(raw) => match raw.data() {
                Some(data) => write!(f, "{} ({} bytes)", raw.name(), data.len()),
                None => write!(f, "{} (no data)", raw.name()),
            },
        }
    }
}
