//! `dup` expression: duplicate a packet to another address and device.
//!
//! Both parameters are source registers. The address register holds an
//! IPv4 or IPv6 address loaded by an earlier expression, the device
//! register holds an output interface index.
//!
//! # Example
//!
//! ```ignore
//! use nftexpr::nftables::expr::{Dup, ExprConfig};
//! use nftexpr::nftables::reg;
//!
//! let dup = Dup::builder()
//!     .reg_addr(reg::NFT_REG_1)
//!     .reg_dev(reg::NFT_REG_2)
//!     .build();
//!
//! let bytes = dup.to_bytes()?;
//! assert_eq!(Dup::from_bytes(&bytes)?, dup);
//! ```

use std::fmt;

use crate::netlink::attr::get;
use crate::netlink::parse::parse_attrs;
use crate::netlink::{AttrBuilder, Error, Result};

use super::{Expr, ExprConfig};

/// Wire name of the expression.
pub const NAME: &str = "dup";

/// Register carrying the destination address (u32, big endian).
pub const NFTA_DUP_SREG_ADDR: u16 = 1;
/// Register carrying the output device index (u32, big endian).
pub const NFTA_DUP_SREG_DEV: u16 = 2;

/// Packet duplication expression.
///
/// Register value `0` means no register is bound and is carried on the wire
/// like any other index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dup {
    reg_addr: u32,
    reg_dev: u32,
}

impl Dup {
    /// Create a dup expression from its two source registers.
    pub const fn new(reg_addr: u32, reg_dev: u32) -> Self {
        Self { reg_addr, reg_dev }
    }

    /// Start building a dup expression.
    pub fn builder() -> DupBuilder {
        DupBuilder::default()
    }

    /// Register holding the destination address.
    pub fn reg_addr(&self) -> u32 {
        self.reg_addr
    }

    /// Register holding the output device index.
    pub fn reg_dev(&self) -> u32 {
        self.reg_dev
    }

    /// Decode the nested `NFTA_EXPR_DATA` block of a dup expression.
    ///
    /// Unknown attribute types are skipped and absent registers stay `0`.
    pub fn parse_data(data: &[u8]) -> Result<Self> {
        let mut builder = Self::builder();

        for (kind, payload) in parse_attrs(data)? {
            match kind {
                NFTA_DUP_SREG_ADDR => builder = builder.reg_addr(get::u32_be(payload)?),
                NFTA_DUP_SREG_DEV => builder = builder.reg_dev(get::u32_be(payload)?),
                other => {
                    tracing::trace!(attr = other, len = payload.len(), "skipping dup attribute")
                }
            }
        }

        Ok(builder.build())
    }

    /// Decode a complete expression (name and data envelope).
    ///
    /// Fails with [`Error::UnexpectedExpression`] when the bytes carry an
    /// expression other than `dup`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match Expr::from_bytes(data)? {
            Expr::Dup(dup) => Ok(dup),
            other => Err(Error::UnexpectedExpression {
                expected: NAME,
                actual: other.name().to_string(),
            }),
        }
    }
}

impl ExprConfig for Dup {
    fn name(&self) -> &'static str {
        NAME
    }

    fn write_data(&self, builder: &mut AttrBuilder) -> Result<()> {
        builder.append_attr_u32_be(NFTA_DUP_SREG_ADDR, self.reg_addr)?;
        builder.append_attr_u32_be(NFTA_DUP_SREG_DEV, self.reg_dev)?;
        Ok(())
    }
}

impl fmt::Display for Dup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dup to reg {}", self.reg_addr)?;
        if self.reg_dev != 0 {
            write!(f, " device reg {}", self.reg_dev)?;
        }
        Ok(())
    }
}

/// Accumulates dup parameters; unset registers build as `0`.
#[derive(Debug, Clone, Default)]
pub struct DupBuilder {
    reg_addr: Option<u32>,
    reg_dev: Option<u32>,
}

impl DupBuilder {
    /// Set the address register.
    pub fn reg_addr(mut self, reg: u32) -> Self {
        self.reg_addr = Some(reg);
        self
    }

    /// Set the device register.
    pub fn reg_dev(mut self, reg: u32) -> Self {
        self.reg_dev = Some(reg);
        self
    }

    /// Build the expression.
    pub fn build(self) -> Dup {
        Dup {
            reg_addr: self.reg_addr.unwrap_or(0),
            reg_dev: self.reg_dev.unwrap_or(0),
        }
    }
}
