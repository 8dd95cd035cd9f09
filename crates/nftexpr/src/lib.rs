//! nf_tables expression codec.
//!
//! This crate encodes nf_tables expressions into the netlink attribute
//! format consumed by the kernel and decodes them back. It covers the
//! attribute framing layer and the `dup` expression; sockets, rule
//! assembly and batching are out of scope.
//!
//! # Features
//!
//! - `serde` - Serialize/Deserialize for expression types
//!
//! # Example
//!
//! ```ignore
//! use nftexpr::nftables::{Dup, Expr, ExprConfig, reg};
//!
//! // dup to <addr in reg 1> device <ifindex in reg 2>
//! let dup = Dup::new(reg::NFT_REG_1, reg::NFT_REG_2);
//! let bytes = dup.to_bytes()?;
//!
//! let expr = Expr::from_bytes(&bytes)?;
//! println!("{}", expr); // dup to reg 1 device reg 2
//! ```

pub mod netlink;
pub mod nftables;

// Re-export common types at crate root for convenience
pub use netlink::{Error, Result};
pub use nftables::{Dup, Expr, ExprConfig};
