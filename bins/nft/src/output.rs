//! Output formatting utilities for nft-expr.

use anyhow::{Context, bail};
use nftexpr::Expr;

/// Encode bytes as lowercase hex.
pub fn hex_encode(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decode a hex string to bytes. Whitespace is ignored.
pub fn hex_decode(s: &str) -> anyhow::Result<Vec<u8>> {
    let digits: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if let Some(&bad) = digits.iter().find(|b| !b.is_ascii_hexdigit()) {
        bail!("invalid hex digit {:?}", bad as char);
    }
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits ({})", digits.len());
    }

    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).context("invalid hex input")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex byte {:?}", pair))
        })
        .collect()
}

/// Print a decoded expression as text or JSON.
pub fn print_expr(expr: &Expr, json: bool, pretty: bool) -> anyhow::Result<()> {
    if json {
        let out = if pretty {
            serde_json::to_string_pretty(expr)?
        } else {
            serde_json::to_string(expr)?
        };
        println!("{}", out);
    } else {
        println!("{}", expr);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode(&[0x64, 0x75, 0x70, 0x00]), "64757000");
        assert_eq!(hex_encode(&[]), "");
    }

    #[test]
    fn test_hex_decode() {
        assert_eq!(hex_decode("64757000").unwrap(), vec![0x64, 0x75, 0x70, 0]);
        assert_eq!(hex_decode("64 75\n70 00\n").unwrap(), vec![0x64, 0x75, 0x70, 0]);
        assert_eq!(hex_decode("FF").unwrap(), vec![0xff]);
        assert!(hex_decode("abc").is_err());
        assert!(hex_decode("zz").is_err());
        assert!(hex_decode("+1").is_err());
    }
}
