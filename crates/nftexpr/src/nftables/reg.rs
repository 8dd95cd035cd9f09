//! nf_tables register indices (enum nft_registers).
//!
//! Registers can be addressed as four 128-bit registers or as sixteen
//! 32-bit registers. Expressions carry the index as a plain `u32`.

/// Verdict register.
pub const NFT_REG_VERDICT: u32 = 0;
/// 128-bit register 1.
pub const NFT_REG_1: u32 = 1;
/// 128-bit register 2.
pub const NFT_REG_2: u32 = 2;
/// 128-bit register 3.
pub const NFT_REG_3: u32 = 3;
/// 128-bit register 4.
pub const NFT_REG_4: u32 = 4;

/// First 32-bit register.
pub const NFT_REG32_00: u32 = 8;
/// Last 32-bit register.
pub const NFT_REG32_15: u32 = 23;

/// Index of the `n`th 32-bit register, if `n < 16`.
pub const fn reg32(n: u32) -> Option<u32> {
    if n < 16 { Some(NFT_REG32_00 + n) } else { None }
}

/// Check whether `reg` names an existing register.
pub const fn is_valid(reg: u32) -> bool {
    reg <= NFT_REG_4 || (reg >= NFT_REG32_00 && reg <= NFT_REG32_15)
}
