// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

//! Carryless-multiply CRC folding engine.
//!
//! The implementation is based on Intel's "Fast CRC Computation for Generic
//! Polynomials Using PCLMULQDQ Instruction" [white paper], extended with
//! per-length trailing constants so that tails of 1..15 bytes fold directly
//! instead of going through a scalar loop.
//!
//! The engine is written once against a 16-byte [`Simd`](arch::Simd) type;
//! the platform-specific pieces (PCLMULQDQ on x86_64, PMULL on AArch64, a
//! `u128` software model behind the `fake-simd` feature) live in the `arch`
//! modules and implement [`SimdExt`].
//!
//! [white paper]: https://www.intel.com/content/dam/www/public/us/en/documents/white-papers/fast-crc-computation-generic-polynomials-pclmulqdq-paper.pdf

#[cfg(not(feature = "fake-simd"))]
#[cfg_attr(target_arch = "x86_64", path = "x86/mod.rs")]
#[cfg_attr(target_arch = "aarch64", path = "aarch64.rs")]
mod arch;

#[cfg(feature = "fake-simd")]
mod arch;

use self::arch::Simd;
use crate::constants::{self, Crc32Constants, Crc64Constants};
use crate::table;
use std::{
    fmt::Debug,
    ops::{BitXor, BitXorAssign},
};

#[cfg(all(target_arch = "x86_64", not(feature = "fake-simd")))]
pub(crate) use self::arch::vpclmulqdq;

/// This trait must be implemented on `self::arch::Simd` to provide the
/// platform-specific SIMD operations of the folding engine.
trait SimdExt: Copy + Debug + BitXor<Output = Self> {
    /// Returns whether the carryless-multiply engine is usable on this CPU.
    fn is_supported() -> bool;

    /// Creates a new 128-bit integer from the 64-bit halves.
    unsafe fn new(high: u64, low: u64) -> Self;

    /// Loads 16 bytes from a possibly unaligned address.
    unsafe fn load(src: *const u8) -> Self;

    /// Performs a CRC folding step across 16 bytes.
    ///
    /// Should return `(coeff.low_64 ⊗ self.low_64) ⊕ (coeff.high_64 ⊗ self.high_64)`,
    /// where ⊕ is XOR and ⊗ is carryless multiplication.
    unsafe fn fold_16(self, coeff: Self) -> Self;

    /// Performs a CRC folding step across 8 bytes.
    ///
    /// Should return `self.high_64 ⊕ (coeff ⊗ self.low_64)`,
    /// where ⊕ is XOR and ⊗ is carryless multiplication.
    unsafe fn fold_8(self, coeff: u64) -> Self;

    /// Performs Barrett reduction to finalize a 64-bit CRC.
    ///
    /// Should return `(self ⊕ ((self.low_64 ⊗ mu).low_64 ⊗ (poly ⊕ 2^64))).high_64`,
    /// where ⊕ is XOR and ⊗ is carryless multiplication.
    unsafe fn barrett(self, poly: u64, mu: u64) -> u64;

    /// Returns the full 128-bit carryless product `coeff ⊗ self.low_64`.
    unsafe fn clmul_low(self, coeff: u64) -> Self;

    /// Returns the full 128-bit carryless product `coeff ⊗ self.high_64`.
    unsafe fn clmul_high(self, coeff: u64) -> Self;

    /// Shifts right by `count` bytes (toward the least significant byte),
    /// filling with zeroes. `count` must be at most 16.
    unsafe fn shift_right_bytes(self, count: usize) -> Self;

    /// Shifts left by `count` bytes, filling with zeroes. `count` at most 16.
    unsafe fn shift_left_bytes(self, count: usize) -> Self;

    /// Keeps the most significant `count` bytes, zeroing the rest.
    /// `count` must be in 1..=16.
    unsafe fn mask_high_bytes(self, count: usize) -> Self;

    /// Shifts both 64-bit halves left by 32 bits, moving the even 32-bit
    /// words of the register into the upper word of each half.
    unsafe fn even_dwords(self) -> Self;

    /// Shifts both 64-bit halves right by 32 bits, moving the odd 32-bit
    /// words of the register into the lower word of each half.
    unsafe fn odd_dwords(self) -> Self;

    /// Returns the high 64 bits.
    unsafe fn high_64(self) -> u64;
}

impl PartialEq for Simd {
    fn eq(&self, other: &Self) -> bool {
        unsafe {
            use std::mem::transmute;
            let a: u128 = transmute(*self);
            let b: u128 = transmute(*other);
            a == b
        }
    }
}

impl Eq for Simd {}

impl BitXorAssign for Simd {
    fn bitxor_assign(&mut self, other: Self) {
        *self = *self ^ other;
    }
}

pub(crate) fn is_supported() -> bool {
    Simd::is_supported()
}

pub(crate) fn crc32(previous_crc: u32, bytes: &[u8]) -> u32 {
    // Below one register of input the vector setup costs more than it saves.
    if bytes.len() < 16 {
        return table::crc32(previous_crc, bytes);
    }
    unsafe { fold_32(&constants::CRC32, previous_crc, bytes) }
}

pub(crate) fn crc32c(previous_crc: u32, bytes: &[u8]) -> u32 {
    if bytes.len() < 16 {
        return table::crc32c(previous_crc, bytes);
    }
    unsafe { fold_32(&constants::CRC32C, previous_crc, bytes) }
}

pub(crate) fn crc64_xz(previous_crc: u64, bytes: &[u8]) -> u64 {
    unsafe { fold_64(&constants::CRC64_XZ, previous_crc, bytes) }
}

pub(crate) fn crc64_nvme(previous_crc: u64, bytes: &[u8]) -> u64 {
    unsafe { fold_64(&constants::CRC64_NVME, previous_crc, bytes) }
}

/// Builds the coefficient register for a stored constant pair. Pairs are
/// stored `[x^(w+64) mod P, x^w mod P]`, so the low lane receives the larger
/// exponent, matching the lane that holds the older half of the data.
unsafe fn coeff(pair: &[u64]) -> Simd {
    Simd::new(pair[1], pair[0])
}

#[cfg_attr(
    all(target_arch = "x86_64", not(feature = "fake-simd")),
    target_feature(enable = "sse2", enable = "ssse3", enable = "sse4.1", enable = "pclmulqdq")
)]
#[cfg_attr(
    all(target_arch = "aarch64", not(feature = "fake-simd")),
    target_feature(enable = "neon", enable = "aes")
)]
unsafe fn fold_64(consts: &Crc64Constants, previous_crc: u64, bytes: &[u8]) -> u64 {
    if bytes.is_empty() {
        return previous_crc;
    }

    // Invert the previous CRC bits into the low half of a folding register.
    let mut a1 = Simd::new(0, !previous_crc);

    if bytes.len() < 16 {
        // Stage the input in a zeroed buffer so the 16-byte load cannot touch
        // memory outside the caller's slice.
        let mut buf = [0u8; 16];
        buf[..bytes.len()].copy_from_slice(bytes);
        a1 ^= Simd::load(buf.as_ptr());
        if bytes.len() <= 8 {
            // Left shifting by the unused bytes multiplies by x^64.
            a1 = a1.shift_left_bytes(8 - bytes.len());
        } else {
            // Shift the data to the top of the register, then fold the low
            // half into the high half with one multiply by x^128.
            a1 = a1.shift_left_bytes(16 - bytes.len());
            a1 = a1.fold_8(consts.x128[1]);
        }
        return !a1.barrett(consts.mu_poly[1], consts.mu_poly[0]);
    }

    a1 ^= Simd::load(bytes.as_ptr());
    let mut offset = 16;

    if bytes.len() - offset >= 48 {
        let folded = fold_by_64(
            a1,
            bytes,
            offset,
            coeff(&consts.x512),
            coeff(&consts.x384),
            coeff(&consts.x256),
            coeff(&consts.x128),
        );
        a1 = folded.0;
        offset = folded.1;
    }

    fold_by_16_and_finalize_64(consts, a1, bytes, offset)
}

#[cfg_attr(
    all(target_arch = "x86_64", not(feature = "fake-simd")),
    target_feature(enable = "sse2", enable = "ssse3", enable = "sse4.1", enable = "pclmulqdq")
)]
#[cfg_attr(
    all(target_arch = "aarch64", not(feature = "fake-simd")),
    target_feature(enable = "neon", enable = "aes")
)]
unsafe fn fold_32(consts: &Crc32Constants, previous_crc: u32, bytes: &[u8]) -> u32 {
    debug_assert!(bytes.len() >= 16);

    // Invert the previous CRC bits into the low half of a folding register.
    let mut a1 = Simd::new(0, u64::from(!previous_crc));
    a1 ^= Simd::load(bytes.as_ptr());
    let mut offset = 16;

    if bytes.len() - offset >= 48 {
        let folded = fold_by_64(
            a1,
            bytes,
            offset,
            coeff(&consts.x512),
            coeff(&consts.x384),
            coeff(&consts.x256),
            coeff(&consts.x128),
        );
        a1 = folded.0;
        offset = folded.1;
    }

    fold_by_16_and_finalize_32(consts, a1, bytes, offset)
}

/// Folds 64-byte blocks through four independent 128-bit registers to expose
/// instruction-level parallelism, then reduces back to one register:
/// `a1 := d1 ^ a1·x^384 ^ b1·x^256 ^ c1·x^128`.
///
/// Entered with one register already populated and at least 48 unconsumed
/// bytes. Returns the folded register and the new offset.
#[cfg_attr(
    all(target_arch = "x86_64", not(feature = "fake-simd")),
    target_feature(enable = "sse2", enable = "ssse3", enable = "sse4.1", enable = "pclmulqdq")
)]
#[cfg_attr(
    all(target_arch = "aarch64", not(feature = "fake-simd")),
    target_feature(enable = "neon", enable = "aes")
)]
unsafe fn fold_by_64(
    mut a1: Simd,
    bytes: &[u8],
    mut offset: usize,
    x512: Simd,
    x384: Simd,
    x256: Simd,
    x128: Simd,
) -> (Simd, usize) {
    let mut b1 = Simd::load(bytes.as_ptr().add(offset));
    let mut c1 = Simd::load(bytes.as_ptr().add(offset + 16));
    let mut d1 = Simd::load(bytes.as_ptr().add(offset + 32));
    offset += 48;

    while bytes.len() - offset >= 64 {
        a1 = a1.fold_16(x512) ^ Simd::load(bytes.as_ptr().add(offset));
        b1 = b1.fold_16(x512) ^ Simd::load(bytes.as_ptr().add(offset + 16));
        c1 = c1.fold_16(x512) ^ Simd::load(bytes.as_ptr().add(offset + 32));
        d1 = d1.fold_16(x512) ^ Simd::load(bytes.as_ptr().add(offset + 48));
        offset += 64;
    }

    (d1 ^ a1.fold_16(x384) ^ b1.fold_16(x256) ^ c1.fold_16(x128), offset)
}

/// Consumes the remaining 16-byte blocks, folds in any 1..15-byte tail via
/// the per-length trailing constants, and Barrett reduces to the final CRC.
/// Requires `bytes.len() >= 16`.
#[cfg_attr(
    all(target_arch = "x86_64", not(feature = "fake-simd")),
    target_feature(enable = "sse2", enable = "ssse3", enable = "sse4.1", enable = "pclmulqdq")
)]
#[cfg_attr(
    all(target_arch = "aarch64", not(feature = "fake-simd")),
    target_feature(enable = "neon", enable = "aes")
)]
unsafe fn fold_by_16_and_finalize_64(
    consts: &Crc64Constants,
    mut a1: Simd,
    bytes: &[u8],
    mut offset: usize,
) -> u64 {
    let x128 = coeff(&consts.x128);
    while bytes.len() - offset >= 16 {
        a1 = a1.fold_16(x128) ^ Simd::load(bytes.as_ptr().add(offset));
        offset += 16;
    }

    let remaining = bytes.len() - offset;
    if remaining > 0 {
        // Multiply the running remainder past the tail, then fold in the tail
        // itself: a safe load of the 16 bytes ending at the input's end, with
        // the leading already-consumed bytes masked away.
        a1 = a1.fold_16(coeff(&consts.trailing[remaining - 1]));
        let trailing =
            Simd::load(bytes.as_ptr().add(bytes.len() - 16)).mask_high_bytes(remaining);
        a1 ^= trailing.fold_8(consts.x128[1]);
    } else {
        a1 = a1.fold_8(consts.x128[1]);
    }

    !a1.barrett(consts.mu_poly[1], consts.mu_poly[0])
}

/// The 32-bit counterpart of [`fold_by_16_and_finalize_64`]. The final fold
/// from 16 bytes to 8 also multiplies the residue by x^32, per the CRC-32
/// definition, routing each 32-bit word through the x64/x128 constants.
#[cfg_attr(
    all(target_arch = "x86_64", not(feature = "fake-simd")),
    target_feature(enable = "sse2", enable = "ssse3", enable = "sse4.1", enable = "pclmulqdq")
)]
#[cfg_attr(
    all(target_arch = "aarch64", not(feature = "fake-simd")),
    target_feature(enable = "neon", enable = "aes")
)]
unsafe fn fold_by_16_and_finalize_32(
    consts: &Crc32Constants,
    mut a1: Simd,
    bytes: &[u8],
    mut offset: usize,
) -> u32 {
    let x128 = coeff(&consts.x128);
    while bytes.len() - offset >= 16 {
        a1 = a1.fold_16(x128) ^ Simd::load(bytes.as_ptr().add(offset));
        offset += 16;
    }

    let remaining = bytes.len() - offset;
    if remaining > 0 {
        a1 = a1.fold_16(coeff(&consts.trailing[remaining - 1]));
        a1 ^= Simd::load(bytes.as_ptr().add(bytes.len() - 16)).mask_high_bytes(remaining);
    }

    // Split the residue into its even and odd 32-bit words and multiply each
    // by x^32 plus its distance from the end of the input.
    let even = a1.even_dwords();
    let odd = a1.odd_dwords();
    let dword0 = even.clmul_low(consts.x128[1] >> 32); // word 0 by x^128
    let dword1 = odd.clmul_low(consts.x64[0]); //          word 1 by x^96
    let dword2 = even.clmul_high(consts.x64[1]); //        word 2 by x^64
    let dword3 = odd.shift_right_bytes(4); //              word 3 by x^32
    a1 = dword3 ^ dword0 ^ dword1 ^ dword2;

    // Barrett reduction; the CRC lands in the low word of the upper half.
    let mul_by_mu = a1.clmul_low(consts.mu_poly[0]);
    let reduced = a1 ^ mul_by_mu.clmul_low(consts.mu_poly[1]);
    !(reduced.high_64() as u32)
}
