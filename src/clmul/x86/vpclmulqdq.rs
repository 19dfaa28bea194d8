// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

//! Wide folding with VPCLMULQDQ on 512-bit registers.
//!
//! Four ZMM registers hold sixteen interleaved 128-bit folding streams and
//! consume 256 bytes per step against the x^2048 pair. The registers are then
//! folded together through the x^1536, x^1024 and x^512 pairs, the surviving
//! lanes reduced to one 128-bit register, and the rest handed to the shared
//! 16-byte/tail/Barrett path.

use super::super::{coeff, fold_by_16_and_finalize_32, fold_by_16_and_finalize_64, SimdExt};
use super::Simd;
use crate::constants::{self, Crc32Constants, Crc64Constants};
use crate::table;
use lazy_static::lazy_static;
use std::arch::x86_64::*;
use std::ops::BitXor;

#[derive(Copy, Clone, Debug)]
pub(crate) struct Simd512(__m512i);

lazy_static! {
    static ref WIDE_SUPPORTED: bool = {
        is_x86_feature_detected!("avx512f")
            && is_x86_feature_detected!("vpclmulqdq")
            && Simd::is_supported() // the shared 128-bit reduction path
    };
}

pub(crate) fn is_supported() -> bool {
    *WIDE_SUPPORTED
}

pub(crate) fn crc32(previous_crc: u32, bytes: &[u8]) -> u32 {
    if bytes.len() < 256 {
        if bytes.len() < 16 {
            return table::crc32(previous_crc, bytes);
        }
        return unsafe { super::super::fold_32(&constants::CRC32, previous_crc, bytes) };
    }
    unsafe { fold_wide_32(&constants::CRC32, previous_crc, bytes) }
}

pub(crate) fn crc32c(previous_crc: u32, bytes: &[u8]) -> u32 {
    if bytes.len() < 256 {
        if bytes.len() < 16 {
            return table::crc32c(previous_crc, bytes);
        }
        return unsafe { super::super::fold_32(&constants::CRC32C, previous_crc, bytes) };
    }
    unsafe { fold_wide_32(&constants::CRC32C, previous_crc, bytes) }
}

pub(crate) fn crc64_xz(previous_crc: u64, bytes: &[u8]) -> u64 {
    if bytes.len() < 256 {
        return unsafe { super::super::fold_64(&constants::CRC64_XZ, previous_crc, bytes) };
    }
    unsafe { fold_wide_64(&constants::CRC64_XZ, previous_crc, bytes) }
}

pub(crate) fn crc64_nvme(previous_crc: u64, bytes: &[u8]) -> u64 {
    if bytes.len() < 256 {
        return unsafe { super::super::fold_64(&constants::CRC64_NVME, previous_crc, bytes) };
    }
    unsafe { fold_wide_64(&constants::CRC64_NVME, previous_crc, bytes) }
}

impl Simd512 {
    /// Places an inverted CRC seed in the low 64 bits, everything else zero.
    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn seed(state: u64) -> Self {
        Self(_mm512_set_epi64(0, 0, 0, 0, 0, 0, 0, state as i64))
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn load(src: *const u8) -> Self {
        Self(_mm512_loadu_si512(src as *const _))
    }

    /// Materializes the four duplicated copies of a folding pair with one
    /// 64-byte aligned load.
    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn load_coeff(pairs: &[u64; 8]) -> Self {
        Self(_mm512_load_si512(pairs.as_ptr() as *const _))
    }

    /// Performs a CRC folding step across all four 128-bit lanes at once.
    #[inline]
    #[target_feature(enable = "avx512f", enable = "vpclmulqdq")]
    unsafe fn fold_64(self, coeff: Self) -> Self {
        let h = Self(_mm512_clmulepi64_epi128::<0x11>(self.0, coeff.0));
        let l = Self(_mm512_clmulepi64_epi128::<0x00>(self.0, coeff.0));
        h ^ l
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn extract<const LANE: i32>(self) -> Simd {
        Simd(_mm512_extracti32x4_epi32::<LANE>(self.0))
    }
}

impl BitXor for Simd512 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, other: Self) -> Self {
        Self(unsafe { _mm512_xor_si512(self.0, other.0) })
    }
}

#[target_feature(
    enable = "avx512f",
    enable = "vpclmulqdq",
    enable = "sse2",
    enable = "ssse3",
    enable = "sse4.1",
    enable = "pclmulqdq"
)]
unsafe fn fold_wide_64(consts: &Crc64Constants, previous_crc: u64, bytes: &[u8]) -> u64 {
    let (a1, offset) = fold_by_256(
        !previous_crc,
        bytes,
        &consts.x2048,
        &consts.x1536,
        &consts.x1024,
        &consts.x512,
        coeff(&consts.x384),
        coeff(&consts.x256),
        coeff(&consts.x128),
    );
    fold_by_16_and_finalize_64(consts, a1, bytes, offset)
}

#[target_feature(
    enable = "avx512f",
    enable = "vpclmulqdq",
    enable = "sse2",
    enable = "ssse3",
    enable = "sse4.1",
    enable = "pclmulqdq"
)]
unsafe fn fold_wide_32(consts: &Crc32Constants, previous_crc: u32, bytes: &[u8]) -> u32 {
    let (a1, offset) = fold_by_256(
        u64::from(!previous_crc),
        bytes,
        &consts.x2048,
        &consts.x1536,
        &consts.x1024,
        &consts.x512,
        coeff(&consts.x384),
        coeff(&consts.x256),
        coeff(&consts.x128),
    );
    fold_by_16_and_finalize_32(consts, a1, bytes, offset)
}

/// Folds 256-byte blocks through four 512-bit registers, then reduces the
/// four registers to one by folding across their 192/128/64-byte distances
/// (x^1536, x^1024, x^512), and the surviving four lanes to one 128-bit
/// register. Requires `bytes.len() >= 256`.
#[target_feature(
    enable = "avx512f",
    enable = "vpclmulqdq",
    enable = "sse2",
    enable = "pclmulqdq"
)]
unsafe fn fold_by_256(
    state: u64,
    bytes: &[u8],
    x2048: &[u64; 8],
    x1536: &[u64; 8],
    x1024: &[u64; 8],
    x512: &[u64; 8],
    x384: Simd,
    x256: Simd,
    x128: Simd,
) -> (Simd, usize) {
    let mut z0 = Simd512::load(bytes.as_ptr()) ^ Simd512::seed(state);
    let mut z1 = Simd512::load(bytes.as_ptr().add(64));
    let mut z2 = Simd512::load(bytes.as_ptr().add(128));
    let mut z3 = Simd512::load(bytes.as_ptr().add(192));
    let mut offset = 256;

    let k2048 = Simd512::load_coeff(x2048);
    while bytes.len() - offset >= 256 {
        z0 = z0.fold_64(k2048) ^ Simd512::load(bytes.as_ptr().add(offset));
        z1 = z1.fold_64(k2048) ^ Simd512::load(bytes.as_ptr().add(offset + 64));
        z2 = z2.fold_64(k2048) ^ Simd512::load(bytes.as_ptr().add(offset + 128));
        z3 = z3.fold_64(k2048) ^ Simd512::load(bytes.as_ptr().add(offset + 192));
        offset += 256;
    }

    let z = z3
        ^ z0.fold_64(Simd512::load_coeff(x1536))
        ^ z1.fold_64(Simd512::load_coeff(x1024))
        ^ z2.fold_64(Simd512::load_coeff(x512));

    let a1 = z.extract::<3>()
        ^ z.extract::<0>().fold_16(x384)
        ^ z.extract::<1>().fold_16(x256)
        ^ z.extract::<2>().fold_16(x128);
    (a1, offset)
}
