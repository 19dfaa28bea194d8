// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

//! x86_64 implementation of the carryless-multiply folding operations.

use crate::constants::MASKS_SHIFTS;
use std::arch::x86_64::*;
use std::ops::BitXor;

pub(crate) mod vpclmulqdq;

#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
pub(crate) struct Simd(__m128i);

/// Loads a 16-byte shuffle or mask window from the pattern table.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn pattern(offset: usize) -> __m128i {
    debug_assert!(offset + 16 <= MASKS_SHIFTS.0.len());
    _mm_loadu_si128(MASKS_SHIFTS.0.as_ptr().add(offset) as *const _)
}

impl super::SimdExt for Simd {
    fn is_supported() -> bool {
        is_x86_feature_detected!("pclmulqdq") // _mm_clmulepi64_si128
            && is_x86_feature_detected!("ssse3") // _mm_shuffle_epi8
            && is_x86_feature_detected!("sse4.1") // _mm_extract_epi64
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn new(high: u64, low: u64) -> Self {
        Self(_mm_set_epi64x(high as i64, low as i64))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn load(src: *const u8) -> Self {
        Self(_mm_loadu_si128(src as *const _))
    }

    #[inline]
    #[target_feature(enable = "sse2", enable = "pclmulqdq")]
    unsafe fn fold_16(self, coeff: Self) -> Self {
        let h = Self(_mm_clmulepi64_si128::<0x11>(self.0, coeff.0));
        let l = Self(_mm_clmulepi64_si128::<0x00>(self.0, coeff.0));
        h ^ l
    }

    #[inline]
    #[target_feature(enable = "sse2", enable = "pclmulqdq")]
    unsafe fn fold_8(self, coeff: u64) -> Self {
        let coeff = Self::new(0, coeff);
        let h = Self(_mm_clmulepi64_si128::<0x00>(self.0, coeff.0));
        let l = Self(_mm_srli_si128::<8>(self.0));
        h ^ l
    }

    #[inline]
    #[target_feature(enable = "sse2", enable = "sse4.1", enable = "pclmulqdq")]
    unsafe fn barrett(self, poly: u64, mu: u64) -> u64 {
        let polymu = Self::new(poly, mu);
        let t1 = _mm_clmulepi64_si128::<0x00>(self.0, polymu.0);
        let h = Self(_mm_slli_si128::<8>(t1));
        let l = Self(_mm_clmulepi64_si128::<0x10>(t1, polymu.0));
        let reduced = h ^ l ^ self;
        _mm_extract_epi64::<1>(reduced.0) as u64
    }

    #[inline]
    #[target_feature(enable = "sse2", enable = "pclmulqdq")]
    unsafe fn clmul_low(self, coeff: u64) -> Self {
        let coeff = Self::new(0, coeff);
        Self(_mm_clmulepi64_si128::<0x00>(self.0, coeff.0))
    }

    #[inline]
    #[target_feature(enable = "sse2", enable = "pclmulqdq")]
    unsafe fn clmul_high(self, coeff: u64) -> Self {
        let coeff = Self::new(0, coeff);
        Self(_mm_clmulepi64_si128::<0x01>(self.0, coeff.0))
    }

    #[inline]
    #[target_feature(enable = "sse2", enable = "ssse3")]
    unsafe fn shift_right_bytes(self, count: usize) -> Self {
        Self(_mm_shuffle_epi8(self.0, pattern(16 + count)))
    }

    #[inline]
    #[target_feature(enable = "sse2", enable = "ssse3")]
    unsafe fn shift_left_bytes(self, count: usize) -> Self {
        Self(_mm_shuffle_epi8(self.0, pattern(16 - count)))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn mask_high_bytes(self, count: usize) -> Self {
        Self(_mm_and_si128(self.0, pattern(48 + count)))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn even_dwords(self) -> Self {
        Self(_mm_slli_epi64::<32>(self.0))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn odd_dwords(self) -> Self {
        Self(_mm_srli_epi64::<32>(self.0))
    }

    #[inline]
    #[target_feature(enable = "sse2", enable = "sse4.1")]
    unsafe fn high_64(self) -> u64 {
        _mm_extract_epi64::<1>(self.0) as u64
    }
}

impl BitXor for Simd {
    type Output = Self;

    fn bitxor(self, other: Self) -> Self {
        Self(unsafe { _mm_xor_si128(self.0, other.0) })
    }
}
