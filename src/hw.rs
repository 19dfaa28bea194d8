// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

//! Scalar hardware CRC paths.
//!
//! x86_64 exposes a CRC-32C instruction with SSE4.2; AArch64's CRC extension
//! covers both the ISO-3309 and Castagnoli polynomials. Each path aligns to
//! an 8-byte boundary with byte instructions, consumes aligned words with
//! the 64-bit instruction, and finishes the tail byte by byte. No tables.

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86 {
    use std::arch::x86_64::{_mm_crc32_u64, _mm_crc32_u8};

    pub(crate) fn is_supported() -> bool {
        is_x86_feature_detected!("sse4.2")
    }

    pub(crate) fn crc32c(previous_crc: u32, bytes: &[u8]) -> u32 {
        unsafe { crc32c_sse42(previous_crc, bytes) }
    }

    #[target_feature(enable = "sse4.2")]
    unsafe fn crc32c_sse42(previous_crc: u32, bytes: &[u8]) -> u32 {
        let mut crc = !previous_crc;
        let (head, words, tail) = bytes.align_to::<u64>();
        for &byte in head {
            crc = _mm_crc32_u8(crc, byte);
        }
        let mut wide = u64::from(crc);
        for &word in words {
            wide = _mm_crc32_u64(wide, word);
        }
        crc = wide as u32;
        for &byte in tail {
            crc = _mm_crc32_u8(crc, byte);
        }
        !crc
    }
}

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64 {
    use std::arch::aarch64::{__crc32b, __crc32cb, __crc32cd, __crc32d};
    use std::arch::is_aarch64_feature_detected;

    pub(crate) fn is_supported() -> bool {
        is_aarch64_feature_detected!("crc")
    }

    pub(crate) fn crc32(previous_crc: u32, bytes: &[u8]) -> u32 {
        unsafe { crc32_armv8(previous_crc, bytes) }
    }

    pub(crate) fn crc32c(previous_crc: u32, bytes: &[u8]) -> u32 {
        unsafe { crc32c_armv8(previous_crc, bytes) }
    }

    #[target_feature(enable = "crc")]
    unsafe fn crc32_armv8(previous_crc: u32, bytes: &[u8]) -> u32 {
        let mut crc = !previous_crc;
        let (head, words, tail) = bytes.align_to::<u64>();
        for &byte in head {
            crc = __crc32b(crc, byte);
        }
        for &word in words {
            crc = __crc32d(crc, word);
        }
        for &byte in tail {
            crc = __crc32b(crc, byte);
        }
        !crc
    }

    #[target_feature(enable = "crc")]
    unsafe fn crc32c_armv8(previous_crc: u32, bytes: &[u8]) -> u32 {
        let mut crc = !previous_crc;
        let (head, words, tail) = bytes.align_to::<u64>();
        for &byte in head {
            crc = __crc32cb(crc, byte);
        }
        for &word in words {
            crc = __crc32cd(crc, word);
        }
        for &byte in tail {
            crc = __crc32cb(crc, byte);
        }
        !crc
    }
}
