// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

//! `crcfold`
//! =========
//!
//! SIMD-accelerated CRC-32, CRC-32C, CRC-64/XZ and CRC-64/NVMe computation
//! (similar to [`crc32fast`](https://crates.io/crates/crc32fast) and
//! [`crc64fast`](https://crates.io/crates/crc64fast), with all four variants
//! behind one dispatcher).
//!
//! Every function maps a byte slice plus the previous CRC to the updated
//! CRC, so arbitrarily large streams can be processed in chunks; pass 0 to
//! start fresh. All variants are bit-reflected with inverted input and
//! output bits.
//!
//! ## Usage
//!
//! ```
//! let mut crc = crcfold::crc64_xz(b"hello ", 0);
//! crc = crcfold::crc64_xz(b"world!", crc);
//! assert_eq!(crc, 0x8483_c0fa_3260_7d61);
//!
//! assert_eq!(crcfold::crc32(b"123456789", 0), 0xcbf4_3926);
//! ```
//!
//! The first call per variant probes the CPU once and binds the fastest
//! available implementation: VPCLMULQDQ on 512-bit registers, PCLMULQDQ /
//! PMULL folding on 128-bit registers, a native CRC instruction (CRC-32C on
//! x86_64, both 32-bit variants on AArch64), or a slice-by-8 table.

mod clmul;
mod constants;
#[cfg(not(feature = "fake-simd"))]
mod hw;
pub mod poly;
mod reference;
mod table;

use lazy_static::lazy_static;

type Crc32Fn = fn(u32, &[u8]) -> u32;
type Crc64Fn = fn(u64, &[u8]) -> u64;

/// The fold engines index with signed 32-bit arithmetic internally; the
/// public entry points hand them chunks no larger than this and chain the
/// CRCs across chunks.
const MAX_CHUNK: usize = i32::MAX as usize;

lazy_static! {
    static ref CRC32_FN: Crc32Fn = select_crc32();
    static ref CRC32C_FN: Crc32Fn = select_crc32c();
    static ref CRC64_XZ_FN: Crc64Fn = select_crc64_xz();
    static ref CRC64_NVME_FN: Crc64Fn = select_crc64_nvme();
}

/// Computes the CRC-32 (ISO-3309, gzip) of `bytes`, continuing from
/// `previous_crc`. Pass 0 to start a fresh CRC.
pub fn crc32(bytes: &[u8], previous_crc: u32) -> u32 {
    bytes
        .chunks(MAX_CHUNK)
        .fold(previous_crc, |crc, chunk| (*CRC32_FN)(crc, chunk))
}

/// Computes the Castagnoli CRC-32C (iSCSI) of `bytes`, continuing from
/// `previous_crc`. Pass 0 to start a fresh CRC.
pub fn crc32c(bytes: &[u8], previous_crc: u32) -> u32 {
    bytes
        .chunks(MAX_CHUNK)
        .fold(previous_crc, |crc, chunk| (*CRC32C_FN)(crc, chunk))
}

/// Computes the CRC-64/XZ of `bytes`, continuing from `previous_crc`.
/// Pass 0 to start a fresh CRC.
pub fn crc64_xz(bytes: &[u8], previous_crc: u64) -> u64 {
    bytes
        .chunks(MAX_CHUNK)
        .fold(previous_crc, |crc, chunk| (*CRC64_XZ_FN)(crc, chunk))
}

/// Computes the CRC-64/NVMe of `bytes`, continuing from `previous_crc`.
/// Pass 0 to start a fresh CRC.
pub fn crc64_nvme(bytes: &[u8], previous_crc: u64) -> u64 {
    bytes
        .chunks(MAX_CHUNK)
        .fold(previous_crc, |crc, chunk| (*CRC64_NVME_FN)(crc, chunk))
}

#[cfg(all(target_arch = "x86_64", not(feature = "fake-simd")))]
fn select_crc32() -> Crc32Fn {
    // No scalar-hardware rung here: the x86 crc32 instruction implements
    // only the Castagnoli polynomial.
    if clmul::vpclmulqdq::is_supported() {
        clmul::vpclmulqdq::crc32
    } else if clmul::is_supported() {
        clmul::crc32
    } else {
        table::crc32
    }
}

#[cfg(all(target_arch = "x86_64", not(feature = "fake-simd")))]
fn select_crc32c() -> Crc32Fn {
    if clmul::vpclmulqdq::is_supported() {
        clmul::vpclmulqdq::crc32c
    } else if clmul::is_supported() {
        clmul::crc32c
    } else if hw::x86::is_supported() {
        hw::x86::crc32c
    } else {
        table::crc32c
    }
}

#[cfg(all(target_arch = "x86_64", not(feature = "fake-simd")))]
fn select_crc64_xz() -> Crc64Fn {
    if clmul::vpclmulqdq::is_supported() {
        clmul::vpclmulqdq::crc64_xz
    } else if clmul::is_supported() {
        clmul::crc64_xz
    } else {
        table::crc64_xz
    }
}

#[cfg(all(target_arch = "x86_64", not(feature = "fake-simd")))]
fn select_crc64_nvme() -> Crc64Fn {
    if clmul::vpclmulqdq::is_supported() {
        clmul::vpclmulqdq::crc64_nvme
    } else if clmul::is_supported() {
        clmul::crc64_nvme
    } else {
        table::crc64_nvme
    }
}

#[cfg(all(target_arch = "aarch64", not(feature = "fake-simd")))]
fn select_crc32() -> Crc32Fn {
    if hw::aarch64::is_supported() {
        hw::aarch64::crc32
    } else if clmul::is_supported() {
        clmul::crc32
    } else {
        table::crc32
    }
}

#[cfg(all(target_arch = "aarch64", not(feature = "fake-simd")))]
fn select_crc32c() -> Crc32Fn {
    if hw::aarch64::is_supported() {
        hw::aarch64::crc32c
    } else if clmul::is_supported() {
        clmul::crc32c
    } else {
        table::crc32c
    }
}

#[cfg(all(target_arch = "aarch64", not(feature = "fake-simd")))]
fn select_crc64_xz() -> Crc64Fn {
    if clmul::is_supported() {
        clmul::crc64_xz
    } else {
        table::crc64_xz
    }
}

#[cfg(all(target_arch = "aarch64", not(feature = "fake-simd")))]
fn select_crc64_nvme() -> Crc64Fn {
    if clmul::is_supported() {
        clmul::crc64_nvme
    } else {
        table::crc64_nvme
    }
}

#[cfg(any(
    feature = "fake-simd",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
fn select_crc32() -> Crc32Fn {
    if clmul::is_supported() {
        clmul::crc32
    } else {
        table::crc32
    }
}

#[cfg(any(
    feature = "fake-simd",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
fn select_crc32c() -> Crc32Fn {
    if clmul::is_supported() {
        clmul::crc32c
    } else {
        table::crc32c
    }
}

#[cfg(any(
    feature = "fake-simd",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
fn select_crc64_xz() -> Crc64Fn {
    if clmul::is_supported() {
        clmul::crc64_xz
    } else {
        table::crc64_xz
    }
}

#[cfg(any(
    feature = "fake-simd",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
fn select_crc64_nvme() -> Crc64Fn {
    if clmul::is_supported() {
        clmul::crc64_nvme
    } else {
        table::crc64_nvme
    }
}

#[cfg(test)]
mod tests {
    use super::constants::{POLY_CRC32, POLY_CRC32C, POLY_CRC64_NVME, POLY_CRC64_XZ};
    use super::*;
    use proptest::collection::size_range;
    use proptest::prelude::*;

    const CRC_64_NVME_ALG: crc::Algorithm<u64> = crc::Algorithm {
        width: 64,
        poly: 0xad93_d235_94c9_3659,
        init: 0xffff_ffff_ffff_ffff,
        refin: true,
        refout: true,
        xorout: 0xffff_ffff_ffff_ffff,
        check: 0xae8b_1486_0a79_9888,
        residue: 0xf310_303b_2b6f_6e42,
    };

    /// Every implementation of a 32-bit variant reachable on this host.
    fn crc32_impls(variant: &str) -> Vec<(&'static str, Crc32Fn)> {
        let mut impls: Vec<(&'static str, Crc32Fn)> = Vec::new();
        match variant {
            "crc32" => {
                impls.push(("table", table::crc32 as Crc32Fn));
                if clmul::is_supported() {
                    impls.push(("clmul", clmul::crc32));
                }
                #[cfg(all(target_arch = "x86_64", not(feature = "fake-simd")))]
                if clmul::vpclmulqdq::is_supported() {
                    impls.push(("wide", clmul::vpclmulqdq::crc32));
                }
                #[cfg(all(target_arch = "aarch64", not(feature = "fake-simd")))]
                if hw::aarch64::is_supported() {
                    impls.push(("hw", hw::aarch64::crc32));
                }
                impls.push(("dispatch", |prev, bytes| crc32(bytes, prev)));
            }
            "crc32c" => {
                impls.push(("table", table::crc32c as Crc32Fn));
                if clmul::is_supported() {
                    impls.push(("clmul", clmul::crc32c));
                }
                #[cfg(all(target_arch = "x86_64", not(feature = "fake-simd")))]
                {
                    if clmul::vpclmulqdq::is_supported() {
                        impls.push(("wide", clmul::vpclmulqdq::crc32c));
                    }
                    if hw::x86::is_supported() {
                        impls.push(("hw", hw::x86::crc32c));
                    }
                }
                #[cfg(all(target_arch = "aarch64", not(feature = "fake-simd")))]
                if hw::aarch64::is_supported() {
                    impls.push(("hw", hw::aarch64::crc32c));
                }
                impls.push(("dispatch", |prev, bytes| crc32c(bytes, prev)));
            }
            _ => unreachable!(),
        }
        impls
    }

    /// Every implementation of a 64-bit variant reachable on this host.
    fn crc64_impls(variant: &str) -> Vec<(&'static str, Crc64Fn)> {
        let mut impls: Vec<(&'static str, Crc64Fn)> = Vec::new();
        match variant {
            "crc64_xz" => {
                impls.push(("table", table::crc64_xz as Crc64Fn));
                if clmul::is_supported() {
                    impls.push(("clmul", clmul::crc64_xz));
                }
                #[cfg(all(target_arch = "x86_64", not(feature = "fake-simd")))]
                if clmul::vpclmulqdq::is_supported() {
                    impls.push(("wide", clmul::vpclmulqdq::crc64_xz));
                }
                impls.push(("dispatch", |prev, bytes| crc64_xz(bytes, prev)));
            }
            "crc64_nvme" => {
                impls.push(("table", table::crc64_nvme as Crc64Fn));
                if clmul::is_supported() {
                    impls.push(("clmul", clmul::crc64_nvme));
                }
                #[cfg(all(target_arch = "x86_64", not(feature = "fake-simd")))]
                if clmul::vpclmulqdq::is_supported() {
                    impls.push(("wide", clmul::vpclmulqdq::crc64_nvme));
                }
                impls.push(("dispatch", |prev, bytes| crc64_nvme(bytes, prev)));
            }
            _ => unreachable!(),
        }
        impls
    }

    fn check_known_crc32(variant: &str, input: &[u8], expected: u32, residue: u32) {
        for (name, f) in crc32_impls(variant) {
            let result = f(0, input);
            assert_eq!(result, expected, "{variant}/{name} {input:x?}");

            // Appending the little-endian CRC must always yield the residue.
            assert_eq!(
                f(result, &result.to_le_bytes()),
                residue,
                "{variant}/{name} residue"
            );

            // Chaining two halves equals the one-shot CRC.
            let (left, right) = input.split_at(input.len() / 2);
            assert_eq!(f(f(0, left), right), expected, "{variant}/{name} chain");

            // As does feeding one byte at a time.
            let bytewise = input.iter().fold(0, |crc, &b| f(crc, &[b]));
            assert_eq!(bytewise, expected, "{variant}/{name} bytewise");

            // Empty input returns the seed unchanged.
            assert_eq!(f(expected, &[]), expected, "{variant}/{name} identity");
        }
    }

    fn check_known_crc64(variant: &str, input: &[u8], expected: u64, residue: u64) {
        for (name, f) in crc64_impls(variant) {
            let result = f(0, input);
            assert_eq!(result, expected, "{variant}/{name} {input:x?}");
            assert_eq!(
                f(result, &result.to_le_bytes()),
                residue,
                "{variant}/{name} residue"
            );
            let (left, right) = input.split_at(input.len() / 2);
            assert_eq!(f(f(0, left), right), expected, "{variant}/{name} chain");
            let bytewise = input.iter().fold(0, |crc, &b| f(crc, &[b]));
            assert_eq!(bytewise, expected, "{variant}/{name} bytewise");
            assert_eq!(f(expected, &[]), expected, "{variant}/{name} identity");
        }
    }

    const RESIDUE_CRC32: u32 = !0xdebb_20e3;
    const RESIDUE_CRC32C: u32 = !0xb798_b438;
    const RESIDUE_CRC64_XZ: u64 = !0x4995_8c9a_bd7d_353f;
    const RESIDUE_CRC64_NVME: u64 = !0xf310_303b_2b6f_6e42;

    #[test]
    fn test_known_vectors_crc32() {
        let values: Vec<u8> = (0..32).collect();
        check_known_crc32("crc32", &[0u8; 32], 0x190A_55AD, RESIDUE_CRC32);
        check_known_crc32("crc32", &values, 0x9126_7E8A, RESIDUE_CRC32);
        check_known_crc32("crc32", b"123456789", 0xCBF4_3926, RESIDUE_CRC32);
    }

    #[test]
    fn test_known_vectors_crc32c() {
        let values: Vec<u8> = (0..32).collect();
        check_known_crc32("crc32c", &[0u8; 32], 0x8A91_36AA, RESIDUE_CRC32C);
        check_known_crc32("crc32c", &values, 0x46DD_794E, RESIDUE_CRC32C);
        check_known_crc32("crc32c", b"123456789", 0xE306_9283, RESIDUE_CRC32C);
    }

    #[test]
    fn test_known_vectors_crc64_xz() {
        let values: Vec<u8> = (0..32).collect();
        check_known_crc64(
            "crc64_xz",
            &[0u8; 32],
            0xC95A_F861_7CD5_330C,
            RESIDUE_CRC64_XZ,
        );
        check_known_crc64("crc64_xz", &values, 0x7FE5_71A5_8708_4D10, RESIDUE_CRC64_XZ);
        check_known_crc64(
            "crc64_xz",
            b"123456789",
            0x995D_C9BB_DF19_39FA,
            RESIDUE_CRC64_XZ,
        );
    }

    #[test]
    fn test_known_vectors_crc64_nvme() {
        check_known_crc64(
            "crc64_nvme",
            &[0u8; 32],
            0xCF34_7343_4D4E_CF3B,
            RESIDUE_CRC64_NVME,
        );
        check_known_crc64(
            "crc64_nvme",
            b"123456789",
            0xAE8B_1486_0A79_9888,
            RESIDUE_CRC64_NVME,
        );
    }

    /// Offsets 0..16 and every length up to a few engine strategy switches,
    /// with the expected value maintained incrementally by the bit-serial
    /// reference.
    #[test]
    fn test_offset_and_length_sweep() {
        const LIMIT: usize = 600;
        let mut buffer = vec![0u8; LIMIT + 16];
        for offset in 0..16 {
            for (i, slot) in buffer.iter_mut().enumerate() {
                *slot = (i as u8).wrapping_mul(131).wrapping_add(offset as u8 + 129);
            }
            let window = &buffer[offset..];
            let mut expected32 = 0u32;
            let mut expected32c = 0u32;
            let mut expected64 = 0u64;
            let mut expected64n = 0u64;
            for len in 1..=LIMIT {
                let byte = &window[len - 1..len];
                expected32 = reference::crc32(POLY_CRC32, expected32, byte);
                expected32c = reference::crc32(POLY_CRC32C, expected32c, byte);
                expected64 = reference::crc64(POLY_CRC64_XZ, expected64, byte);
                expected64n = reference::crc64(POLY_CRC64_NVME, expected64n, byte);
                let slice = &window[..len];
                assert_eq!(crc32(slice, 0), expected32, "crc32 off {offset} len {len}");
                assert_eq!(
                    crc32c(slice, 0),
                    expected32c,
                    "crc32c off {offset} len {len}"
                );
                assert_eq!(
                    crc64_xz(slice, 0),
                    expected64,
                    "crc64_xz off {offset} len {len}"
                );
                assert_eq!(
                    crc64_nvme(slice, 0),
                    expected64n,
                    "crc64_nvme off {offset} len {len}"
                );
            }
        }
    }

    /// Every implementation must agree with the reference at the lengths
    /// where the engines switch strategies.
    #[test]
    fn test_boundary_lengths() {
        const LENGTHS: &[usize] = &[
            0, 1, 7, 8, 9, 15, 16, 17, 31, 32, 33, 63, 64, 65, 127, 128, 129, 255, 256, 257, 511,
            512, 513, 2047, 2048, 2049,
        ];
        let data: Vec<u8> = (0u32..2049)
            .map(|i| (i.wrapping_mul(197) >> 3) as u8)
            .collect();
        let seed32 = 0x0123_4567_u32;
        let seed64 = 0x0123_4567_89ab_cdef_u64;
        for &len in LENGTHS {
            let slice = &data[..len];
            for (name, f) in crc32_impls("crc32") {
                assert_eq!(
                    f(seed32, slice),
                    reference::crc32(POLY_CRC32, seed32, slice),
                    "crc32/{name} len {len}"
                );
            }
            for (name, f) in crc32_impls("crc32c") {
                assert_eq!(
                    f(seed32, slice),
                    reference::crc32(POLY_CRC32C, seed32, slice),
                    "crc32c/{name} len {len}"
                );
            }
            for (name, f) in crc64_impls("crc64_xz") {
                assert_eq!(
                    f(seed64, slice),
                    reference::crc64(POLY_CRC64_XZ, seed64, slice),
                    "crc64_xz/{name} len {len}"
                );
            }
            for (name, f) in crc64_impls("crc64_nvme") {
                assert_eq!(
                    f(seed64, slice),
                    reference::crc64(POLY_CRC64_NVME, seed64, slice),
                    "crc64_nvme/{name} len {len}"
                );
            }
        }
    }

    #[test]
    #[ignore = "processes 3 GiB"]
    fn test_3gib_of_zeroes_chained() {
        let block = vec![0u8; 1 << 20];
        let mut c32 = 0u32;
        let mut c64 = 0u64;
        for _ in 0..3 * 1024 {
            c32 = crc32(&block, c32);
            c64 = crc64_nvme(&block, c64);
        }
        assert_eq!(c32, 0x480B_BE37);
        assert_eq!(c64, 0xA1DD_DD7C_6FD1_7075);
    }

    #[test]
    #[ignore = "allocates 3 GiB"]
    fn test_3gib_of_zeroes_one_shot() {
        // A single slice above the 2^31 - 1 chunk limit drives the public
        // entry points' chunking loop itself.
        let zeroes = vec![0u8; 3 << 30];
        assert_eq!(crc32(&zeroes, 0), 0x480B_BE37);
        assert_eq!(crc64_nvme(&zeroes, 0), 0xA1DD_DD7C_6FD1_7075);
    }

    fn any_buffer() -> <Box<[u8]> as Arbitrary>::Strategy {
        any_with::<Box<[u8]>>(size_range(..65536).lift())
    }

    prop_compose! {
        fn bytes_and_split_index()
            (bytes in any_buffer())
            (index in 0..=bytes.len(), bytes in Just(bytes)) -> (Box<[u8]>, usize)
        {
            (bytes, index)
        }
    }

    proptest! {
        #[test]
        fn equivalent_to_crc_crate(bytes in any_buffer()) {
            let checker = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);
            prop_assert_eq!(crc32(&bytes, 0), checker.checksum(&bytes));
            let checker = crc::Crc::<u32>::new(&crc::CRC_32_ISCSI);
            prop_assert_eq!(crc32c(&bytes, 0), checker.checksum(&bytes));
            let checker = crc::Crc::<u64>::new(&crc::CRC_64_XZ);
            prop_assert_eq!(crc64_xz(&bytes, 0), checker.checksum(&bytes));
            let checker = crc::Crc::<u64>::new(&CRC_64_NVME_ALG);
            prop_assert_eq!(crc64_nvme(&bytes, 0), checker.checksum(&bytes));
        }

        #[test]
        fn concatenation((bytes, split_index) in bytes_and_split_index()) {
            let (left, right) = bytes.split_at(split_index);
            prop_assert_eq!(crc32(&bytes, 0), crc32(right, crc32(left, 0)));
            prop_assert_eq!(crc32c(&bytes, 0), crc32c(right, crc32c(left, 0)));
            prop_assert_eq!(crc64_xz(&bytes, 0), crc64_xz(right, crc64_xz(left, 0)));
            prop_assert_eq!(crc64_nvme(&bytes, 0), crc64_nvme(right, crc64_nvme(left, 0)));
        }

        #[test]
        fn seeds_chain_from_any_value(bytes in any_buffer(), seed in any::<u64>()) {
            prop_assert_eq!(
                crc64_xz(&bytes, seed),
                reference::crc64(POLY_CRC64_XZ, seed, &bytes)
            );
            let seed32 = seed as u32;
            prop_assert_eq!(
                crc32c(&bytes, seed32),
                reference::crc32(POLY_CRC32C, seed32, &bytes)
            );
        }
    }
}
