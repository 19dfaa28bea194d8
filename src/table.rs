// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

//! Slice-by-8 table-driven CRCs.
//!
//! The architecture-independent fast path and the universal dispatch
//! fallback. Each variant gets an 8x256 table where `table[0][b]` is the
//! remainder of the single byte `b` and `table[j][b]` the remainder of `b`
//! followed by `j` zero bytes; eight table lookups then advance the CRC by
//! one 8-byte word. The tables are built at compile time from the bit-serial
//! step, so they cannot drift from the reference.

use crate::constants::{POLY_CRC32, POLY_CRC32C, POLY_CRC64_NVME, POLY_CRC64_XZ};
use crate::reference;

static CRC32_TABLE: [[u32; 256]; 8] = build_table_32(POLY_CRC32);
static CRC32C_TABLE: [[u32; 256]; 8] = build_table_32(POLY_CRC32C);
static CRC64_XZ_TABLE: [[u64; 256]; 8] = build_table_64(POLY_CRC64_XZ);
static CRC64_NVME_TABLE: [[u64; 256]; 8] = build_table_64(POLY_CRC64_NVME);

const fn build_table_32(poly: u32) -> [[u32; 256]; 8] {
    let mut table = [[0u32; 256]; 8];
    let mut i = 0;
    while i < 256 {
        table[0][i] = reference::step_32(poly, 0, i as u8);
        i += 1;
    }
    let mut j = 1;
    while j < 8 {
        let mut i = 0;
        while i < 256 {
            let prev = table[j - 1][i];
            table[j][i] = table[0][(prev & 0xff) as usize] ^ (prev >> 8);
            i += 1;
        }
        j += 1;
    }
    table
}

const fn build_table_64(poly: u64) -> [[u64; 256]; 8] {
    let mut table = [[0u64; 256]; 8];
    let mut i = 0;
    while i < 256 {
        table[0][i] = reference::step_64(poly, 0, i as u8);
        i += 1;
    }
    let mut j = 1;
    while j < 8 {
        let mut i = 0;
        while i < 256 {
            let prev = table[j - 1][i];
            table[j][i] = table[0][(prev & 0xff) as usize] ^ (prev >> 8);
            i += 1;
        }
        j += 1;
    }
    table
}

pub(crate) fn crc32(previous_crc: u32, bytes: &[u8]) -> u32 {
    update_32(&CRC32_TABLE, previous_crc, bytes)
}

pub(crate) fn crc32c(previous_crc: u32, bytes: &[u8]) -> u32 {
    update_32(&CRC32C_TABLE, previous_crc, bytes)
}

pub(crate) fn crc64_xz(previous_crc: u64, bytes: &[u8]) -> u64 {
    update_64(&CRC64_XZ_TABLE, previous_crc, bytes)
}

pub(crate) fn crc64_nvme(previous_crc: u64, bytes: &[u8]) -> u64 {
    update_64(&CRC64_NVME_TABLE, previous_crc, bytes)
}

fn update_32(table: &[[u32; 256]; 8], previous_crc: u32, bytes: &[u8]) -> u32 {
    let mut crc = !previous_crc;
    let (words, tail) = bytes.as_chunks::<8>();
    for word in words {
        let word = u64::from_le_bytes(*word);
        let lo = crc ^ word as u32;
        let hi = (word >> 32) as u32;
        crc = table[7][(lo & 0xff) as usize]
            ^ table[6][(lo >> 8 & 0xff) as usize]
            ^ table[5][(lo >> 16 & 0xff) as usize]
            ^ table[4][(lo >> 24) as usize]
            ^ table[3][(hi & 0xff) as usize]
            ^ table[2][(hi >> 8 & 0xff) as usize]
            ^ table[1][(hi >> 16 & 0xff) as usize]
            ^ table[0][(hi >> 24) as usize];
    }
    for &byte in tail {
        crc = table[0][((crc ^ byte as u32) & 0xff) as usize] ^ (crc >> 8);
    }
    !crc
}

fn update_64(table: &[[u64; 256]; 8], previous_crc: u64, bytes: &[u8]) -> u64 {
    let mut crc = !previous_crc;
    let (words, tail) = bytes.as_chunks::<8>();
    for word in words {
        let word = crc ^ u64::from_le_bytes(*word);
        crc = table[7][(word & 0xff) as usize]
            ^ table[6][(word >> 8 & 0xff) as usize]
            ^ table[5][(word >> 16 & 0xff) as usize]
            ^ table[4][(word >> 24 & 0xff) as usize]
            ^ table[3][(word >> 32 & 0xff) as usize]
            ^ table[2][(word >> 40 & 0xff) as usize]
            ^ table[1][(word >> 48 & 0xff) as usize]
            ^ table[0][(word >> 56) as usize];
    }
    for &byte in tail {
        crc = table[0][((crc ^ byte as u64) & 0xff) as usize] ^ (crc >> 8);
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries_match_reference() {
        // A table entry for byte b in slice j is the remainder of b followed
        // by j zero bytes.
        for &b in &[0u8, 1, 0x31, 0x80, 0xff] {
            for j in 0..8 {
                let mut message = vec![b];
                message.extend(std::iter::repeat(0).take(j));
                let raw = !reference::crc64(POLY_CRC64_XZ, !0, &message);
                assert_eq!(CRC64_XZ_TABLE[j][b as usize], raw, "byte {b:#x} slice {j}");
                let raw = !reference::crc32(POLY_CRC32C, !0, &message);
                assert_eq!(CRC32C_TABLE[j][b as usize], raw, "byte {b:#x} slice {j}");
            }
        }
    }

    #[test]
    fn test_against_reference() {
        let data: Vec<u8> = (0u32..512).map(|i| (i * 131) as u8).collect();
        for len in 0..data.len() {
            let slice = &data[..len];
            assert_eq!(crc32(7, slice), reference::crc32(POLY_CRC32, 7, slice));
            assert_eq!(crc32c(7, slice), reference::crc32(POLY_CRC32C, 7, slice));
            assert_eq!(crc64_xz(7, slice), reference::crc64(POLY_CRC64_XZ, 7, slice));
            assert_eq!(
                crc64_nvme(7, slice),
                reference::crc64(POLY_CRC64_NVME, 7, slice)
            );
        }
    }
}
