// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

//! Frozen folding-constant tables, one per CRC variant.
//!
//! Every table is the output of the offline generator (`src/bin/table_gen.rs`,
//! built on [`crate::poly`]); the drift tests in this module regenerate each
//! entry and compare bit-exactly. The tables are read-only for the life of
//! the process.

/// CRC-32 (ISO-3309, gzip) polynomial 0x04C11DB7, bit-reflected.
pub(crate) const POLY_CRC32: u32 = 0xedb8_8320;
/// CRC-32C (Castagnoli, iSCSI) polynomial 0x1EDC6F41, bit-reflected.
pub(crate) const POLY_CRC32C: u32 = 0x82f6_3b78;
/// CRC-64/XZ polynomial 0x42F0E1EBA9EA3693, bit-reflected.
pub(crate) const POLY_CRC64_XZ: u64 = 0xc96c_5795_d787_0f42;
/// CRC-64/NVMe polynomial 0xAD93D23594C93659, bit-reflected.
pub(crate) const POLY_CRC64_NVME: u64 = 0x9a6c_9329_ac4b_c9b5;

/// Folding constants for a 64-bit bit-reflected CRC polynomial.
///
/// The x512..x2048 entries hold four copies of their `(x^(w+64), x^w)` pair
/// and start on 64-byte boundaries so that a single 512-bit aligned load
/// materializes the coefficients for a VPCLMULQDQ fold. Pair storage order is
/// `[x^(w+64) mod P, x^w mod P]`: a little-endian 16-byte load then places
/// the larger exponent in the low lane, which is the lane holding the older
/// (farther-from-the-end) half of the data.
#[repr(C, align(64))]
pub(crate) struct Crc64Constants {
    pub x2048: [u64; 8],
    pub x1536: [u64; 8],
    pub x1024: [u64; 8],
    pub x512: [u64; 8],
    pub x384: [u64; 2],
    pub x256: [u64; 2],
    pub x128: [u64; 2],
    pub mu_poly: [u64; 2],
    pub trailing: [[u64; 2]; 15],
}

/// Folding constants for a 32-bit bit-reflected CRC polynomial.
///
/// Same layout as [`Crc64Constants`] plus the `x64` pair used by the final
/// fold that multiplies the residue by x^32 (the CRC-32 definition) while
/// reducing 128 bits to 64.
#[repr(C, align(64))]
pub(crate) struct Crc32Constants {
    pub x2048: [u64; 8],
    pub x1536: [u64; 8],
    pub x1024: [u64; 8],
    pub x512: [u64; 8],
    pub x384: [u64; 2],
    pub x256: [u64; 2],
    pub x128: [u64; 2],
    pub x64: [u64; 2],
    pub mu_poly: [u64; 2],
    pub trailing: [[u64; 2]; 15],
}

/// PSHUFB / TBL patterns for variable byte shifts and byte masks.
///
/// A 16-byte window loaded at `16 + n` right-shifts a register by `n` bytes,
/// at `16 - n` left-shifts by `n`; a window at `48 + n` masks in the high
/// `n` bytes, at `80 - n` the low `n` bytes. The out-of-range 0x80 indices
/// make PSHUFB (and TBL, where any index >= 16) produce zero bytes.
#[repr(C, align(16))]
pub(crate) struct ShiftTable(pub [u8; 96]);

#[rustfmt::skip]
pub(crate) static MASKS_SHIFTS: ShiftTable = ShiftTable([
    0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80,
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
    0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
]);


#[rustfmt::skip]
// Pre-computed bit-reflected folding constants for CRC-32 (ISO-3309, gzip), polynomial 0x04C11DB7.
// The 32-bit values sit in the upper half of each word so that the
// carryless products align without an extra shift; the x64 low entry and
// mu/poly stay unshifted on purpose.
pub(crate) static CRC32: Crc32Constants = Crc32Constants {
    x2048: [
        0x7cc8e1e700000000,
        0x03f9f86300000000, // x^2112 mod P(x) / x^2048 mod P(x)
        0x7cc8e1e700000000,
        0x03f9f86300000000, // duplicated 3 times to fill a 64-byte load
        0x7cc8e1e700000000,
        0x03f9f86300000000,
        0x7cc8e1e700000000,
        0x03f9f86300000000,
    ],
    x1536: [
        0x67f7947600000000,
        0xc56d949600000000, // x^1600 mod P(x) / x^1536 mod P(x)
        0x67f7947600000000,
        0xc56d949600000000, // duplicated 3 times to fill a 64-byte load
        0x67f7947600000000,
        0xc56d949600000000,
        0x67f7947600000000,
        0xc56d949600000000,
    ],
    x1024: [
        0x7d657a1000000000,
        0x7406fa9500000000, // x^1088 mod P(x) / x^1024 mod P(x)
        0x7d657a1000000000,
        0x7406fa9500000000, // duplicated 3 times to fill a 64-byte load
        0x7d657a1000000000,
        0x7406fa9500000000,
        0x7d657a1000000000,
        0x7406fa9500000000,
    ],
    x512: [
        0x653d982200000000,
        0xcad38e8f00000000, // x^576 mod P(x) / x^512 mod P(x)
        0x653d982200000000,
        0xcad38e8f00000000, // duplicated 3 times to fill a 64-byte load
        0x653d982200000000,
        0xcad38e8f00000000,
        0x653d982200000000,
        0xcad38e8f00000000,
    ],
    x384: [0x69ccfc0d00000000, 0x2a28386200000000], //  x^448 mod P(x) / x^384 mod P(x)
    x256: [0x9570d49500000000, 0x01b5fd1d00000000], //  x^320 mod P(x) / x^256 mod P(x)
    x128: [0x65673b4600000000, 0x9ba54c6f00000000], //  x^192 mod P(x) / x^128 mod P(x)
    x64: [0xccaa009e00000000, 0x00000000b8bc6765], //  x^96  mod P(x) / x^64  mod P(x)
    mu_poly: [0x00000000f7011641, 0x00000001db710641], // Barrett mu / 33-bit P(x), both bit-reflected
    trailing: [
        [0x3d6029b000000000, 0x0100000000000000], //  1 trailing bytes: x^72 / shift 8 bits
        [0xcb5cd3a500000000, 0x0001000000000000], //  2 trailing bytes: x^80 / shift 16 bits
        [0xa6770bb400000000, 0x0000010000000000], //  3 trailing bytes: x^88 / shift 24 bits
        [0xccaa009e00000000, 0x0000000100000000], //  4 trailing bytes: x^96 / shift 32 bits
        [0x177b144300000000, 0x0000000001000000], //  5 trailing bytes: x^104 / shift 40 bits
        [0xefc26b3e00000000, 0x0000000000010000], //  6 trailing bytes: x^112 / shift 48 bits
        [0xc18edfc000000000, 0x0000000000000100], //  7 trailing bytes: x^120 / shift 56 bits
        [0x9ba54c6f00000000, 0x0000000000000001], //  8 trailing bytes: x^128 / shift 64 bits
        [0xdd96d98500000000, 0x3d6029b000000000], //  9 trailing bytes: x^136 / x^72
        [0x9d0fe17600000000, 0xcb5cd3a500000000], // 10 trailing bytes: x^144 / x^80
        [0xb9fbdbe800000000, 0xa6770bb400000000], // 11 trailing bytes: x^152 / x^88
        [0xae68919100000000, 0xccaa009e00000000], // 12 trailing bytes: x^160 / x^96
        [0x87a6cb4300000000, 0x177b144300000000], // 13 trailing bytes: x^168 / x^104
        [0xef52b6e100000000, 0xefc26b3e00000000], // 14 trailing bytes: x^176 / x^112
        [0xd7e2805800000000, 0xc18edfc000000000], // 15 trailing bytes: x^184 / x^120
    ],
};

#[rustfmt::skip]
// Pre-computed bit-reflected folding constants for CRC-32C (Castagnoli, iSCSI), polynomial 0x1EDC6F41.
// The 32-bit values sit in the upper half of each word so that the
// carryless products align without an extra shift; the x64 low entry and
// mu/poly stay unshifted on purpose.
pub(crate) static CRC32C: Crc32Constants = Crc32Constants {
    x2048: [
        0xe9a5d8be00000000,
        0x1426a81500000000, // x^2112 mod P(x) / x^2048 mod P(x)
        0xe9a5d8be00000000,
        0x1426a81500000000, // duplicated 3 times to fill a 64-byte load
        0xe9a5d8be00000000,
        0x1426a81500000000,
        0xe9a5d8be00000000,
        0x1426a81500000000,
    ],
    x1536: [
        0x7ccbbbf200000000,
        0x31c9460800000000, // x^1600 mod P(x) / x^1536 mod P(x)
        0x7ccbbbf200000000,
        0x31c9460800000000, // duplicated 3 times to fill a 64-byte load
        0x7ccbbbf200000000,
        0x31c9460800000000,
        0x7ccbbbf200000000,
        0x31c9460800000000,
    ],
    x1024: [
        0x6577b24500000000,
        0x7417153f00000000, // x^1088 mod P(x) / x^1024 mod P(x)
        0x6577b24500000000,
        0x7417153f00000000, // duplicated 3 times to fill a 64-byte load
        0x6577b24500000000,
        0x7417153f00000000,
        0x6577b24500000000,
        0x7417153f00000000,
    ],
    x512: [
        0x1c19243b00000000,
        0x75bba45b00000000, // x^576 mod P(x) / x^512 mod P(x)
        0x1c19243b00000000,
        0x75bba45b00000000, // duplicated 3 times to fill a 64-byte load
        0x1c19243b00000000,
        0x75bba45b00000000,
        0x1c19243b00000000,
        0x75bba45b00000000,
    ],
    x384: [0xa46ef4aa00000000, 0x6051243f00000000], //  x^448 mod P(x) / x^384 mod P(x)
    x256: [0x33ccbbbc00000000, 0xa2158b3400000000], //  x^320 mod P(x) / x^256 mod P(x)
    x128: [0x3743f7bd00000000, 0x3171d43000000000], //  x^192 mod P(x) / x^128 mod P(x)
    x64: [0x493c7d2700000000, 0x00000000dd45aab8], //  x^96  mod P(x) / x^64  mod P(x)
    mu_poly: [0x00000000dea713f1, 0x0000000105ec76f1], // Barrett mu / 33-bit P(x), both bit-reflected
    trailing: [
        [0x38116fac00000000, 0x0100000000000000], //  1 trailing bytes: x^72 / shift 8 bits
        [0xef306b1900000000, 0x0001000000000000], //  2 trailing bytes: x^80 / shift 16 bits
        [0x68032cc800000000, 0x0000010000000000], //  3 trailing bytes: x^88 / shift 24 bits
        [0x493c7d2700000000, 0x0000000100000000], //  4 trailing bytes: x^96 / shift 32 bits
        [0xf43ed64800000000, 0x0000000001000000], //  5 trailing bytes: x^104 / shift 40 bits
        [0xcb567ba500000000, 0x0000000000010000], //  6 trailing bytes: x^112 / shift 48 bits
        [0x9771f7c100000000, 0x0000000000000100], //  7 trailing bytes: x^120 / shift 56 bits
        [0x3171d43000000000, 0x0000000000000001], //  8 trailing bytes: x^128 / shift 64 bits
        [0x30d2386500000000, 0x38116fac00000000], //  9 trailing bytes: x^136 / x^72
        [0x5407554600000000, 0xef306b1900000000], // 10 trailing bytes: x^144 / x^80
        [0x678efd0100000000, 0x68032cc800000000], // 11 trailing bytes: x^152 / x^88
        [0xf20c0dfe00000000, 0x493c7d2700000000], // 12 trailing bytes: x^160 / x^96
        [0x5fe4dc5f00000000, 0xf43ed64800000000], // 13 trailing bytes: x^168 / x^104
        [0x0f69022b00000000, 0xcb567ba500000000], // 14 trailing bytes: x^176 / x^112
        [0xb93b4ce700000000, 0x9771f7c100000000], // 15 trailing bytes: x^184 / x^120
    ],
};

#[rustfmt::skip]
// Pre-computed bit-reflected folding constants for CRC-64/XZ, polynomial 0x42F0E1EBA9EA3693.
// The actual exponents are reduced by 1 to compensate for bit-reflection
// (e.g. the x^1024 entry really holds x^1023 mod P).
pub(crate) static CRC64_XZ: Crc64Constants = Crc64Constants {
    x2048: [
        0x8260adf2381ad81c,
        0xf31fd9271e228b79, // x^2112 mod P(x) / x^2048 mod P(x)
        0x8260adf2381ad81c,
        0xf31fd9271e228b79, // duplicated 3 times to fill a 64-byte load
        0x8260adf2381ad81c,
        0xf31fd9271e228b79,
        0x8260adf2381ad81c,
        0xf31fd9271e228b79,
    ],
    x1536: [
        0x47b00921f036ff71,
        0xb0382771eb06c453, // x^1600 mod P(x) / x^1536 mod P(x)
        0x47b00921f036ff71,
        0xb0382771eb06c453, // duplicated 3 times to fill a 64-byte load
        0x47b00921f036ff71,
        0xb0382771eb06c453,
        0x47b00921f036ff71,
        0xb0382771eb06c453,
    ],
    x1024: [
        0x8757d71d4fcc1000,
        0xd7d86b2af73de740, // x^1088 mod P(x) / x^1024 mod P(x)
        0x8757d71d4fcc1000,
        0xd7d86b2af73de740, // duplicated 3 times to fill a 64-byte load
        0x8757d71d4fcc1000,
        0xd7d86b2af73de740,
        0x8757d71d4fcc1000,
        0xd7d86b2af73de740,
    ],
    x512: [
        0x6ae3efbb9dd441f3,
        0x081f6054a7842df4, // x^576 mod P(x) / x^512 mod P(x)
        0x6ae3efbb9dd441f3,
        0x081f6054a7842df4, // duplicated 3 times to fill a 64-byte load
        0x6ae3efbb9dd441f3,
        0x081f6054a7842df4,
        0x6ae3efbb9dd441f3,
        0x081f6054a7842df4,
    ],
    x384: [0xb5ea1af9c013aca4, 0x69a35d91c3730254], //  x^448 mod P(x) / x^384 mod P(x)
    x256: [0x60095b008a9efa44, 0x3be653a30fe1af51], //  x^320 mod P(x) / x^256 mod P(x)
    x128: [0xe05dd497ca393ae4, 0xdabe95afc7875f40], //  x^192 mod P(x) / x^128 mod P(x)
    mu_poly: [0x9c3e466c172963d5, 0x92d8af2baf0e1e85], // Barrett mu / P(x), both bit-reflected
    trailing: [
        [0x646c955f440400fe, 0xb32e4cbe03a75f6f], //  1 trailing bytes: x^136 / x^72
        [0x53e7815838846436, 0x54e979925cd0f10d], //  2 trailing bytes: x^144 / x^80
        [0x09abf11afca2d0d7, 0x3f0be14a916a6dcb], //  3 trailing bytes: x^152 / x^88
        [0xec32cffb23e3ed7d, 0x1dee8a5e222ca1dc], //  4 trailing bytes: x^160 / x^96
        [0xdda9f27ee08373ad, 0x5c2d776033c4205e], //  5 trailing bytes: x^168 / x^104
        [0x0dd9b4240837fd99, 0x6184d55f721267c6], //  6 trailing bytes: x^176 / x^112
        [0xf075e4ae5e05bdff, 0x22ef0d5934f964ec], //  7 trailing bytes: x^184 / x^120
        [0xe05dd497ca393ae4, 0xdabe95afc7875f40], //  8 trailing bytes: x^192 / x^128
        [0x2ddda07ff6672378, 0x646c955f440400fe], //  9 trailing bytes: x^200 / x^136
        [0x1596922b987ef63f, 0x53e7815838846436], // 10 trailing bytes: x^208 / x^144
        [0x4d624bbe73bbc94c, 0x09abf11afca2d0d7], // 11 trailing bytes: x^216 / x^152
        [0xe88a0d0c5521de3d, 0xec32cffb23e3ed7d], // 12 trailing bytes: x^224 / x^160
        [0xb91b6176fc36363f, 0xdda9f27ee08373ad], // 13 trailing bytes: x^232 / x^168
        [0x4dcec64d2edf818c, 0x0dd9b4240837fd99], // 14 trailing bytes: x^240 / x^176
        [0x4550ddde9a383296, 0xf075e4ae5e05bdff], // 15 trailing bytes: x^248 / x^184
    ],
};

#[rustfmt::skip]
// Pre-computed bit-reflected folding constants for CRC-64/NVMe, polynomial 0xAD93D23594C93659.
// The actual exponents are reduced by 1 to compensate for bit-reflection
// (e.g. the x^1024 entry really holds x^1023 mod P).
pub(crate) static CRC64_NVME: Crc64Constants = Crc64Constants {
    x2048: [
        0x37ccd3e14069cabc,
        0xa043808c0f782663, // x^2112 mod P(x) / x^2048 mod P(x)
        0x37ccd3e14069cabc,
        0xa043808c0f782663, // duplicated 3 times to fill a 64-byte load
        0x37ccd3e14069cabc,
        0xa043808c0f782663,
        0x37ccd3e14069cabc,
        0xa043808c0f782663,
    ],
    x1536: [
        0x758ee09da263e275,
        0x6d2d13de8038b4ca, // x^1600 mod P(x) / x^1536 mod P(x)
        0x758ee09da263e275,
        0x6d2d13de8038b4ca, // duplicated 3 times to fill a 64-byte load
        0x758ee09da263e275,
        0x6d2d13de8038b4ca,
        0x758ee09da263e275,
        0x6d2d13de8038b4ca,
    ],
    x1024: [
        0xa1ca681e733f9c40,
        0x5f852fb61e8d92dc, // x^1088 mod P(x) / x^1024 mod P(x)
        0xa1ca681e733f9c40,
        0x5f852fb61e8d92dc, // duplicated 3 times to fill a 64-byte load
        0xa1ca681e733f9c40,
        0x5f852fb61e8d92dc,
        0xa1ca681e733f9c40,
        0x5f852fb61e8d92dc,
    ],
    x512: [
        0x0c32cdb31e18a84a,
        0x62242240ace5045a, // x^576 mod P(x) / x^512 mod P(x)
        0x0c32cdb31e18a84a,
        0x62242240ace5045a, // duplicated 3 times to fill a 64-byte load
        0x0c32cdb31e18a84a,
        0x62242240ace5045a,
        0x0c32cdb31e18a84a,
        0x62242240ace5045a,
    ],
    x384: [0xbdd7ac0ee1a4a0f0, 0xa3ffdc1fe8e82a8b], //  x^448 mod P(x) / x^384 mod P(x)
    x256: [0xb0bc2e589204f500, 0xe1e0bb9d45d7a44c], //  x^320 mod P(x) / x^256 mod P(x)
    x128: [0xeadc41fd2ba3d420, 0x21e9761e252621ac], //  x^192 mod P(x) / x^128 mod P(x)
    mu_poly: [0x27ecfa329aef9f77, 0x34d926535897936b], // Barrett mu / P(x), both bit-reflected
    trailing: [
        [0x04f28def5347786c, 0x7f6ef0c830358979], //  1 trailing bytes: x^136 / x^72
        [0x49e1df807414fdef, 0x8776a97d73bddf69], //  2 trailing bytes: x^144 / x^80
        [0x52734ea3e726fc54, 0xff6e4e1f4e4038be], //  3 trailing bytes: x^152 / x^88
        [0x668ab3bbc976d29d, 0x8211147cbaf96306], //  4 trailing bytes: x^160 / x^96
        [0xf2fa1fae5f5c1165, 0x373d15f784905d1e], //  5 trailing bytes: x^168 / x^104
        [0x9065cb6e6d39918a, 0xe9742a79ef04a5d4], //  6 trailing bytes: x^176 / x^112
        [0xc23dfbc6ca591ca3, 0xfc5d27f6bf353971], //  7 trailing bytes: x^184 / x^120
        [0xeadc41fd2ba3d420, 0x21e9761e252621ac], //  8 trailing bytes: x^192 / x^128
        [0xf12b2236ec577cd6, 0x04f28def5347786c], //  9 trailing bytes: x^200 / x^136
        [0x0298996e905d785a, 0x49e1df807414fdef], // 10 trailing bytes: x^208 / x^144
        [0xf779b03b943ff311, 0x52734ea3e726fc54], // 11 trailing bytes: x^216 / x^152
        [0x07797643831fd90b, 0x668ab3bbc976d29d], // 12 trailing bytes: x^224 / x^160
        [0x27a8849a7bc97a27, 0xf2fa1fae5f5c1165], // 13 trailing bytes: x^232 / x^168
        [0xb937a2d843183b7c, 0x9065cb6e6d39918a], // 14 trailing bytes: x^240 / x^176
        [0x31bce594cbbacd2d, 0xc23dfbc6ca591ca3], // 15 trailing bytes: x^248 / x^184
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly;

    fn check_64(consts: &Crc64Constants, poly64: u64) {
        let derived = poly::crc64_fold_constants(poly64);
        assert_eq!(consts.x2048, derived.x2048);
        assert_eq!(consts.x1536, derived.x1536);
        assert_eq!(consts.x1024, derived.x1024);
        assert_eq!(consts.x512, derived.x512);
        assert_eq!(consts.x384, derived.x384);
        assert_eq!(consts.x256, derived.x256);
        assert_eq!(consts.x128, derived.x128);
        assert_eq!(consts.mu_poly, derived.mu_poly);
        assert_eq!(consts.trailing, derived.trailing);
    }

    fn check_32(consts: &Crc32Constants, poly32: u32) {
        let derived = poly::crc32_fold_constants(poly32);
        assert_eq!(consts.x2048, derived.x2048);
        assert_eq!(consts.x1536, derived.x1536);
        assert_eq!(consts.x1024, derived.x1024);
        assert_eq!(consts.x512, derived.x512);
        assert_eq!(consts.x384, derived.x384);
        assert_eq!(consts.x256, derived.x256);
        assert_eq!(consts.x128, derived.x128);
        assert_eq!(consts.x64, derived.x64);
        assert_eq!(consts.mu_poly, derived.mu_poly);
        assert_eq!(consts.trailing, derived.trailing);
    }

    // The baked tables are derivatives; the generator is the definition.
    // Regenerate every entry and compare bit-exactly to catch drift.
    #[test]
    fn baked_tables_match_generator() {
        check_32(&CRC32, 0x04C1_1DB7);
        check_32(&CRC32C, 0x1EDC_6F41);
        check_64(&CRC64_XZ, 0x42F0_E1EB_A9EA_3693);
        check_64(&CRC64_NVME, 0xAD93_D235_94C9_3659);
    }

    #[test]
    fn wide_entries_are_64_byte_aligned() {
        for table in [&CRC64_XZ, &CRC64_NVME] {
            assert_eq!(table.x2048.as_ptr() as usize % 64, 0);
            assert_eq!(table.x1536.as_ptr() as usize % 64, 0);
            assert_eq!(table.x1024.as_ptr() as usize % 64, 0);
            assert_eq!(table.x512.as_ptr() as usize % 64, 0);
        }
        for table in [&CRC32, &CRC32C] {
            assert_eq!(table.x2048.as_ptr() as usize % 64, 0);
            assert_eq!(table.x512.as_ptr() as usize % 64, 0);
        }
        assert_eq!(MASKS_SHIFTS.0.as_ptr() as usize % 16, 0);
    }
}
