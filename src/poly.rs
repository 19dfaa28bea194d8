// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

//! Polynomial arithmetic over GF(2)[x], used to derive the folding constants.
//!
//! Everything here runs at table-generation time (see `src/bin/table_gen.rs`)
//! or inside tests that check the baked tables for drift. None of it is a hot
//! path, so the implementations favor being obviously bit-exact over speed.
//!
//! A polynomial of degree n is passed in full, with the x^n bit set (e.g. a
//! degree-64 polynomial occupies 65 bits of the `u128`), except where a
//! function documents otherwise.

/// Reverses the low `bits` bits of `value`.
pub fn reflect(value: u64, bits: u32) -> u64 {
    value.reverse_bits() >> (64 - bits)
}

/// Carryless product of two 64-bit polynomials, unreduced.
pub fn clmul(a: u64, b: u64) -> u128 {
    let mut a = a;
    let mut b = u128::from(b);
    let mut product = 0;
    while a != 0 {
        if a & 1 != 0 {
            product ^= b;
        }
        a >>= 1;
        b <<= 1;
    }
    product
}

/// Multiplies two polynomials modulo the field polynomial.
pub fn multiply_mod_p(poly: u128, a: u128, b: u128) -> u128 {
    if a == 0 || b == 0 {
        return 0;
    }
    let mask = 1u128 << (127 - poly.leading_zeros());
    // Loop over the bits of the smaller factor so the loop exits soonest.
    let (mut x, mut y) = if b < a { (b, a) } else { (a, b) };
    let mut product = 0;
    while x != 0 {
        if x & 1 != 0 {
            product ^= y;
        }
        // Double the other factor, reducing when the degree bit appears.
        y <<= 1;
        if y & mask != 0 {
            y ^= poly;
        }
        x >>= 1;
    }
    product
}

/// Multiplies two bit-reflected polynomials modulo a bit-reflected field
/// polynomial. The reflected polynomial must be full degree (65 bits for a
/// degree-64 field). Reflection multiplies the product by an extra x:
/// `mr(reflect(P), reflect(a), reflect(b)) == reflect(a * b * x mod P)`.
pub fn multiply_mod_p_reflected(poly: u128, a: u128, b: u128) -> u128 {
    if a == 0 || b == 0 {
        return 0;
    }
    let mut hi_bit = 1u128 << (126 - poly.leading_zeros());
    // Start from the factor with the most trailing zeros for an early exit.
    let swap = b.trailing_zeros() > a.trailing_zeros();
    let (mut x, mut y) = if swap { (b, a) } else { (a, b) };
    let mut product = 0;
    while x != 0 {
        // Doubling is a right shift here; reduce first when the field degree
        // bit (the reflected image of x^degree) is set.
        if y & 1 != 0 {
            y ^= poly;
        }
        y >>= 1;
        if x & hi_bit != 0 {
            product ^= y;
            x ^= hi_bit;
        }
        hi_bit >>= 1;
    }
    product
}

/// Raises `base` to `exp` modulo the field polynomial by square-and-multiply,
/// e.g. `pow_mod_p(p, 2, 256)` yields x^256 mod P(x).
pub fn pow_mod_p(poly: u128, base: u128, exp: u128) -> u128 {
    let mut base = base;
    let mut exp = exp;
    let mut result = 1;
    while exp != 0 {
        if exp & 1 != 0 {
            result = multiply_mod_p(poly, base, result);
        }
        exp >>= 1;
        if exp != 0 {
            base = multiply_mod_p(poly, base, base);
        }
    }
    result
}

/// Computes Barrett's mu = x^(2 * degree) / P(x) by polynomial long division.
/// Pass the polynomial without its x^degree bit.
pub fn compute_mu(poly: u128, degree: u32) -> u128 {
    let mut mu = 0;
    let mut accumulator = poly << degree;
    let mut mask = 1u128 << (2 * degree - 1);
    for i in (0..degree).rev() {
        if accumulator & mask != 0 {
            mu |= 1u128 << i;
            accumulator ^= mask;
            accumulator ^= poly << i;
        }
        mask >>= 1;
    }
    mu
}

/// Folding constants derived for a 64-bit polynomial, in the layout the
/// engine tables use (pair order `[x^(w+64) mod P, x^w mod P]`, bit-reflected
/// with the exponents reduced by one to compensate for the reflection).
pub struct Crc64FoldConstants {
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

/// Folding constants derived for a 32-bit polynomial. The 32-bit values are
/// placed in the upper half of each 64-bit word so carryless products align
/// without an extra shift; `x64[1]` and `mu_poly` deliberately stay low.
pub struct Crc32FoldConstants {
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

fn dup4(pair: [u64; 2]) -> [u64; 8] {
    [
        pair[0], pair[1], pair[0], pair[1], pair[0], pair[1], pair[0], pair[1],
    ]
}

/// Derives the full folding-constant table for a 64-bit polynomial given
/// without its x^64 bit (e.g. `0x42F0_E1EB_A9EA_3693`).
pub fn crc64_fold_constants(poly: u64) -> Crc64FoldConstants {
    let p65 = (1u128 << 64) | u128::from(poly);
    let k = |exp: u32| reflect(pow_mod_p(p65, 2, u128::from(exp) - 1) as u64, 64);
    let pair = |w: u32| [k(w + 64), k(w)];
    let mut trailing = [[0u64; 2]; 15];
    for (i, entry) in trailing.iter_mut().enumerate() {
        let shift = 8 * (i as u32 + 1);
        *entry = [k(64 + shift + 64), k(64 + shift)];
    }
    Crc64FoldConstants {
        x2048: dup4(pair(2048)),
        x1536: dup4(pair(1536)),
        x1024: dup4(pair(1024)),
        x512: dup4(pair(512)),
        x384: pair(384),
        x256: pair(256),
        x128: pair(128),
        mu_poly: [
            reflect((((1u128 << 64) | compute_mu(u128::from(poly), 64)) >> 1) as u64, 64),
            reflect((p65 >> 1) as u64, 64),
        ],
        trailing,
    }
}

/// Derives the full folding-constant table for a 32-bit polynomial given
/// without its x^32 bit (e.g. `0x04C1_1DB7`).
pub fn crc32_fold_constants(poly: u32) -> Crc32FoldConstants {
    let p33 = (1u128 << 32) | u128::from(poly);
    let k = |exp: u32| reflect(pow_mod_p(p33, 2, u128::from(exp) - 1) as u64, 32) << 32;
    let pair = |w: u32| [k(w + 64), k(w)];
    let mut trailing = [[0u64; 2]; 15];
    for (i, entry) in trailing.iter_mut().enumerate() {
        let len = i as u32 + 1;
        // Up to eight trailing bytes, multiplying by x^(8 * len) fits in the
        // register as a plain shift; the folding constant is the shift itself.
        let lo = if len <= 8 { 1u64 << (64 - 8 * len) } else { k(8 * len) };
        *entry = [k(64 + 8 * len), lo];
    }
    Crc32FoldConstants {
        x2048: dup4(pair(2048)),
        x1536: dup4(pair(1536)),
        x1024: dup4(pair(1024)),
        x512: dup4(pair(512)),
        x384: pair(384),
        x256: pair(256),
        x128: pair(128),
        x64: [k(96), k(64) >> 32],
        mu_poly: [
            reflect(compute_mu(u128::from(poly), 32) as u64 | (1 << 32), 33) & 0xffff_ffff,
            reflect(p33 as u64, 33),
        ],
        trailing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(0x1, 8), 0x80);
        assert_eq!(reflect(0x04C1_1DB7, 32), 0xedb8_8320);
        assert_eq!(reflect(0x42F0_E1EB_A9EA_3693, 64), 0xc96c_5795_d787_0f42);
        assert_eq!(reflect(0xAD93_D235_94C9_3659, 64), 0x9a6c_9329_ac4b_c9b5);
    }

    #[test]
    fn test_clmul() {
        assert_eq!(clmul(0, 0x1234), 0);
        assert_eq!(clmul(1, 0x1234), 0x1234);
        assert_eq!(
            clmul(0x5a2d_8244_0f1e_3e50, 0xcae9_00d5_fed9_262f),
            0x39ca_c5ca_fc66_6bf3_25bc_9dd4_c0f3_6330,
        );
    }

    #[test]
    fn test_pow_mod_p_small_exponents() {
        let p65 = (1u128 << 64) | 0x42F0_E1EB_A9EA_3693;
        assert_eq!(pow_mod_p(p65, 2, 0), 1);
        assert_eq!(pow_mod_p(p65, 2, 1), 2);
        assert_eq!(pow_mod_p(p65, 2, 63), 1 << 63);
        // x^64 reduces to the polynomial itself.
        assert_eq!(pow_mod_p(p65, 2, 64), 0x42F0_E1EB_A9EA_3693);
    }

    #[test]
    fn test_compute_mu() {
        // Known Barrett constants for the two polynomial degrees.
        assert_eq!(compute_mu(0x04C1_1DB7, 32), 0x04D1_01DF);
        let mu64 = compute_mu(0x42F0_E1EB_A9EA_3693, 64);
        assert_eq!(
            reflect((((1u128 << 64) | mu64) >> 1) as u64, 64),
            0x9c3e_466c_1729_63d5
        );
    }

    #[test]
    fn test_reflected_multiply_matches_normal() {
        // Reflection turns the implicit alignment into an extra factor of x:
        // mr(reflect(P), reflect(a), reflect(b)) == reflect(a * b * x mod P).
        let p65 = (1u128 << 64) | 0x42F0_E1EB_A9EA_3693;
        let p65r = (u128::from(reflect(p65 as u64, 64)) << 1) | 1;
        let cases = [
            (0x0123_4567_89ab_cdef_u64, 0xfedc_ba98_7654_3210_u64),
            (0xdead_beef_0000_0001, 0x8000_0000_0000_0000),
            (0x1, 0x1),
        ];
        for (a, b) in cases {
            let product = multiply_mod_p(p65, u128::from(a), u128::from(b));
            let shifted = multiply_mod_p(p65, product, 2);
            let reflected = multiply_mod_p_reflected(
                p65r,
                u128::from(reflect(a, 64)),
                u128::from(reflect(b, 64)),
            );
            assert_eq!(reflected, u128::from(reflect(shifted as u64, 64)));
        }
    }

    #[test]
    fn test_fold_constant_samples() {
        let c = crc64_fold_constants(0x42F0_E1EB_A9EA_3693);
        assert_eq!(c.x128, [0xe05d_d497_ca39_3ae4, 0xdabe_95af_c787_5f40]);
        assert_eq!(c.mu_poly, [0x9c3e_466c_1729_63d5, 0x92d8_af2b_af0e_1e85]);
        let c = crc32_fold_constants(0x04C1_1DB7);
        assert_eq!(c.x128, [0x6567_3b46_0000_0000, 0x9ba5_4c6f_0000_0000]);
        assert_eq!(c.x64, [0xccaa_009e_0000_0000, 0x0000_0000_b8bc_6765]);
        assert_eq!(c.mu_poly, [0x0000_0000_f701_1641, 0x0000_0001_db71_0641]);
    }
}
