// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

//! Prints the folding-constant table for one CRC variant as Rust source.
//!
//! The output is the source of truth for the baked tables in
//! `src/constants.rs`; the test suite regenerates every entry through the
//! same code path and compares bit-exactly.
//!
//! Usage:
//!
//! ```text
//! cargo run --bin table_gen crc32
//! cargo run --bin table_gen crc32c
//! cargo run --bin table_gen crc64xz
//! cargo run --bin table_gen crc64nvme
//! ```

use crcfold::poly;
use std::env::args;
use std::process::exit;

fn print_wide(name: &str, values: &[u64; 8], width: u32) {
    println!("    {name}: [");
    for (i, value) in values.iter().enumerate() {
        let comment = match i {
            1 => format!(" // x^{} mod P(x) / x^{} mod P(x)", width + 64, width),
            3 => " // duplicated 3 times to fill a 64-byte load".to_string(),
            _ => String::new(),
        };
        println!("        {value:#018x},{comment}");
    }
    println!("    ],");
}

fn print_pair(name: &str, pair: &[u64; 2], comment: &str) {
    println!("    {name}: [{:#018x}, {:#018x}], // {comment}", pair[0], pair[1]);
}

fn print_trailing(trailing: &[[u64; 2]; 15]) {
    println!("    trailing: [");
    for (i, pair) in trailing.iter().enumerate() {
        let len = i + 1;
        println!(
            "        [{:#018x}, {:#018x}], // {len:2} trailing bytes",
            pair[0], pair[1]
        );
    }
    println!("    ],");
}

fn print_crc64(label: &str, polynomial: u64) {
    let c = poly::crc64_fold_constants(polynomial);
    println!("// Constants for {label} (polynomial {polynomial:#018x})");
    println!("Crc64Constants {{");
    print_wide("x2048", &c.x2048, 2048);
    print_wide("x1536", &c.x1536, 1536);
    print_wide("x1024", &c.x1024, 1024);
    print_wide("x512", &c.x512, 512);
    print_pair("x384", &c.x384, "x^448 mod P(x) / x^384 mod P(x)");
    print_pair("x256", &c.x256, "x^320 mod P(x) / x^256 mod P(x)");
    print_pair("x128", &c.x128, "x^192 mod P(x) / x^128 mod P(x)");
    print_pair("mu_poly", &c.mu_poly, "Barrett mu / P(x), bit-reflected");
    print_trailing(&c.trailing);
    println!("}}");
}

fn print_crc32(label: &str, polynomial: u32) {
    let c = poly::crc32_fold_constants(polynomial);
    println!("// Constants for {label} (polynomial {polynomial:#010x})");
    println!("Crc32Constants {{");
    print_wide("x2048", &c.x2048, 2048);
    print_wide("x1536", &c.x1536, 1536);
    print_wide("x1024", &c.x1024, 1024);
    print_wide("x512", &c.x512, 512);
    print_pair("x384", &c.x384, "x^448 mod P(x) / x^384 mod P(x)");
    print_pair("x256", &c.x256, "x^320 mod P(x) / x^256 mod P(x)");
    print_pair("x128", &c.x128, "x^192 mod P(x) / x^128 mod P(x)");
    print_pair("x64", &c.x64, "x^96 mod P(x) / x^64 mod P(x)");
    print_pair("mu_poly", &c.mu_poly, "Barrett mu / 33-bit P(x), bit-reflected");
    print_trailing(&c.trailing);
    println!("}}");
}

fn main() {
    let variant = args().nth(1).unwrap_or_default();
    match variant.as_str() {
        "crc32" => print_crc32("CRC-32 (ISO-3309, gzip)", 0x04C1_1DB7),
        "crc32c" => print_crc32("CRC-32C (Castagnoli, iSCSI)", 0x1EDC_6F41),
        "crc64xz" => print_crc64("CRC-64/XZ", 0x42F0_E1EB_A9EA_3693),
        "crc64nvme" => print_crc64("CRC-64/NVMe", 0xAD93_D235_94C9_3659),
        _ => {
            eprintln!("usage: table_gen <crc32|crc32c|crc64xz|crc64nvme>");
            exit(1);
        }
    }
}
