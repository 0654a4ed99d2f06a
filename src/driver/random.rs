//! TPC-C's non-uniform random generator (NURand) plus the small helpers
//! the generator and client build parameters with.

use rand::rngs::StdRng;
use rand::Rng;

/// `NURand(A, x, y) = (((random(0,A) | random(x,y)) + C) % (y - x + 1)) + x`.
/// `C` is fixed per call site by the TPC-C spec; we take it as a parameter
/// rather than hard-coding the three magic constants (259, 7911, small
/// values for credit/id) the benchmark assigns per field.
pub fn nu_rand(rng: &mut StdRng, a: i64, c: i64, x: i64, y: i64) -> i64 {
    let r1 = rng.gen_range(0..=a);
    let r2 = rng.gen_range(x..=y);
    (((r1 | r2) + c) % (y - x + 1)) + x
}

const SYLLABLES: [&str; 10] = [
    "BAR", "OUGHT", "ABLE", "PRI", "PRES", "ESE", "ANTI", "CALLY", "ATION", "EING",
];

/// Builds a last name from the TPC-C last-name generator: three digits
/// 0..=9 chosen independently index into [`SYLLABLES`] and are concatenated.
pub fn last_name(n: i64) -> String {
    let d1 = n / 100;
    let d2 = (n / 10) % 10;
    let d3 = n % 10;
    format!(
        "{}{}{}",
        SYLLABLES[d1 as usize], SYLLABLES[d2 as usize], SYLLABLES[d3 as usize]
    )
}

/// Picks a last name non-uniformly over `0..=999`, per TPC-C's constant
/// `C_LAST = 255` (a fixed run constant in the real benchmark; any stable
/// value in the documented range is permitted and this one is picked once
/// per process via `c_run`).
pub fn random_last_name(rng: &mut StdRng, c_run: i64) -> String {
    let n = nu_rand(rng, 255, c_run, 0, 999);
    last_name(n)
}

pub fn random_alpha_string(rng: &mut StdRng, min_len: usize, max_len: usize) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let len = rng.gen_range(min_len..=max_len);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn random_numeric_string(rng: &mut StdRng, len: usize) -> String {
    (0..len).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}

pub fn random_zip(rng: &mut StdRng) -> String {
    format!("{}11111", random_numeric_string(rng, 4))
}

/// 10% of generated item/stock `data` strings get "ORIGINAL" spliced in at
/// a random position, per the TPC-C data-population rules.
pub fn random_data_with_original(rng: &mut StdRng, min_len: usize, max_len: usize) -> String {
    let mut s = random_alpha_string(rng, min_len, max_len);
    if rng.gen_bool(0.1) && s.len() >= 8 {
        let pos = rng.gen_range(0..=s.len() - 8);
        s.replace_range(pos..pos + 8, "ORIGINAL");
    }
    s
}
