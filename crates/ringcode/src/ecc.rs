//! Reed-Solomon error correction over GF(2^8).
//!
//! Redundancy bytes appended to the payload are RS parity symbols computed
//! with the primitive polynomial 0x11D (x^8+x^4+x^3+x^2+1). Encoding is
//! systematic; decoding runs Berlekamp-Massey with Chien search and the
//! Forney algorithm, correcting up to `parity / 2` symbol errors. Payloads
//! are always shorter than one 255-symbol block, so shortened codes are
//! used throughout and no block splitting exists.

use std::sync::OnceLock;

/// Primitive polynomial for GF(2^8): x^8 + x^4 + x^3 + x^2 + 1 = 0x11D.
const PRIM_POLY: u16 = 0x11D;

/// Full RS block size (2^8 - 1 symbols).
const N_MAX: usize = 255;

/// Fraction of codeword data bytes allowed to be blank (0x00 or 0xFF)
/// before the codeword is rejected outright. An all-zero block is a valid
/// RS codeword, so this filter is what rejects blank frames.
const MAX_BLANK_FRAC: f64 = 0.8;

/// Redundancy budget selector.
///
/// Each level maps to a fixed parity-byte count; higher levels trade
/// payload capacity for correction strength (`t = parity / 2` symbols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EccLevel {
    /// 8 parity bytes, corrects up to 4 symbol errors.
    Low,
    /// 16 parity bytes, corrects up to 8 symbol errors.
    Medium,
    /// 32 parity bytes, corrects up to 16 symbol errors.
    High,
    /// 64 parity bytes, corrects up to 32 symbol errors.
    Max,
}

impl EccLevel {
    /// All levels in wire-byte order.
    pub const ALL: [EccLevel; 4] = [Self::Low, Self::Medium, Self::High, Self::Max];

    /// Parity bytes appended at this level.
    pub const fn parity_bytes(self) -> usize {
        match self {
            Self::Low => 8,
            Self::Medium => 16,
            Self::High => 32,
            Self::Max => 64,
        }
    }

    /// Maximum number of correctable symbol errors (`parity / 2`).
    pub const fn correctable_symbols(self) -> usize {
        self.parity_bytes() / 2
    }

    /// Wire encoding (header byte).
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Max => 3,
        }
    }

    /// Parse the header byte back to a level.
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            3 => Some(Self::Max),
            _ => None,
        }
    }
}

impl std::fmt::Display for EccLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Max => "max",
        };
        f.write_str(name)
    }
}

// --- GF(2^8) arithmetic ---

/// Precomputed log/exp tables. The exp table is doubled so products of two
/// logs index without a modulo.
struct GfTables {
    exp: [u8; 512],
    log: [u8; 256],
}

fn gf_tables() -> &'static GfTables {
    static TABLES: OnceLock<GfTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255u16 {
            exp[i as usize] = x as u8;
            exp[(i + 255) as usize] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIM_POLY;
            }
        }
        exp[510] = exp[0];
        exp[511] = exp[1];
        GfTables { exp, log }
    })
}

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = gf_tables();
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

fn gf_inv(a: u8) -> u8 {
    debug_assert_ne!(a, 0, "zero has no inverse in GF(2^8)");
    let t = gf_tables();
    t.exp[255 - t.log[a as usize] as usize]
}

/// Evaluate a polynomial at `x`; `poly[0]` holds the highest-degree
/// coefficient.
fn poly_eval(poly: &[u8], x: u8) -> u8 {
    let mut acc = 0u8;
    for &c in poly {
        acc = gf_mul(acc, x) ^ c;
    }
    acc
}

/// Evaluate a polynomial in ascending-power form at `x`.
fn poly_eval_asc(poly: &[u8], x: u8) -> u8 {
    let mut acc = 0u8;
    let mut xp = 1u8;
    for &c in poly {
        acc ^= gf_mul(c, xp);
        xp = gf_mul(xp, x);
    }
    acc
}

/// Generator polynomial g(x) = prod_{i=0}^{parity-1} (x - alpha^i),
/// highest degree first. Cached per level.
fn gen_poly(level: EccLevel) -> &'static Vec<u8> {
    static POLYS: OnceLock<[Vec<u8>; 4]> = OnceLock::new();
    let polys = POLYS.get_or_init(|| {
        EccLevel::ALL.map(|lv| {
            let t = gf_tables();
            let mut g = vec![1u8];
            for i in 0..lv.parity_bytes() {
                let root = t.exp[i];
                let mut next = vec![0u8; g.len() + 1];
                for (j, &c) in g.iter().enumerate() {
                    next[j] ^= c;
                    next[j + 1] ^= gf_mul(c, root);
                }
                g = next;
            }
            g
        })
    });
    &polys[level.as_byte() as usize]
}

// --- Public contract ---

/// Redundancy validation failure: the codeword carries more corruption
/// than the level's parity budget can correct, or is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedundancyError;

impl std::fmt::Display for RedundancyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("redundancy validation failed")
    }
}

impl std::error::Error for RedundancyError {}

/// Compute the parity bytes for `payload` at `level` (systematic encoding).
///
/// The returned vector has exactly `level.parity_bytes()` entries; the full
/// codeword on the wire is `payload ‖ parity`.
pub fn append_redundancy(payload: &[u8], level: EccLevel) -> Vec<u8> {
    let parity = level.parity_bytes();
    debug_assert!(
        payload.len() + parity <= N_MAX,
        "codeword must fit one RS block"
    );

    let g = gen_poly(level);
    let mut shift_reg = vec![0u8; parity];
    for &byte in payload {
        let feedback = byte ^ shift_reg[0];
        for j in 0..parity - 1 {
            shift_reg[j] = shift_reg[j + 1] ^ gf_mul(feedback, g[j + 1]);
        }
        shift_reg[parity - 1] = gf_mul(feedback, g[parity]);
    }
    shift_reg
}

/// Validate and correct a codeword (`data ‖ parity`) at `level`.
///
/// `payload_len` is the declared length of real payload inside the data
/// section (the remainder is zero padding up to the level's capacity).
/// Returns the corrected data bytes and the number of symbol errors that
/// were corrected. Fails when the declared payload is blank (≥80% of bytes
/// are 0x00 or 0xFF), when more than `t` symbols are corrupted, or when
/// the corrected word still has nonzero syndromes.
pub fn validate_redundancy(
    codeword: &[u8],
    payload_len: usize,
    level: EccLevel,
) -> Result<(Vec<u8>, usize), RedundancyError> {
    let parity = level.parity_bytes();
    if codeword.len() <= parity {
        return Err(RedundancyError);
    }
    let data_len = codeword.len() - parity;
    if payload_len == 0 || payload_len > data_len {
        return Err(RedundancyError);
    }

    // Blank-frame filter over the declared payload (the zero padding after
    // it is legitimate). A run of identical bytes often survives RS when a
    // capture is a featureless surface; reject before spending decode work.
    let blank = codeword[..payload_len]
        .iter()
        .filter(|&&b| b == 0x00 || b == 0xFF)
        .count();
    if (blank as f64) >= MAX_BLANK_FRAC * payload_len as f64 {
        return Err(RedundancyError);
    }

    // Shortened code: conceptually left-pad with zeros to a full block.
    let padding = N_MAX - codeword.len();
    let mut block = vec![0u8; N_MAX];
    block[padding..].copy_from_slice(codeword);

    let t_tab = gf_tables();
    let mut syndromes = vec![0u8; parity];
    let mut all_zero = true;
    for (i, s) in syndromes.iter_mut().enumerate() {
        *s = poly_eval(&block, t_tab.exp[i]);
        all_zero &= *s == 0;
    }
    if all_zero {
        return Ok((codeword[..data_len].to_vec(), 0));
    }

    let sigma = berlekamp_massey(&syndromes);
    let num_errors = sigma.len() - 1;
    if num_errors > level.correctable_symbols() {
        return Err(RedundancyError);
    }

    let positions = chien_search(&sigma).ok_or(RedundancyError)?;
    let magnitudes = forney(&sigma, &syndromes, &positions);

    for (&(_, array_pos), &mag) in positions.iter().zip(&magnitudes) {
        if array_pos < padding {
            // Error located in the virtual zero padding of the shortened
            // code: the word is unrecoverable.
            return Err(RedundancyError);
        }
        block[array_pos] ^= mag;
    }

    for i in 0..parity {
        if poly_eval(&block, t_tab.exp[i]) != 0 {
            return Err(RedundancyError);
        }
    }

    Ok((block[padding..padding + data_len].to_vec(), num_errors))
}

/// Berlekamp-Massey: error locator sigma(x) in ascending power,
/// `sigma[0] == 1`.
fn berlekamp_massey(syndromes: &[u8]) -> Vec<u8> {
    let n = syndromes.len();

    let mut c = vec![0u8; n + 1];
    c[0] = 1;
    let mut c_len = 1usize;

    let mut b = vec![0u8; n + 1];
    b[0] = 1;
    let mut b_len = 1usize;

    let mut ell = 0usize;
    let mut prev_delta = 1u8;
    let mut m = 1usize;

    for r in 0..n {
        let mut delta = syndromes[r];
        for i in 1..c_len {
            delta ^= gf_mul(c[i], syndromes[r - i]);
        }

        if delta == 0 {
            m += 1;
            continue;
        }

        let factor = gf_mul(delta, gf_inv(prev_delta));

        if 2 * ell <= r {
            let old_c = c.clone();
            let old_c_len = c_len;

            c_len = (b_len + m).max(c_len);
            for j in 0..b_len {
                c[j + m] ^= gf_mul(factor, b[j]);
            }

            b[..old_c_len].copy_from_slice(&old_c[..old_c_len]);
            for slot in b.iter_mut().skip(old_c_len) {
                *slot = 0;
            }
            b_len = old_c_len;
            ell = r + 1 - ell;
            prev_delta = delta;
            m = 1;
        } else {
            c_len = (b_len + m).max(c_len);
            for j in 0..b_len {
                c[j + m] ^= gf_mul(factor, b[j]);
            }
            m += 1;
        }
    }

    c[..c_len].to_vec()
}

/// Chien search over the full block: roots of sigma give error positions.
///
/// Returns `(gf_position, array_index)` pairs, or None when the number of
/// located roots disagrees with the locator degree.
fn chien_search(sigma: &[u8]) -> Option<Vec<(usize, usize)>> {
    let t = gf_tables();
    let num_errors = sigma.len() - 1;
    let mut found = Vec::with_capacity(num_errors);

    for p in 0..N_MAX {
        let x = if p == 0 {
            1u8
        } else {
            t.exp[(255 - (p % 255)) % 255]
        };
        if poly_eval_asc(sigma, x) == 0 {
            found.push((p, N_MAX - 1 - p));
        }
    }

    (found.len() == num_errors).then_some(found)
}

/// Forney algorithm: error magnitudes at the located positions (FCR = 0).
fn forney(sigma: &[u8], syndromes: &[u8], positions: &[(usize, usize)]) -> Vec<u8> {
    let t = gf_tables();
    let two_t = syndromes.len();

    // Omega(x) = S(x) * sigma(x) mod x^{2t}, ascending power.
    let mut omega = vec![0u8; two_t];
    for (i, &sc) in sigma.iter().enumerate().take(two_t) {
        for (j, &sy) in syndromes.iter().enumerate() {
            if i + j < two_t {
                omega[i + j] ^= gf_mul(sc, sy);
            }
        }
    }

    // Formal derivative in GF(2^m): even-power terms vanish.
    let mut sigma_prime = vec![0u8; sigma.len().saturating_sub(1)];
    for i in (1..sigma.len()).step_by(2) {
        sigma_prime[i - 1] = sigma[i];
    }

    positions
        .iter()
        .map(|&(gf_pos, _)| {
            let x = if gf_pos == 0 { 1u8 } else { t.exp[gf_pos % 255] };
            let x_inv = if gf_pos == 0 {
                1u8
            } else {
                t.exp[(255 - (gf_pos % 255)) % 255]
            };
            let num = poly_eval_asc(&omega, x_inv);
            let den = poly_eval_asc(&sigma_prime, x_inv);
            if den == 0 {
                0
            } else {
                gf_mul(x, gf_mul(num, gf_inv(den)))
            }
        })
        .collect()
}
