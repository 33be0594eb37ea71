// Arithmetic over GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const PRIMITIVE_POLY: u16 = 0x11D;

// Number of non-zero field elements, and the period of alpha
pub const GF_ORDER: usize = 255;

// EXP[i] = alpha^i, with EXP[255] wrapping back to 1
pub static EXP_TABLE: [u8; 256] = build_exp_table();

// LOG[EXP[i]] = i. LOG[0] is a sentinel 0, zero has no logarithm.
pub static LOG_TABLE: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < GF_ORDER {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

#[inline]
pub fn exp(e: usize) -> u8 {
    EXP_TABLE[shrink_exp(e)]
}

#[inline]
pub fn log(x: u8) -> usize {
    debug_assert!(x != 0, "Logarithm of zero is undefined");
    LOG_TABLE[x as usize] as usize
}

// Reduces an exponent of alpha into 0..255
#[inline]
pub fn shrink_exp(e: usize) -> usize {
    e % GF_ORDER
}
