use std::ops::Not;

use super::mask::MaskPattern;

// Symbol constants
//------------------------------------------------------------------------------

// Symbols are always version 2 at error correction level M
pub const VERSION: usize = 2;

pub const QR_WIDTH: usize = VERSION * 4 + 17;

pub const MAX_QR_SIZE: usize = QR_WIDTH * QR_WIDTH;

pub const MODE_BITS: usize = 4;

pub const CHAR_CNT_BITS: usize = 9;

pub const REMAINDER_BITS: usize = 7;

// Row & column centers of alignment patterns
pub const ALIGNMENT_PATTERN_POSITIONS: [i16; 2] = [6, 18];

pub const DARK_MODULE: (i16, i16) = (VERSION as i16 * 4 + 9, 8);

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ECLevel {
    L = 0b01,
    M = 0b00,
    Q = 0b11,
    H = 0b10,
}

// Block layout
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct BlockGroup {
    pub blocks: usize,
    // Data codewords per block
    pub codewords: usize,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct EcInfo {
    pub ec_level: ECLevel,
    pub ecc_per_block: usize,
    pub group1: BlockGroup,
    pub group2: BlockGroup,
}

impl EcInfo {
    pub const V2_M: Self = Self {
        ec_level: ECLevel::M,
        ecc_per_block: 16,
        group1: BlockGroup { blocks: 1, codewords: 28 },
        group2: BlockGroup { blocks: 0, codewords: 0 },
    };

    pub const fn total_blocks(&self) -> usize {
        self.group1.blocks + self.group2.blocks
    }

    pub const fn data_codewords(&self) -> usize {
        self.group1.blocks * self.group1.codewords + self.group2.blocks * self.group2.codewords
    }

    pub const fn data_bit_capacity(&self) -> usize {
        self.data_codewords() << 3
    }

    pub const fn total_codewords(&self) -> usize {
        self.data_codewords() + self.total_blocks() * self.ecc_per_block
    }

    // Bit length of the interleaved payload, remainder bits included
    pub const fn payload_bit_len(&self) -> usize {
        (self.total_codewords() << 3) + REMAINDER_BITS
    }
}

pub const EC_INFO: EcInfo = EcInfo::V2_M;

pub const DATA_BIT_CAPACITY: usize = EC_INFO.data_bit_capacity();

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Format info
//------------------------------------------------------------------------------

pub const FORMAT_INFO_BIT_LEN: usize = 15;

const FORMAT_DATA_BIT_LEN: usize = 5;

const FORMAT_ERROR_BIT_LEN: usize = 10;

// x^10 + x^8 + x^5 + x^4 + x^2 + x + 1, most significant bit first
const FORMAT_GENERATOR: [bool; 11] =
    [true, false, true, false, false, true, true, false, true, true, true];

// 101010000010010
const FORMAT_MASK: [bool; FORMAT_INFO_BIT_LEN] = [
    true, false, true, false, true, false, false, false, false, false, true, false, false, true,
    false,
];

// Systematic BCH(15, 5) encoding of ec level & mask pattern. Index 0 of the
// scratch field holds the most significant bit of the codeword.
pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u16 {
    let mut field = [false; FORMAT_INFO_BIT_LEN];
    write_format_data(&mut field, ecl, mask);

    let (mut index, mut count) = (0, FORMAT_INFO_BIT_LEN);
    trim_leading_zeros(&field, &mut index, &mut count);
    while count > FORMAT_ERROR_BIT_LEN {
        for (f, g) in field[index..].iter_mut().zip(FORMAT_GENERATOR.iter()) {
            *f ^= g;
        }
        trim_leading_zeros(&field, &mut index, &mut count);
    }

    // Move remainder to the tail so it sits right after the 5 data bits
    field.copy_within(index..index + count, 0);
    field[count..].fill(false);
    field.rotate_right(FORMAT_INFO_BIT_LEN - count);

    write_format_data(&mut field, ecl, mask);

    field
        .iter()
        .zip(FORMAT_MASK.iter())
        .fold(0, |acc, (&f, &m)| (acc << 1) | (f ^ m) as u16)
}

fn write_format_data(field: &mut [bool; FORMAT_INFO_BIT_LEN], ecl: ECLevel, mask: MaskPattern) {
    let data = ((ecl as u8) << 3) | *mask;
    for (i, f) in field[..FORMAT_DATA_BIT_LEN].iter_mut().enumerate() {
        *f = (data >> (FORMAT_DATA_BIT_LEN - 1 - i)) & 1 == 1;
    }
}

#[inline]
fn trim_leading_zeros(field: &[bool], index: &mut usize, count: &mut usize) {
    while *count > 0 && !field[*index] {
        *index += 1;
        *count -= 1;
    }
}

// Scan position i of both copies carries bit i of the format info
pub static FORMAT_INFO_COORDS_MAIN: [(i16, i16); FORMAT_INFO_BIT_LEN] = [
    (0, 8),
    (1, 8),
    (2, 8),
    (3, 8),
    (4, 8),
    (5, 8),
    (7, 8),
    (8, 8),
    (8, 7),
    (8, 5),
    (8, 4),
    (8, 3),
    (8, 2),
    (8, 1),
    (8, 0),
];

pub static FORMAT_INFO_COORDS_SIDE: [(i16, i16); FORMAT_INFO_BIT_LEN] = [
    (8, -1),
    (8, -2),
    (8, -3),
    (8, -4),
    (8, -5),
    (8, -6),
    (8, -7),
    (8, -8),
    (-7, 8),
    (-6, 8),
    (-5, 8),
    (-4, 8),
    (-3, 8),
    (-2, 8),
    (-1, 8),
];
