use crate::common::metadata::{CHAR_CNT_BITS, MODE_BITS};

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

// Characters of the alphanumeric mode, in value order
pub const ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

// Marks bytes outside the alphanumeric charset
pub const INVALID_ALPHANUMERIC: u8 = 255;

static ALPHANUMERIC_VALUES: [u8; 256] = build_alphanumeric_values();

const fn build_alphanumeric_values() -> [u8; 256] {
    let mut table = [INVALID_ALPHANUMERIC; 256];
    let mut i = 0;
    while i < ALPHANUMERIC_CHARSET.len() {
        table[ALPHANUMERIC_CHARSET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

impl Mode {
    #[inline]
    pub fn alphanumeric_value(char: u8) -> u8 {
        ALPHANUMERIC_VALUES[char as usize]
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                debug_assert!(self.contains_all(data), "Invalid alphanumeric data: {data:?}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_value(*b) as u16)
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                data[0] as u16
            }
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Alphanumeric => Self::alphanumeric_value(byte) != INVALID_ALPHANUMERIC,
            Self::Byte => true,
        }
    }

    pub fn contains_all(&self, data: &[u8]) -> bool {
        data.iter().all(|&b| self.contains(b))
    }

    // Bits taken by the packed characters, header excluded
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Alphanumeric => (len / 2) * 11 + (len & 1) * 6,
            Self::Byte => len * 8,
        }
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub mode: Mode,
    pub mode_bits: usize, // Bit len of mode
    pub len_bits: usize,  // Bit len of char count
    pub data: &'a [u8],   // Reference to raw data
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, data: &'a [u8]) -> Self {
        Self { mode, mode_bits: MODE_BITS, len_bits: CHAR_CNT_BITS, data }
    }

    pub fn bit_len(&self) -> usize {
        let encoded_bits = self.mode.encoded_len(self.data.len());
        self.mode_bits + self.len_bits + encoded_bits
    }
}


// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
