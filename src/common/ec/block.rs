use super::{encoder::compute_ecc_codewords, poly::Alpha, poly::Poly, MAX_EC_SIZE};
use crate::common::bit_utils::BitStream;

// Data codewords of a block stay in the stream, referenced by bit span.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CodewordBlock {
    // Bit offset of the block in the data stream
    offset: usize,
    // Bit length of the block's data
    bit_len: usize,
    ecc: [u8; MAX_EC_SIZE],
    ec_len: usize,
}

impl CodewordBlock {
    pub fn new(stream: &BitStream, offset: usize, bit_len: usize, gen: &Poly<Alpha>) -> Self {
        let codewords = compute_ecc_codewords(stream, offset, bit_len, gen);
        let ec_len = codewords.len();
        debug_assert!(ec_len <= MAX_EC_SIZE, "Too many ecc codewords: {ec_len}");

        let mut ecc = [0u8; MAX_EC_SIZE];
        ecc[..ec_len].copy_from_slice(&codewords);
        Self { offset, bit_len, ecc, ec_len }
    }

    #[cfg(test)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[cfg(test)]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn data_len(&self) -> usize {
        (self.bit_len + 7) >> 3
    }

    pub fn ec_len(&self) -> usize {
        self.ec_len
    }

    pub fn ecc(&self) -> &[u8] {
        &self.ecc[..self.ec_len]
    }

    // i-th data codeword, read from the stream the block was built from
    pub fn data_codeword(&self, stream: &BitStream, i: usize) -> u8 {
        debug_assert!(i < self.data_len(), "Codeword out of block: Index {i}");

        let pos = i << 3;
        stream.byte_at(self.offset + pos, (self.bit_len - pos).min(8))
    }
}
