use std::{fmt::Display, mem};

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BitStream {
    data: [u8; MAX_PAYLOAD_SIZE],
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
    // Pointer to take bits
    cursor: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(
            capacity <= MAX_PAYLOAD_SIZE << 3,
            "Capacity exceeds payload buffer: Capacity {capacity}"
        );
        Self { data: [0; MAX_PAYLOAD_SIZE], len: 0, capacity, cursor: 0 }
    }

    #[cfg(test)]
    pub fn from(inp: &[u8]) -> Self {
        let len = inp.len();
        let bit_len = len << 3;
        let mut data = [0; MAX_PAYLOAD_SIZE];
        data[..len].copy_from_slice(inp);
        Self { data, len: bit_len, capacity: bit_len, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..(self.len + 7) >> 3]
    }

    pub fn get(&self, pos: usize) -> bool {
        debug_assert!(pos < self.len, "Out of bitstream bounds: Len {}, Pos {pos}", self.len);

        (self.data[pos >> 3] << (pos & 7)) >> 7 == 1
    }

    // Up to 8 bits starting at pos, left aligned & zero padded
    pub fn byte_at(&self, pos: usize, count: usize) -> u8 {
        debug_assert!(count <= 8, "Cannot read more than a byte: Count {count}");
        debug_assert!(
            pos + count <= self.len,
            "Out of bitstream bounds: Len {}, End {}",
            self.len,
            pos + count
        );

        (0..count).fold(0, |b, i| b | ((self.get(pos + i) as u8) << (7 - i)))
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        debug_assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        match size {
            0 => (),
            1..=8 => {
                let bits = bits.to_u8().unwrap_or_default();
                let offset = self.len & 7;
                let pos = self.len >> 3;

                if offset + size <= 8 {
                    self.data[pos] |= bits << (8 - size - offset);
                } else {
                    self.data[pos] |= bits >> (size + offset - 8);
                    self.data[pos + 1] = bits << (16 - size - offset);
                }

                self.len += size;
            }
            9..=16 => {
                let hi = (bits >> 8).to_u8().unwrap_or_default();
                let lo = (bits & T::from(0xFF).unwrap_or_else(T::zero)).to_u8().unwrap_or_default();
                self.push_bits(hi, size - 8);
                self.push_bits(lo, 8);
            }
            _ => panic!("Bits from only u8 and u16 can be pushed"),
        }
    }

    pub fn push(&mut self, bit: bool) {
        debug_assert!(
            self.len < self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + 1
        );

        if bit {
            let offset = self.len & 7;
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }

        self.len += 1;
    }

    pub fn extend(&mut self, arr: &[u8]) {
        debug_assert!(
            (self.len & 7) == 0,
            "Bit offset must be zero to extend from another array: Bit offset {}",
            self.len & 7
        );
        let pos = self.len >> 3;
        let arr_bits = arr.len() << 3;
        debug_assert!(
            self.len + arr_bits <= self.capacity,
            "Extension shouldn't overflow capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + arr_bits
        );
        self.data[pos..pos + arr.len()].copy_from_slice(arr);
        self.len += arr_bits;
    }
}


// Take bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    #[cfg(test)]
    pub fn take_bits(&mut self, n: usize) -> Option<u16> {
        debug_assert!(n <= 16, "Cannot take more than 16 bits: N {n}");

        if self.cursor + n > self.len {
            return None;
        }

        let offset = self.cursor & 7;
        let pos = self.cursor >> 3;

        let mut res = (self.data[pos] as u32) << 16;
        if offset + n > 8 {
            res |= (self.data[pos + 1] as u32) << 8;
        }
        if offset + n > 16 {
            res |= self.data[pos + 2] as u32;
        }
        res >>= 24 - offset - n;
        res &= (1 << n) - 1;

        self.cursor += n;
        Some(res as u16)
    }

    pub fn take(&mut self) -> Option<bool> {
        if self.cursor == self.len {
            return None;
        }

        let bit = self.get(self.cursor);
        self.cursor += 1;
        Some(bit)
    }
}

#[cfg(test)]
mod bit_stream_take_tests {

    use super::BitStream;

    #[test]
    fn test_take_bits() {
        let data = [0b11010010, 0b00110100, 0b10001101, 0b00100011, 0b01001000];
        let mut bs = BitStream::from(&data);
        assert_eq!(bs.take_bits(0), Some(0));
        assert_eq!(bs.take_bits(4), Some(0b1101));
        assert_eq!(bs.take_bits(4), Some(0b0010));
        assert_eq!(bs.take_bits(9), Some(0b001101001));
        assert_eq!(bs.take_bits(7), Some(0b0001101));
        assert_eq!(bs.take_bits(16), Some(0b00100011_01001000));
        assert_eq!(bs.take_bits(1), None);
    }

    #[test]
    fn test_byte_at() {
        let bs = BitStream::from(&[0b11010010, 0b00110100]);
        assert_eq!(bs.byte_at(0, 8), 0b11010010);
        assert_eq!(bs.byte_at(4, 8), 0b00100011);
        assert_eq!(bs.byte_at(12, 4), 0b01000000);
        assert_eq!(bs.byte_at(3, 0), 0);
    }

    #[test]
    fn test_iter() {
        let bs = BitStream::from(&[0b10100000]);
        let bits = bs.collect::<Vec<_>>();
        assert_eq!(bits, [true, false, true, false, false, false, false, false]);
    }
}

// Iterator for bit stream
//------------------------------------------------------------------------------

impl Iterator for BitStream {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        self.take()
    }
}

// Global constants
//------------------------------------------------------------------------------

// Byte buffer of a stream, large enough for every module of the symbol
pub const MAX_PAYLOAD_SIZE: usize = 80;
