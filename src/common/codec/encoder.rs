pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use tracing::debug;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{CHAR_CNT_BITS, DATA_BIT_CAPACITY, MODE_BITS};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    /// Bit length of a segment of `char_cnt` characters, header included, without encoding it.
    /// Data fits the symbol when this is at most [`DATA_BIT_CAPACITY`].
    pub fn bit_len(mode: Mode, char_cnt: usize) -> usize {
        MODE_BITS + CHAR_CNT_BITS + mode.encoded_len(char_cnt)
    }

    // Validates and writes a single segment, then pads the stream to the data
    // capacity of the symbol
    pub fn encode(data: &[u8], mode: Mode) -> QRResult<BitStream> {
        if !mode.contains_all(data) {
            return Err(QRError::InvalidChar);
        }

        let seg = Segment::new(mode, data);
        let sz = seg.bit_len();
        if sz > DATA_BIT_CAPACITY {
            return Err(QRError::DataTooLong);
        }

        let mut bs = BitStream::new(DATA_BIT_CAPACITY);
        push_segment(seg, &mut bs);
        debug!(mode = ?mode, chars = data.len(), bits = sz, "Segment encoded");

        pad(&mut bs);
        Ok(bs)
    }

    // Terminator, byte alignment and pad codewords. No-op once the stream is
    // full.
    pub fn pad(bs: &mut BitStream) {
        push_terminator(bs);
        pad_remaining_capacity(bs);
    }


    #[cfg(test)]
    mod encode_proptests {
        use proptest::prelude::*;

        use super::{bit_len, encode};
        use crate::common::codec::Mode;

        proptest! {
            #[test]
            fn proptest_alphanumeric_bit_len(data in "[0-9A-Z $%*+\\-./:]{0,38}") {
                let l = data.len();
                prop_assert_eq!(bit_len(Mode::Alphanumeric, l), 4 + 9 + (l / 2) * 11 + (l % 2) * 6);

                let mut bs = encode(data.as_bytes(), Mode::Alphanumeric).unwrap();
                prop_assert_eq!(bs.len(), 224);
                prop_assert_eq!(bs.take_bits(4), Some(Mode::Alphanumeric as u16));
                prop_assert_eq!(bs.take_bits(9), Some(l as u16));
            }

            #[test]
            fn proptest_byte_bit_len(data in prop::collection::vec(any::<u8>(), 0..=26)) {
                let mut bs = encode(&data, Mode::Byte).unwrap();
                prop_assert_eq!(bs.len(), 224);
                prop_assert_eq!(bs.take_bits(4), Some(Mode::Byte as u16));
                prop_assert_eq!(bs.take_bits(9), Some(data.len() as u16));
                for &b in data.iter() {
                    prop_assert_eq!(bs.take_bits(8), Some(b as u16));
                }
            }
        }
    }
}

// Writer
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, PADDING_CODEWORDS};

    pub fn push_segment(seg: Segment, out: &mut BitStream) {
        push_header(&seg, out);
        match seg.mode {
            Mode::Alphanumeric => push_alphanumeric_data(seg.data, out),
            Mode::Byte => push_byte_data(seg.data, out),
        }
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, seg.mode_bits);
        let char_cnt = seg.data.len();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            let data = Mode::Alphanumeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(1) {
            let data = Mode::Byte.encode_chunk(chunk);
            out.push_bits(data, 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 && out.len() < out.capacity() {
            let padding_bits_len = 8 - offset;
            out.push_bits(0u8, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        if out.len() >= out.capacity() {
            return;
        }

        let offset = out.len() & 7;
        debug_assert!(
            offset == 0,
            "Bit offset should be zero before padding codewords: {}",
            offset
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}
