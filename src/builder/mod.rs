mod qr;

pub use qr::{Module, QR};

use std::ops::Deref;

use tracing::debug;

use crate::common::{
    bit_utils::BitStream,
    codec::{encode, Mode},
    ec::{generator_poly, CodewordBlock},
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{EC_INFO, MAX_QR_SIZE, REMAINDER_BITS},
};

pub struct QRBuilder<'a> {
    data: &'a [u8],
    mode: Mode,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, mode: Mode::Alphanumeric, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        match self.mask {
            Some(m) => format!(
                "{{ Mode: {:?}, Ec level: {:?}, Mask: {} }}",
                self.mode, EC_INFO.ec_level, *m
            ),
            None => format!("{{ Mode: {:?}, Ec level: {:?}, Mask: Auto }}", self.mode, EC_INFO.ec_level),
        }
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!(metadata = %self.metadata(), "Generating QR");

        // Validation happens here, before any module is placed
        let encoded_data = encode(self.data, self.mode)?;

        let blocks = Self::compute_ecc(&encoded_data);
        debug!(
            blocks = blocks.len(),
            codewords = blocks.iter().map(|b| b.ec_len()).sum::<usize>(),
            "Ecc computed"
        );

        let payload = Self::construct_payload(&encoded_data, &blocks);
        debug!(bits = payload.len(), "Payload interleaved");

        let mut qr = QR::new();
        qr.draw_all_function_patterns();
        debug!("Function patterns drawn");

        qr.draw_encoding_region(payload);

        match self.mask {
            Some(m) => {
                debug!(mask = *m, "Applying forced mask");
                qr.apply_mask(m);
            }
            None => {
                apply_best_mask(&mut qr);
            }
        }

        let dark_modules = qr.count_dark_modules();
        let light_modules = MAX_QR_SIZE - dark_modules;
        debug!(
            metadata = %qr.metadata(),
            dark_modules,
            light_modules,
            balance = dark_modules * 100 / MAX_QR_SIZE,
            "QR generated"
        );

        Ok(qr)
    }

    // Splits the data stream into the blocks of both groups and computes ecc
    // for each
    fn compute_ecc(data: &BitStream) -> Vec<CodewordBlock> {
        debug_assert!(
            data.len() == EC_INFO.data_bit_capacity(),
            "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
            data.len(),
            EC_INFO.data_bit_capacity()
        );

        let gen = generator_poly(EC_INFO.ecc_per_block);
        let mut blocks = Vec::with_capacity(EC_INFO.total_blocks());
        let mut offset = 0;
        for group in [EC_INFO.group1, EC_INFO.group2] {
            let bit_len = group.codewords << 3;
            for _ in 0..group.blocks {
                blocks.push(CodewordBlock::new(data, offset, bit_len, &gen));
                offset += bit_len;
            }
        }
        blocks
    }

    // Data codewords column-wise across blocks, then ecc codewords the same
    // way, then the remainder bits
    fn construct_payload(data: &BitStream, blocks: &[CodewordBlock]) -> BitStream {
        let data_blocks = blocks
            .iter()
            .map(|b| (0..b.data_len()).map(|i| b.data_codeword(data, i)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let ecc_blocks = blocks.iter().map(|b| b.ecc()).collect::<Vec<_>>();

        let mut payload = BitStream::new(EC_INFO.payload_bit_len());
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));
        payload.push_bits(0u8, REMAINDER_BITS);
        payload
    }

    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}
