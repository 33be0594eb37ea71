use super::metadata::QR_WIDTH;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks column pairs from the right edge, right cell before left cell on each
// row, flipping the vertical direction after every pair. The vertical timing
// column is skipped by shifting the pair one column left.
pub struct EncRegionIter {
    r: i16,
    // Right column of the current pair
    c: i16,
    upward: bool,
    right: bool,
    width: i16,
}

impl EncRegionIter {
    pub const fn new() -> Self {
        let w = QR_WIDTH as i16;
        Self { r: w - 1, c: w - 1, upward: true, right: true, width: w }
    }

    fn next_pair(&mut self) {
        self.c -= 2;
        if self.c == VERT_TIMING_COL {
            self.c -= 1;
        }
        self.upward = !self.upward;
    }
}

impl Default for EncRegionIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }

        if self.right {
            self.right = false;
            return Some((self.r, self.c));
        }

        let res = (self.r, self.c - 1);
        self.right = true;
        match (self.upward, self.r) {
            (true, 0) => self.next_pair(),
            (true, _) => self.r -= 1,
            (false, r) if r == self.width - 1 => self.next_pair(),
            (false, _) => self.r += 1,
        }
        Some(res)
    }
}

const VERT_TIMING_COL: i16 = 6;

#[cfg(test)]
mod iter_tests {
    use super::EncRegionIter;
    use crate::builder::{Module, QRBuilder};

    #[test]
    fn test_enc_region_start() {
        let coords = EncRegionIter::new().take(6).collect::<Vec<_>>();
        assert_eq!(coords, [(24, 24), (24, 23), (23, 24), (23, 23), (22, 24), (22, 23)]);
    }

    #[test]
    fn test_enc_region_turn() {
        let coords = EncRegionIter::new().skip(48).take(4).collect::<Vec<_>>();
        assert_eq!(coords, [(0, 24), (0, 23), (0, 22), (0, 21)]);
    }

    #[test]
    fn test_enc_region_skips_timing_col() {
        let coords = EncRegionIter::new().collect::<Vec<_>>();
        assert_eq!(coords.len(), 600);
        assert!(coords.iter().all(|&(_, c)| c != 6));
        let mut sorted = coords.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 600);
        // Pair after columns 8 & 7 is 5 & 4, walked downward
        let i = coords.iter().position(|&p| p == (0, 5)).unwrap();
        assert_eq!(coords[i - 1], (0, 7));
        assert_eq!(coords[i + 1], (0, 4));
        assert_eq!(coords[i + 2], (1, 5));
        assert_eq!(*coords.last().unwrap(), (24, 0));
    }

    #[test]
    fn test_enc_region_iter() {
        let qr = QRBuilder::new(b"HELLO WORLD").build().unwrap();
        let data_modules = EncRegionIter::new()
            .filter(|(r, c)| matches!(qr.get(*r, *c), Module::Data(_)))
            .count();
        assert_eq!(data_modules, 359);
    }
}
