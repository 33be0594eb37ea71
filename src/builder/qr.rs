use std::ops::Deref;

use tracing::debug;

use crate::common::bit_utils::BitStream;
use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::*;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

impl Module {
    // Function patterns, the dark module & format areas are never written by
    // data placement or masking
    pub fn is_blocked(&self) -> bool {
        matches!(self, Module::Func(_) | Module::Format(_))
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Box<[Module; MAX_QR_SIZE]>,
    w: usize,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new() -> Self {
        Self {
            grid: Box::new([Module::Empty; MAX_QR_SIZE]),
            w: QR_WIDTH,
            ecl: EC_INFO.ec_level,
            mask: None,
        }
    }

    pub fn grid(&self) -> &[Module] {
        &*self.grid
    }

    pub fn version(&self) -> usize {
        VERSION
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn metadata(&self) -> String {
        let mask = self.mask.map(|m| *m);
        format!("{{ Version: {VERSION}, Ec level: {:?}, Mask: {mask:?} }}", self.ecl)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    pub fn is_dark(&self, r: i16, c: i16) -> bool {
        *self.get(r, c) == Color::Dark
    }

    // Dark modules as true, indexed [row][column]
    pub fn matrix(&self) -> [[bool; QR_WIDTH]; QR_WIDTH] {
        let mut res = [[false; QR_WIDTH]; QR_WIDTH];
        for (r, row) in res.iter_mut().enumerate() {
            for (c, m) in row.iter_mut().enumerate() {
                *m = self.is_dark(r as i16, c as i16);
            }
        }
        res
    }

    // Row major modules, one bit each with dark as 1, zero padded to a byte
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        let mut bs = BitStream::new(RAW_BIT_LEN);
        for m in self.grid.iter() {
            bs.push(**m == Color::Dark);
        }
        bs.push_bits(0u8, RAW_BIT_LEN - MAX_QR_SIZE);
        bs.data().to_vec()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}

impl Default for QR {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod qr_util_tests {
    use super::{Module, QR};
    use crate::common::metadata::Color;

    #[test]
    fn test_index_wrap() {
        let mut qr = QR::new();
        let w = qr.w as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = QR::new();
        let w = qr.w as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_out_of_bound() {
        let qr = QR::new();
        let w = qr.w as i16;
        qr.get(0, w);
    }

    #[test]
    #[should_panic]
    fn test_row_index_overwrap() {
        let qr = QR::new();
        let w = qr.w as i16;
        qr.get(-(w + 1), 0);
    }

    #[test]
    fn test_module_blocked() {
        assert!(Module::Func(Color::Light).is_blocked());
        assert!(Module::Format(Color::Dark).is_blocked());
        assert!(!Module::Data(Color::Dark).is_blocked());
        assert!(!Module::Empty.is_blocked());
    }

    #[test]
    fn test_blank_accessors() {
        let qr = QR::new();
        assert_eq!(qr.width(), 25);
        assert_eq!(qr.version(), 2);
        assert_eq!(qr.count_dark_modules(), 0);
        assert_eq!(qr.mask(), None);
        assert_eq!(qr.metadata(), "{ Version: 2, Ec level: M, Mask: None }");
        assert_eq!(qr.to_raw_bytes(), vec![0; 79]);
    }

    #[test]
    fn test_raw_bytes_order() {
        let mut qr = QR::new();
        qr.set(0, 0, Module::Func(Color::Dark));
        qr.set(0, 9, Module::Data(Color::Dark));
        qr.set(-1, -1, Module::Data(Color::Dark));
        let raw = qr.to_raw_bytes();
        assert_eq!(raw.len(), 79);
        assert_eq!(raw[0], 0b1000_0000);
        assert_eq!(raw[1], 0b0100_0000);
        // Module 624 is bit 0 of byte 78, followed by 7 padding bits
        assert_eq!(raw[78], 0b1000_0000);
        let matrix = qr.matrix();
        assert!(matrix[0][0] && matrix[0][9] && matrix[24][24]);
        assert!(!matrix[9][0]);
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        for i in -3..=3 {
            for j in -3..=3 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }

    // Light strips between the finder patterns and the encoding region
    fn reserve_separators(&mut self) {
        let w = self.w as i16;
        for i in 0..8 {
            self.set(7, i, Module::Func(Color::Light));
            self.set(i, 7, Module::Func(Color::Light));
            self.set(7, w - 1 - i, Module::Func(Color::Light));
            self.set(i, -8, Module::Func(Color::Light));
            self.set(-8, i, Module::Func(Color::Light));
            self.set(w - 1 - i, 7, Module::Func(Color::Light));
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        let (off, last) = (6, w - 9);
        self.draw_line(off, 8, off, last);
        self.draw_line(8, off, last, off);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        for &r in ALIGNMENT_PATTERN_POSITIONS.iter() {
            for &c in ALIGNMENT_PATTERN_POSITIONS.iter() {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod alignment_pattern_tests {
    use crate::builder::QR;

    #[test]
    fn test_alignment_pattern() {
        let mut qr = QR::new();
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffff...........fffffff\n\
             fFFFFFf...........fFFFFFf\n\
             fFfffFf...........fFfffFf\n\
             fFfffFf...........fFfffFf\n\
             fFfffFf...........fFfffFf\n\
             fFFFFFf...........fFFFFFf\n\
             fffffff...........fffffff\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             ................fffff....\n\
             ................fFFFf....\n\
             fffffff.........fFfFf....\n\
             fFFFFFf.........fFFFf....\n\
             fFfffFf.........fffff....\n\
             fFfffFf..................\n\
             fFfffFf..................\n\
             fFFFFFf..................\n\
             fffffff..................\n"
        );
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.reserve_separators();
        self.draw_alignment_patterns();
        self.draw_timing_pattern();
        self.draw_dark_module();
    }

    fn draw_dark_module(&mut self) {
        let (r, c) = DARK_MODULE;
        self.set(r, c, Module::Func(Color::Dark));
    }
}

#[cfg(test)]
mod all_function_patterns_test {
    use crate::builder::QR;

    #[test]
    fn test_all_function_patterns() {
        let mut qr = QR::new();
        qr.draw_all_function_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.........Ffffffff\n\
             fFFFFFfF.........FfFFFFFf\n\
             fFfffFfF.........FfFfffFf\n\
             fFfffFfF.........FfFfffFf\n\
             fFfffFfF.........FfFfffFf\n\
             fFFFFFfF.........FfFFFFFf\n\
             fffffffFfFfFfFfFfFfffffff\n\
             FFFFFFFF.........FFFFFFFF\n\
             ......f..................\n\
             ......F..................\n\
             ......f..................\n\
             ......F..................\n\
             ......f..................\n\
             ......F..................\n\
             ......f..................\n\
             ......F..................\n\
             ......f.........fffff....\n\
             FFFFFFFFf.......fFFFf....\n\
             fffffffF........fFfFf....\n\
             fFFFFFfF........fFFFf....\n\
             fFfffFfF........fffff....\n\
             fFfffFfF.................\n\
             fFfffFfF.................\n\
             fFFFFFfF.................\n\
             fffffffF.................\n"
        );
    }
}

// Format info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info(0);
    }

    fn draw_format_info(&mut self, format_info: u16) {
        self.draw_number(
            format_info,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_MAIN,
        );
        self.draw_number(
            format_info,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_SIDE,
        );
    }

    // Bit i of the number goes to the i-th coordinate
    fn draw_number(&mut self, number: u16, off_clr: Module, on_clr: Module, coords: &[(i16, i16)]) {
        for (i, (r, c)) in coords.iter().enumerate() {
            if (number >> i) & 1 == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_encoding_region(&mut self, payload: BitStream) {
        self.reserve_format_area();
        self.draw_payload(payload);

        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module left after placement");
    }

    // Stream bits fill unblocked cells in walk order. Cells left over once
    // the stream ends stay light.
    fn draw_payload(&mut self, payload: BitStream) {
        let payload_len = payload.len();
        let mut coords = EncRegionIter::new();
        let mut placed = 0;
        for bit in payload {
            let module = Module::Data(Color::from(bit));
            let Some((r, c)) = coords.by_ref().find(|&(r, c)| !self.get(r, c).is_blocked()) else {
                break;
            };
            self.set(r, c, module);
            placed += 1;
        }
        debug!(bits = payload_len, placed, "Payload placed");
        debug_assert_eq!(placed, payload_len, "Payload exceeds encoding region");

        self.fill_remainder(coords);
    }

    fn fill_remainder(&mut self, coords: impl Iterator<Item = (i16, i16)>) {
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
            }
        }
    }

    // Flips unblocked modules where the pattern holds, then writes the
    // matching format info
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_functions();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(c, r) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        let format_info = format_info(self.ecl, pattern);
        self.draw_format_info(format_info);
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use super::{Module, QR};
    use crate::common::bit_utils::BitStream;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{Color, EC_INFO};

    fn prepared() -> QR {
        let mut qr = QR::new();
        qr.draw_all_function_patterns();
        qr
    }

    #[test]
    fn test_payload_fills_region() {
        let mut qr = prepared();
        let mut payload = BitStream::new(EC_INFO.payload_bit_len());
        for i in 0..EC_INFO.payload_bit_len() {
            payload.push(i % 3 == 0);
        }
        qr.draw_encoding_region(payload);
        let data = qr.grid().iter().filter(|m| matches!(m, Module::Data(_))).count();
        assert_eq!(data, 359);
        // First bit lands on the bottom right corner, second left of it
        assert_eq!(qr.get(-1, -1), Module::Data(Color::Dark));
        assert_eq!(qr.get(-1, -2), Module::Data(Color::Light));
        // Format area keeps its reservation
        assert_eq!(qr.get(8, 0), Module::Format(Color::Light));
        assert_eq!(qr.get(17, 8), Module::Func(Color::Dark));
    }

    #[test]
    fn test_short_payload_stays_light() {
        let mut qr = prepared();
        let mut payload = BitStream::new(8);
        payload.push_bits(0xFFu8, 8);
        qr.draw_encoding_region(payload);
        let dark_data = qr.grid().iter().filter(|m| **m == Module::Data(Color::Dark)).count();
        assert_eq!(dark_data, 8);
        assert!(!qr.grid().contains(&Module::Empty));
    }

    #[test]
    fn test_apply_mask_only_flips_data() {
        let mut qr = prepared();
        qr.draw_encoding_region(BitStream::new(0));
        let before = qr.clone();
        qr.apply_mask(MaskPattern::new(1));
        assert_eq!(qr.mask(), Some(MaskPattern::new(1)));
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                match before.get(r, c) {
                    Module::Data(_) => {
                        assert_eq!(qr.get(r, c), Module::Data(Color::from(r & 1 == 0)))
                    }
                    Module::Func(_) => assert_eq!(qr.get(r, c), before.get(r, c)),
                    _ => (),
                }
            }
        }
        // Format info of M with pattern 1 is 0x5125, bit 0 is set
        assert_eq!(qr.get(0, 8), Module::Format(Color::Dark));
        assert_eq!(qr.get(8, -1), Module::Format(Color::Dark));
    }
}

// Global constants
//------------------------------------------------------------------------------

// Module count rounded up to whole bytes
const RAW_BIT_LEN: usize = (MAX_QR_SIZE + 7) & !7;
