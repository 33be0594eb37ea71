use std::ops::Deref;

use tracing::{debug, trace};

use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    // Only the low 3 bits select a pattern
    pub fn new(pattern: u8) -> Self {
        Self(pattern & 0b111)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// x is the column, y the row. A module is flipped where the function holds.
mod mask_functions {
    pub fn checkerboard(x: i16, y: i16) -> bool {
        (x + y) & 1 == 0
    }

    pub fn horizontal_lines(_: i16, y: i16) -> bool {
        y & 1 == 0
    }

    pub fn vertical_lines(x: i16, _: i16) -> bool {
        x % 3 == 0
    }

    pub fn diagonal_lines(x: i16, y: i16) -> bool {
        (x + y) % 3 == 0
    }

    pub fn large_checkerboard(x: i16, y: i16) -> bool {
        ((y >> 1) + (x / 3)) & 1 == 0
    }

    pub fn fields(x: i16, y: i16) -> bool {
        ((x * y) & 1) + ((x * y) % 3) == 0
    }

    pub fn diamonds(x: i16, y: i16) -> bool {
        (((x * y) & 1) + ((x * y) % 3)) & 1 == 0
    }

    pub fn meadow(x: i16, y: i16) -> bool {
        (((x + y) & 1) + ((x * y) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!(),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

// Scores every pattern on a scratch copy and applies the lowest scoring one.
// Ties keep the lower pattern.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let mut best = (MaskPattern::new(0), u32::MAX);
    for m in 0..8 {
        let mask = MaskPattern::new(m);
        let mut scratch = qr.clone();
        scratch.apply_mask(mask);
        let pen = compute_penalty(&scratch);
        trace!(
            mask = m,
            adjacent = pen.adjacent,
            block = pen.block,
            finder = pen.finder,
            balance = pen.balance,
            score = pen.total(),
            "Mask candidate scored"
        );
        if pen.total() < best.1 {
            best = (mask, pen.total());
        }
    }

    let (mask, score) = best;
    debug!(mask = *mask, score, "Mask selected");
    qr.apply_mask(mask);
    mask
}

// Penalty
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct Penalty {
    // N1: runs of 5 or more same colored modules
    pub adjacent: u32,
    // N2: 2x2 blocks of one color
    pub block: u32,
    // N3: finder like patterns
    pub finder: u32,
    // N4: dark & light imbalance
    pub balance: u32,
}

impl Penalty {
    pub fn total(&self) -> u32 {
        self.adjacent + self.block + self.finder + self.balance
    }
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    compute_penalty(qr).total()
}

pub fn compute_penalty(qr: &QR) -> Penalty {
    Penalty {
        adjacent: compute_adjacent_penalty(qr, true) + compute_adjacent_penalty(qr, false),
        block: compute_block_penalty(qr),
        finder: compute_finder_pattern_penalty(qr, true) + compute_finder_pattern_penalty(qr, false),
        balance: compute_balance_penalty(qr),
    }
}

fn compute_adjacent_penalty(qr: &QR, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        let get = |j: i16| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
        let mut last = get(0);
        let mut run = 0;
        for j in 0..w {
            let clr = get(j);
            if clr == last {
                run += 1;
            } else {
                last = clr;
                run = 1;
            }
            match run {
                5 => pen += 3,
                6.. => pen += 1,
                _ => (),
            }
        }
    }
    pen
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        let get = |j: i16| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
        for j in 0..w - 10 {
            let window = (j..j + 11).map(get);
            if window.clone().eq(FINDER_PATTERN_LEAD.iter().copied())
                || window.eq(FINDER_PATTERN_TRAIL.iter().copied())
            {
                pen += 40;
            }
        }
    }
    pen
}

// Dark share in 5% steps, scored by the distance of the step to 50%
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let w = qr.width();
    let step = (dark_cnt * 20 / (w * w)) as i32;
    let dev = (step - 10).abs().min((step - 9).abs());
    dev as u32 * 10
}

static FINDER_PATTERN_LEAD: [Color; 11] = [
    Color::Dark,
    Color::Light,
    Color::Dark,
    Color::Dark,
    Color::Dark,
    Color::Light,
    Color::Dark,
    Color::Light,
    Color::Light,
    Color::Light,
    Color::Light,
];

static FINDER_PATTERN_TRAIL: [Color; 11] = [
    Color::Light,
    Color::Light,
    Color::Light,
    Color::Light,
    Color::Dark,
    Color::Light,
    Color::Dark,
    Color::Dark,
    Color::Dark,
    Color::Light,
    Color::Dark,
];

#[cfg(test)]
mod penalty_tests {
    use test_case::test_case;

    use super::{compute_penalty, compute_total_penalty, MaskPattern, Penalty};
    use crate::builder::{Module, QRBuilder, QR};
    use crate::common::metadata::{Color, QR_WIDTH};

    const FIXTURE: &[u8] = b"HTTPS://TRKID.COM/Z/PPPPSSSSSSSSNNNNXX";

    #[test]
    fn test_blank_symbol() {
        let qr = QR::new();
        let pen = compute_penalty(&qr);
        // Each line: 3 for the 5th module, then 1 for each of the 20 after
        assert_eq!(pen.adjacent, 50 * 23);
        assert_eq!(pen.block, 24 * 24 * 3);
        assert_eq!(pen.finder, 0);
        assert_eq!(pen.balance, 90);
    }

    #[test]
    fn test_finder_like_row() {
        let mut qr = QR::new();
        let w = QR_WIDTH as i16;
        // Checkerboard everywhere except row 0 carries 1011101 then light
        for r in 0..w {
            for c in 0..w {
                qr.set(r, c, Module::Data(Color::from((r + c) & 1 == 0)));
            }
        }
        let row = [1, 0, 1, 1, 1, 0, 1, 0, 0, 0, 0];
        for (c, &b) in row.iter().enumerate() {
            qr.set(0, c as i16 + 3, Module::Data(Color::from(b == 1)));
        }
        let pen = compute_penalty(&qr);
        assert_eq!(pen.finder, 40);
    }

    #[test]
    fn test_balance() {
        let mut qr = QR::new();
        let w = QR_WIDTH as i16;
        // 313 dark of 625 is step 10
        for i in 0..313 {
            qr.set(i / w, i % w, Module::Func(Color::Dark));
        }
        assert_eq!(compute_penalty(&qr).balance, 0);
    }

    #[test_case(0, Penalty { adjacent: 232, block: 162, finder: 40, balance: 0 })]
    #[test_case(1, Penalty { adjacent: 240, block: 174, finder: 120, balance: 0 })]
    #[test_case(2, Penalty { adjacent: 238, block: 207, finder: 160, balance: 0 })]
    #[test_case(3, Penalty { adjacent: 203, block: 159, finder: 120, balance: 0 })]
    #[test_case(4, Penalty { adjacent: 207, block: 195, finder: 160, balance: 0 })]
    #[test_case(5, Penalty { adjacent: 248, block: 198, finder: 160, balance: 0 })]
    #[test_case(6, Penalty { adjacent: 234, block: 219, finder: 40, balance: 0 })]
    #[test_case(7, Penalty { adjacent: 240, block: 216, finder: 160, balance: 0 })]
    fn test_fixture_penalties(mask: u8, exp: Penalty) {
        let qr = QRBuilder::new(FIXTURE).mask(MaskPattern::new(mask)).build().unwrap();
        assert_eq!(compute_penalty(&qr), exp);
    }

    #[test]
    fn test_best_mask_is_lowest() {
        let qr = QRBuilder::new(FIXTURE).build().unwrap();
        assert_eq!(qr.mask(), Some(MaskPattern::new(0)));
        assert_eq!(compute_total_penalty(&qr), 434);
    }
}
