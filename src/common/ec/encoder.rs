use super::galois::log;
use super::poly::{Alpha, Int, Poly, Term};
use crate::common::bit_utils::BitStream;

// Reed-Solomon encoder
//------------------------------------------------------------------------------

// Product of (x - a^i) for i in 0..ecc_count, in alpha notation
pub fn generator_poly(ecc_count: usize) -> Poly<Alpha> {
    debug_assert!(ecc_count > 0, "Generator needs at least one ecc codeword");

    let mut gen = Poly::from_terms(vec![Term::new(0, 1), Term::new(0, 0)]);
    for i in 1..ecc_count {
        let factor = Poly::from_terms(vec![Term::new(0, 1), Term::new(i as u8, 0)]);
        gen = gen.multiply(&factor);
    }
    gen
}

#[cfg(test)]
pub fn ecc(data: &[u8], ecc_count: usize) -> Vec<u8> {
    let gen = generator_poly(ecc_count);
    remainder(Poly::from_codewords(data), &gen)
}

// Ecc of a span of the stream. A trailing partial codeword is padded with
// zero bits.
pub fn compute_ecc_codewords(
    stream: &BitStream,
    offset: usize,
    bit_len: usize,
    gen: &Poly<Alpha>,
) -> Vec<u8> {
    let codewords = (0..bit_len)
        .step_by(8)
        .map(|i| stream.byte_at(offset + i, (bit_len - i).min(8)))
        .collect::<Vec<_>>();
    remainder(Poly::from_codewords(&codewords), gen)
}

// Long division of msg * x^ecc_count by the generator. Every step cancels
// the leading term, so the remainder always ends with ecc_count terms.
fn remainder(msg: Poly<Int>, gen: &Poly<Alpha>) -> Vec<u8> {
    let ecc_count = gen.degree();
    let mut rem = msg.shift(ecc_count);
    while rem.len() > ecc_count {
        let Some(lead) = rem.lead() else { break };
        if lead.coef == 0 {
            rem.drop_lead();
            continue;
        }
        let factor = Term::new(log(lead.coef) as u8, lead.exp);
        rem = rem.xor(&gen.scale(factor).to_int());
    }

    debug_assert_eq!(rem.len(), ecc_count, "Remainder must hold exactly the ecc codewords");
    rem.coefs().collect()
}
