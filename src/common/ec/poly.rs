use std::marker::PhantomData;

use super::galois::{exp, log, shrink_exp};

// Coefficient notation
//------------------------------------------------------------------------------

// Coefficients are plain field elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int;

// Coefficients are exponents of alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alpha;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub coef: u8,
    pub exp: usize,
}

impl Term {
    pub const fn new(coef: u8, exp: usize) -> Self {
        Self { coef, exp }
    }
}

// Polynomial
//------------------------------------------------------------------------------

// Terms are kept in descending exponent order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly<N> {
    terms: Vec<Term>,
    _notation: PhantomData<N>,
}

impl<N> Poly<N> {
    pub fn from_terms(mut terms: Vec<Term>) -> Self {
        terms.sort_by(|a, b| b.exp.cmp(&a.exp));
        Self { terms, _notation: PhantomData }
    }

    #[cfg(test)]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn lead(&self) -> Option<Term> {
        self.terms.first().copied()
    }

    pub fn degree(&self) -> usize {
        self.lead().map_or(0, |t| t.exp)
    }

    pub fn coefs(&self) -> impl Iterator<Item = u8> + '_ {
        self.terms.iter().map(|t| t.coef)
    }

    pub fn drop_lead(&mut self) {
        if !self.terms.is_empty() {
            self.terms.remove(0);
        }
    }
}

// Integer notation
//------------------------------------------------------------------------------

impl Poly<Int> {
    // Codewords as coefficients of x^(n-1) down to x^0
    pub fn from_codewords(codewords: &[u8]) -> Self {
        let n = codewords.len();
        let terms = codewords.iter().enumerate().map(|(i, &c)| Term::new(c, n - 1 - i)).collect();
        Self { terms, _notation: PhantomData }
    }

    // Multiplies by x^n, keeping zero terms down to x^0
    pub fn shift(self, n: usize) -> Self {
        let mut terms: Vec<Term> =
            self.terms.into_iter().map(|t| Term::new(t.coef, t.exp + n)).collect();
        terms.extend((0..n).rev().map(|e| Term::new(0, e)));
        Self { terms, _notation: PhantomData }
    }

    #[cfg(test)]
    pub fn to_alpha(&self) -> Poly<Alpha> {
        let terms = self.terms.iter().map(|t| Term::new(log(t.coef) as u8, t.exp)).collect();
        Poly { terms, _notation: PhantomData }
    }

    // One long division step. Terms are aligned from the front and the
    // leading term, which both operands share, is dropped.
    pub fn xor(&self, other: &Self) -> Self {
        let (long, short) =
            if self.len() >= other.len() { (self, other) } else { (other, self) };
        let lead_exp = long.degree();
        let terms = (1..long.len())
            .map(|k| {
                let a = long.terms[k].coef;
                let b = short.terms.get(k).map_or(0, |t| t.coef);
                Term::new(a ^ b, lead_exp - k)
            })
            .collect();
        Self { terms, _notation: PhantomData }
    }
}

// Alpha notation
//------------------------------------------------------------------------------

impl Poly<Alpha> {
    pub fn to_int(&self) -> Poly<Int> {
        let terms = self.terms.iter().map(|t| Term::new(exp(t.coef as usize), t.exp)).collect();
        Poly { terms, _notation: PhantomData }
    }

    pub fn multiply(&self, other: &Self) -> Self {
        let mut products = Vec::with_capacity(self.len() * other.len());
        for a in other.terms.iter() {
            for b in self.terms.iter() {
                let coef = shrink_exp(a.coef as usize + b.coef as usize) as u8;
                products.push(Term::new(coef, a.exp + b.exp));
            }
        }

        // Merge like terms in integer notation
        let degree = products.iter().map(|t| t.exp).max().unwrap_or(0);
        let mut merged = vec![None::<u8>; degree + 1];
        for t in products {
            let v = exp(t.coef as usize);
            merged[t.exp] = Some(merged[t.exp].map_or(v, |m| m ^ v));
        }
        // Cancelled terms vanish, alpha notation has no zero
        let terms = merged
            .into_iter()
            .enumerate()
            .rev()
            .filter_map(|(e, v)| v.filter(|&v| v != 0).map(|v| Term::new(log(v) as u8, e)))
            .collect();
        Self { terms, _notation: PhantomData }
    }

    // Multiplies by lead * x^(lead.exp - degree), lining the leading term up
    // with lead
    pub fn scale(&self, lead: Term) -> Self {
        let degree = self.degree();
        debug_assert!(
            lead.exp >= degree,
            "Cannot scale below degree: Lead {}, Degree {degree}",
            lead.exp
        );

        let terms = self
            .terms
            .iter()
            .map(|t| {
                let coef = shrink_exp(t.coef as usize + lead.coef as usize) as u8;
                Term::new(coef, t.exp + lead.exp - degree)
            })
            .collect();
        Self { terms, _notation: PhantomData }
    }
}
