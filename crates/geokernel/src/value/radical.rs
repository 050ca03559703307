//! Radical normal form `q0 + Σ qi·sqrt(mi)`.
//!
//! Invariants:
//! - `mi` are positive integers, none a perfect square, and no product
//!   `mi·mj` (i≠j) is a perfect square. Square roots of such integers are
//!   linearly independent over Q, so the form is zero iff every coefficient is.
//! - Terms with a zero coefficient are dropped; terms are sorted by radicand.

use num::{BigInt, BigRational, One, Signed, Zero};

use crate::oracle::{Expr, Form, Oracle};
use crate::value::ExactValue;

/// Trial-division bound for square-factor extraction.
const SMALL_FACTOR_LIMIT: u32 = 1000;

#[derive(Clone, Debug)]
pub(crate) struct Term {
    pub coeff: BigRational,
    pub radicand: BigInt,
    pub leaf: Oracle,
}

#[derive(Clone, Debug)]
pub(crate) struct RadicalSum {
    pub rational: BigRational,
    pub terms: Vec<Term>,
}

/// `Some(r)` with `r² = n` if `n` is a perfect square.
pub(crate) fn exact_sqrt(n: &BigInt) -> Option<BigInt> {
    if n.is_negative() {
        return None;
    }
    let r = n.sqrt();
    (&r * &r == *n).then_some(r)
}

/// Split `n > 0` as `root² · rest`, pulling out small square factors and a
/// perfect-square remainder. `rest == 1` iff `n` is a perfect square.
pub(crate) fn split_square(n: &BigInt) -> (BigInt, BigInt) {
    let mut rest = n.clone();
    let mut root = BigInt::one();
    let mut p = 2u32;
    while p <= SMALL_FACTOR_LIMIT {
        let p2 = BigInt::from(p * p);
        if p2 > rest {
            break;
        }
        while (&rest % &p2).is_zero() {
            rest /= &p2;
            root *= p;
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if let Some(r) = exact_sqrt(&rest) {
        root *= r;
        rest = BigInt::one();
    }
    (root, rest)
}

impl RadicalSum {
    pub fn rational(q: BigRational) -> Self {
        Self {
            rational: q,
            terms: Vec::new(),
        }
    }

    pub fn term(coeff: BigRational, radicand: BigInt, leaf: Oracle) -> Self {
        let mut out = Self::rational(BigRational::zero());
        out.push_term(Term {
            coeff,
            radicand,
            leaf,
        });
        out
    }

    fn push_term(&mut self, t: Term) {
        if t.coeff.is_zero() {
            return;
        }
        let mut hit = None;
        for (i, existing) in self.terms.iter().enumerate() {
            if existing.radicand == t.radicand {
                hit = Some((i, t.coeff.clone()));
                break;
            }
            // sqrt(m) = g/k · sqrt(k) when m·k = g²
            if let Some(g) = exact_sqrt(&(&existing.radicand * &t.radicand)) {
                hit = Some((i, &t.coeff * BigRational::new(g, existing.radicand.clone())));
                break;
            }
        }
        match hit {
            Some((i, delta)) => {
                self.terms[i].coeff += delta;
                if self.terms[i].coeff.is_zero() {
                    self.terms.remove(i);
                }
            }
            None => {
                let at = self.terms.partition_point(|x| x.radicand < t.radicand);
                self.terms.insert(at, t);
            }
        }
    }

    fn leaf_for(&self, m: &BigInt) -> Option<Oracle> {
        self.terms
            .iter()
            .find(|t| &t.radicand == m)
            .map(|t| t.leaf.clone())
    }

    pub fn add(&self, other: &RadicalSum) -> RadicalSum {
        let mut out = self.clone();
        out.rational += &other.rational;
        for t in &other.terms {
            out.push_term(t.clone());
        }
        out
    }

    pub fn neg(&self) -> RadicalSum {
        self.scale(&-BigRational::one())
    }

    pub fn scale(&self, q: &BigRational) -> RadicalSum {
        let mut out = RadicalSum::rational(&self.rational * q);
        for t in &self.terms {
            out.push_term(Term {
                coeff: &t.coeff * q,
                ..t.clone()
            });
        }
        out
    }

    pub fn mul(&self, other: &RadicalSum) -> RadicalSum {
        let mut out = other.scale(&self.rational);
        for t in &self.terms {
            out.push_term(Term {
                coeff: &t.coeff * &other.rational,
                ..t.clone()
            });
        }
        for s in &self.terms {
            for t in &other.terms {
                let coeff = &s.coeff * &t.coeff;
                if s.radicand == t.radicand {
                    out.rational += coeff * BigRational::from_integer(s.radicand.clone());
                    continue;
                }
                let (root, m) = split_square(&(&s.radicand * &t.radicand));
                let coeff = coeff * BigRational::from_integer(root);
                if m.is_one() {
                    out.rational += coeff;
                    continue;
                }
                let leaf = out
                    .leaf_for(&m)
                    .or_else(|| self.leaf_for(&m))
                    .or_else(|| other.leaf_for(&m))
                    .unwrap_or_else(|| Oracle::sqrt_leaf(m.clone()));
                out.push_term(Term {
                    coeff,
                    radicand: m,
                    leaf,
                });
            }
        }
        out
    }

    /// Multiplicative inverse for rationals and for `u + v·sqrt(m)`; `None` otherwise.
    pub fn inverse(&self) -> Option<RadicalSum> {
        match self.terms.as_slice() {
            [] => (!self.rational.is_zero())
                .then(|| RadicalSum::rational(self.rational.recip())),
            [t] => {
                // (u + v√m)⁻¹ = (u − v√m) / (u² − v²m); the norm is non-zero since √m ∉ Q.
                let u = &self.rational;
                let v = &t.coeff;
                let norm = u * u - v * v * BigRational::from_integer(t.radicand.clone());
                let conj = RadicalSum {
                    rational: u.clone(),
                    terms: vec![Term {
                        coeff: -v,
                        ..t.clone()
                    }],
                };
                Some(conj.scale(&norm.recip()))
            }
            _ => None,
        }
    }

    /// Rebuild an exact value: rational if no radical survives, otherwise an
    /// oracle tree over the shared `sqrt` leaves.
    pub fn into_value(self) -> ExactValue {
        if self.terms.is_empty() {
            return ExactValue::Rational(self.rational);
        }
        if self.rational.is_zero() && self.terms.len() == 1 && self.terms[0].coeff.is_one() {
            return ExactValue::Oracle(self.terms[0].leaf.clone());
        }
        let mut acc: Option<(ExactValue, RadicalSum)> = (!self.rational.is_zero()).then(|| {
            (
                ExactValue::Rational(self.rational.clone()),
                RadicalSum::rational(self.rational.clone()),
            )
        });
        for t in self.terms {
            let leaf = ExactValue::Oracle(t.leaf.clone());
            let part_form = RadicalSum::term(t.coeff.clone(), t.radicand.clone(), t.leaf);
            let part = if t.coeff.is_one() {
                leaf
            } else if (-&t.coeff).is_one() {
                ExactValue::Oracle(Oracle::with_form(
                    Expr::Neg(leaf),
                    Form::Sum(part_form.clone()),
                ))
            } else {
                ExactValue::Oracle(Oracle::with_form(
                    Expr::Mul(ExactValue::Rational(t.coeff), leaf),
                    Form::Sum(part_form.clone()),
                ))
            };
            acc = Some(match acc {
                None => (part, part_form),
                Some((value, form)) => {
                    let form = form.add(&part_form);
                    let node = Oracle::with_form(Expr::Add(value, part), Form::Sum(form.clone()));
                    (ExactValue::Oracle(node), form)
                }
            });
        }
        match acc {
            Some((value, _)) => value,
            None => ExactValue::Rational(self.rational),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn split_square_extracts_factors() {
        assert_eq!(split_square(&big(8)), (big(2), big(2)));
        assert_eq!(split_square(&big(72)), (big(6), big(2)));
        assert_eq!(split_square(&big(49)), (big(7), big(1)));
        assert_eq!(split_square(&big(15)), (big(1), big(15)));
        // remainder is a large perfect square
        let p = big(1_000_003);
        assert_eq!(split_square(&(&p * &p)), (p, big(1)));
    }

    #[test]
    fn exact_sqrt_detects_squares() {
        assert_eq!(exact_sqrt(&big(144)), Some(big(12)));
        assert_eq!(exact_sqrt(&big(2)), None);
        assert_eq!(exact_sqrt(&big(-4)), None);
    }

    #[test]
    fn square_related_radicands_merge() {
        // large factors escape trial division; merging falls back to the product test
        let a = RadicalSum::term(BigRational::one(), big(2), Oracle::sqrt_leaf(big(2)));
        let b = RadicalSum::term(
            BigRational::one(),
            big(2_000_006),
            Oracle::sqrt_leaf(big(2_000_006)),
        );
        // product 2·2_000_006 = 4·1_000_003 is not a square, so the terms stay apart
        assert_eq!(a.add(&b).terms.len(), 2);
        let c = RadicalSum::term(
            BigRational::one(),
            big(2) * big(1_000_003) * big(1_000_003),
            Oracle::sqrt_leaf(big(2)),
        );
        let merged = a.add(&c);
        assert_eq!(merged.terms.len(), 1);
        assert_eq!(merged.terms[0].radicand, big(2));
        assert_eq!(
            merged.terms[0].coeff,
            BigRational::from_integer(big(1_000_004))
        );
    }

    #[test]
    fn inverse_of_quadratic_surd() {
        // (1 + sqrt(2))⁻¹ = -1 + sqrt(2)
        let leaf = Oracle::sqrt_leaf(big(2));
        let x = RadicalSum::rational(BigRational::one())
            .add(&RadicalSum::term(BigRational::one(), big(2), leaf));
        let inv = x.inverse().expect("invertible");
        assert_eq!(inv.rational, -BigRational::one());
        assert_eq!(inv.terms.len(), 1);
        assert!(inv.terms[0].coeff.is_one());
        let prod = x.mul(&inv);
        assert!(prod.terms.is_empty());
        assert!(prod.rational.is_one());
    }
}
