//! # Rank-1 Constraint Systems
//!
//! The Groth16 backend consumes constraints of the form
//! `⟨A,z⟩ · ⟨B,z⟩ = ⟨C,z⟩` over the assignment vector
//! `z = [1, public..., private...]`.
//!
//! Linear operations are free here: a [`LinearCombination`] accumulates
//! terms and only multiplications and assertions emit constraints.

use ark_ff::{One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::CircuitError;
use crate::frontend::{Api, Fr};
use crate::witness::{Builder, ConstraintSystem, Witness};

/// One entry `coeff · z[index]` of a persisted linear combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Term {
    /// Coefficient.
    pub coeff: Fr,
    /// Position in the assignment vector.
    pub index: u32,
}

/// A persisted rank-1 constraint.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct R1csConstraint {
    /// Left factor.
    pub a: Vec<Term>,
    /// Right factor.
    pub b: Vec<Term>,
    /// Product.
    pub c: Vec<Term>,
}

/// A compiled rank-1 constraint system.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct R1cs {
    /// Public inputs, excluding the constant one.
    pub num_public: u32,
    /// Private wires.
    pub num_private: u32,
    /// Constraints in definition order.
    pub constraints: Vec<R1csConstraint>,
}

impl R1cs {
    /// `z = [1, public..., private...]`.
    pub fn assignment(witness: &Witness) -> Vec<Fr> {
        let mut z = Vec::with_capacity(1 + witness.public.len() + witness.private.len());
        z.push(Fr::one());
        z.extend_from_slice(&witness.public);
        z.extend_from_slice(&witness.private);
        z
    }

    /// Evaluate a linear combination against `z`.
    pub fn eval(terms: &[Term], z: &[Fr]) -> Result<Fr, CircuitError> {
        terms.iter().try_fold(Fr::zero(), |acc, t| {
            let index = t.index as usize;
            let value = z.get(index).ok_or(CircuitError::WireOutOfRange {
                index,
                wires: z.len(),
            })?;
            Ok(acc + t.coeff * value)
        })
    }
}

impl ConstraintSystem for R1cs {
    type Builder = R1csBuilder;

    fn num_public(&self) -> usize {
        self.num_public as usize
    }

    fn num_private(&self) -> usize {
        self.num_private as usize
    }

    fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn check(&self, witness: &Witness) -> Result<(), CircuitError> {
        let z = Self::assignment(witness);
        let total = self.constraints.len();
        for (index, c) in self.constraints.iter().enumerate() {
            if Self::eval(&c.a, &z)? * Self::eval(&c.b, &z)? != Self::eval(&c.c, &z)? {
                return Err(CircuitError::Unsatisfied { index, total });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wire {
    One,
    Public(u32),
    Private(u32),
}

/// Builder-side linear combination with its current value.
#[derive(Debug, Clone)]
pub struct LinearCombination {
    terms: Vec<(Fr, Wire)>,
    value: Fr,
}

impl LinearCombination {
    fn wire(wire: Wire, value: Fr) -> Self {
        Self {
            terms: vec![(Fr::one(), wire)],
            value,
        }
    }

    fn zero() -> Self {
        Self {
            terms: Vec::new(),
            value: Fr::zero(),
        }
    }

    fn is_constant(&self) -> bool {
        self.terms.iter().all(|(_, w)| *w == Wire::One)
    }
}

/// [`Api`] implementation producing an [`R1cs`].
#[derive(Debug, Default)]
pub struct R1csBuilder {
    public: Vec<Fr>,
    private: Vec<Fr>,
    constraints: Vec<[LinearCombination; 3]>,
}

impl R1csBuilder {
    fn enforce(&mut self, a: LinearCombination, b: LinearCombination, c: LinearCombination) {
        self.constraints.push([a, b, c]);
    }

    fn index(&self, wire: Wire) -> u32 {
        match wire {
            Wire::One => 0,
            Wire::Public(i) => 1 + i,
            Wire::Private(i) => 1 + self.public.len() as u32 + i,
        }
    }

    fn persist(&self, lc: &LinearCombination) -> Vec<Term> {
        lc.terms
            .iter()
            .filter(|(coeff, _)| !coeff.is_zero())
            .map(|&(coeff, wire)| Term {
                coeff,
                index: self.index(wire),
            })
            .collect()
    }
}

impl Api for R1csBuilder {
    type Var = LinearCombination;

    fn public_input(&mut self, value: Fr) -> LinearCombination {
        self.public.push(value);
        LinearCombination::wire(Wire::Public(self.public.len() as u32 - 1), value)
    }

    fn secret_input(&mut self, value: Fr) -> LinearCombination {
        self.private.push(value);
        LinearCombination::wire(Wire::Private(self.private.len() as u32 - 1), value)
    }

    fn constant(&mut self, value: Fr) -> LinearCombination {
        LinearCombination {
            terms: vec![(value, Wire::One)],
            value,
        }
    }

    fn add(&mut self, a: &LinearCombination, b: &LinearCombination) -> LinearCombination {
        let mut terms = a.terms.clone();
        terms.extend_from_slice(&b.terms);
        LinearCombination {
            terms,
            value: a.value + b.value,
        }
    }

    fn mul_const(&mut self, a: &LinearCombination, c: Fr) -> LinearCombination {
        LinearCombination {
            terms: a.terms.iter().map(|&(coeff, w)| (coeff * c, w)).collect(),
            value: a.value * c,
        }
    }

    fn mul(&mut self, a: &LinearCombination, b: &LinearCombination) -> LinearCombination {
        if a.is_constant() {
            return self.mul_const(b, a.value);
        }
        if b.is_constant() {
            return self.mul_const(a, b.value);
        }
        let out = self.secret_input(a.value * b.value);
        self.enforce(a.clone(), b.clone(), out.clone());
        out
    }

    fn assert_is_equal(&mut self, a: &LinearCombination, b: &LinearCombination) {
        let diff = self.sub(a, b);
        let one = self.constant(Fr::one());
        self.enforce(diff, one, LinearCombination::zero());
    }

    fn assert_is_boolean(&mut self, a: &LinearCombination) {
        let one = self.constant(Fr::one());
        let a_minus_one = self.sub(a, &one);
        self.enforce(a.clone(), a_minus_one, LinearCombination::zero());
    }

    fn value(&self, a: &LinearCombination) -> Fr {
        a.value
    }
}

impl Builder for R1csBuilder {
    type System = R1cs;

    fn finish(self) -> (R1cs, Witness) {
        let constraints = self
            .constraints
            .iter()
            .map(|[a, b, c]| R1csConstraint {
                a: self.persist(a),
                b: self.persist(b),
                c: self.persist(c),
            })
            .collect();
        let r1cs = R1cs {
            num_public: self.public.len() as u32,
            num_private: self.private.len() as u32,
            constraints,
        };
        let witness = Witness {
            public: self.public,
            private: self.private,
        };
        (r1cs, witness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fr(v: u64) -> Fr {
        Fr::from(v)
    }

    #[test]
    fn linear_operations_are_free() {
        let mut b = R1csBuilder::default();
        let x = b.public_input(fr(3));
        let y = b.secret_input(fr(4));
        let s = b.add(&x, &y);
        let t = b.mul_const(&s, fr(5));
        assert_eq!(b.value(&t), fr(35));
        let (r1cs, _) = b.finish();
        assert!(r1cs.constraints.is_empty());
    }

    #[test]
    fn multiplication_allocates_and_constrains() {
        let mut b = R1csBuilder::default();
        let x = b.public_input(fr(6));
        let y = b.secret_input(fr(7));
        let p = b.mul(&x, &y);
        assert_eq!(b.value(&p), fr(42));
        let (r1cs, witness) = b.finish();
        assert_eq!(r1cs.num_public, 1);
        assert_eq!(r1cs.num_private, 2);
        assert_eq!(r1cs.constraints.len(), 1);
        assert_eq!(witness.private, vec![fr(7), fr(42)]);
        r1cs.check(&witness).unwrap();
    }

    #[test]
    fn constant_multiplication_is_free() {
        let mut b = R1csBuilder::default();
        let x = b.secret_input(fr(2));
        let c = b.constant(fr(9));
        let p = b.mul(&c, &x);
        assert_eq!(b.value(&p), fr(18));
        assert!(b.finish().0.constraints.is_empty());
    }

    #[test]
    fn public_wires_precede_private_in_assignment() {
        let mut b = R1csBuilder::default();
        let s = b.secret_input(fr(5));
        let p = b.public_input(fr(5));
        b.assert_is_equal(&s, &p);
        let (r1cs, witness) = b.finish();
        let c = &r1cs.constraints[0];
        let indices: Vec<u32> = c.a.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![2, 1]);
        assert_eq!(R1cs::assignment(&witness), vec![fr(1), fr(5), fr(5)]);
        r1cs.check(&witness).unwrap();
    }

    #[test]
    fn violated_equality_is_reported() {
        let mut b = R1csBuilder::default();
        let x = b.secret_input(fr(1));
        let y = b.secret_input(fr(2));
        b.assert_is_boolean(&x);
        b.assert_is_equal(&x, &y);
        let (r1cs, witness) = b.finish();
        let err = r1cs.check(&witness).unwrap_err();
        assert!(matches!(err, CircuitError::Unsatisfied { index: 1, total: 2 }));
    }

    #[test]
    fn corrupt_term_index_is_an_error() {
        let mut b = R1csBuilder::default();
        let x = b.secret_input(fr(1));
        b.assert_is_boolean(&x);
        let (mut r1cs, witness) = b.finish();
        r1cs.constraints[0].a[0].index = 9;
        let err = r1cs.check(&witness).unwrap_err();
        assert!(matches!(err, CircuitError::WireOutOfRange { index: 9, wires: 2 }));
    }

    #[test]
    fn non_boolean_is_reported() {
        let mut b = R1csBuilder::default();
        let x = b.secret_input(fr(2));
        b.assert_is_boolean(&x);
        let (r1cs, witness) = b.finish();
        assert!(r1cs.check(&witness).is_err());
    }

    #[test]
    fn serialization_preserves_system() {
        let mut b = R1csBuilder::default();
        let x = b.public_input(fr(3));
        let y = b.secret_input(fr(11));
        let p = b.mul(&x, &y);
        let q = b.constant(fr(33));
        b.assert_is_equal(&p, &q);
        let (r1cs, _) = b.finish();

        let mut bytes = Vec::new();
        r1cs.serialize_uncompressed(&mut bytes).unwrap();
        let back = R1cs::deserialize_uncompressed(bytes.as_slice()).unwrap();
        assert_eq!(back, r1cs);
        assert!(R1cs::deserialize_uncompressed(&bytes[..bytes.len() - 1]).is_err());
    }
}
