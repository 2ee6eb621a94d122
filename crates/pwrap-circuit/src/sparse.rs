//! # Sparse Constraint Systems
//!
//! The PLONK backend consumes one gate per row:
//!
//! ```text
//! qL·w[l] + qR·w[r] + qO·w[o] + qM·w[l]·w[r] + qC = 0
//! ```
//!
//! over a wire vector `w = [public..., private...]`. A gate position that
//! does not reference a wire holds [`NO_WIRE`] and its selector is zero.
//!
//! Variables are kept in affine form `c·w + k` so scaling and adding a
//! constant never cost a gate.

use ark_ff::{One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::CircuitError;
use crate::frontend::{Api, Fr};
use crate::witness::{Builder, ConstraintSystem, Witness};

/// Marker for an unused gate position.
pub const NO_WIRE: u32 = u32::MAX;

/// One PLONK gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct SparseGate {
    /// Left wire.
    pub l: u32,
    /// Right wire.
    pub r: u32,
    /// Output wire.
    pub o: u32,
    /// Left selector.
    pub ql: Fr,
    /// Right selector.
    pub qr: Fr,
    /// Output selector.
    pub qo: Fr,
    /// Multiplication selector.
    pub qm: Fr,
    /// Constant selector.
    pub qc: Fr,
}

impl SparseGate {
    /// Wire indices referenced by `l`, `r`, `o`, or `None` for unused slots.
    pub fn wires(&self) -> [Option<usize>; 3] {
        [self.l, self.r, self.o].map(|w| (w != NO_WIRE).then_some(w as usize))
    }

    /// Left-hand side of the gate equation for the wire vector `w`.
    pub fn eval(&self, w: &[Fr]) -> Result<Fr, CircuitError> {
        let value = |slot: Option<usize>| match slot {
            None => Ok(Fr::zero()),
            Some(index) => w.get(index).copied().ok_or(CircuitError::WireOutOfRange {
                index,
                wires: w.len(),
            }),
        };
        let [l, r, o] = self.wires();
        let (l, r, o) = (value(l)?, value(r)?, value(o)?);
        Ok(self.ql * l + self.qr * r + self.qo * o + self.qm * l * r + self.qc)
    }
}

/// A compiled sparse constraint system.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct SparseR1cs {
    /// Public wires, numbered first.
    pub num_public: u32,
    /// Private wires.
    pub num_private: u32,
    /// Gates in definition order.
    pub gates: Vec<SparseGate>,
}

impl SparseR1cs {
    /// Total wire count.
    pub fn num_wires(&self) -> usize {
        (self.num_public + self.num_private) as usize
    }

    /// `w = [public..., private...]`.
    pub fn assignment(witness: &Witness) -> Vec<Fr> {
        let mut w = Vec::with_capacity(witness.public.len() + witness.private.len());
        w.extend_from_slice(&witness.public);
        w.extend_from_slice(&witness.private);
        w
    }
}

impl ConstraintSystem for SparseR1cs {
    type Builder = SparseBuilder;

    fn num_public(&self) -> usize {
        self.num_public as usize
    }

    fn num_private(&self) -> usize {
        self.num_private as usize
    }

    fn num_constraints(&self) -> usize {
        self.gates.len()
    }

    fn check(&self, witness: &Witness) -> Result<(), CircuitError> {
        let w = Self::assignment(witness);
        let total = self.gates.len();
        for (index, gate) in self.gates.iter().enumerate() {
            if !gate.eval(&w)?.is_zero() {
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
    Public(u32),
    Private(u32),
}

/// Builder-side variable `coeff·wire + offset`. A constant has no wire and
/// a zero coefficient.
#[derive(Debug, Clone)]
pub struct Affine {
    coeff: Fr,
    wire: Option<Wire>,
    offset: Fr,
    value: Fr,
}

impl Affine {
    fn wire(wire: Wire, value: Fr) -> Self {
        Self {
            coeff: Fr::one(),
            wire: Some(wire),
            offset: Fr::zero(),
            value,
        }
    }

    fn constant(value: Fr) -> Self {
        Self {
            coeff: Fr::zero(),
            wire: None,
            offset: value,
            value,
        }
    }
}

#[derive(Debug)]
struct PendingGate {
    wires: [Option<Wire>; 3],
    ql: Fr,
    qr: Fr,
    qo: Fr,
    qm: Fr,
    qc: Fr,
}

impl PendingGate {
    fn linear(l: &Affine, r: &Affine, qc: Fr) -> Self {
        Self {
            wires: [l.wire, r.wire, None],
            ql: l.coeff,
            qr: r.coeff,
            qo: Fr::zero(),
            qm: Fr::zero(),
            qc,
        }
    }
}

/// [`Api`] implementation producing a [`SparseR1cs`].
#[derive(Debug, Default)]
pub struct SparseBuilder {
    public: Vec<Fr>,
    private: Vec<Fr>,
    gates: Vec<PendingGate>,
}

impl SparseBuilder {
    fn new_private(&mut self, value: Fr) -> Wire {
        self.private.push(value);
        Wire::Private(self.private.len() as u32 - 1)
    }

    fn index(&self, wire: Option<Wire>) -> u32 {
        match wire {
            None => NO_WIRE,
            Some(Wire::Public(i)) => i,
            Some(Wire::Private(i)) => self.public.len() as u32 + i,
        }
    }
}

impl Api for SparseBuilder {
    type Var = Affine;

    fn public_input(&mut self, value: Fr) -> Affine {
        self.public.push(value);
        Affine::wire(Wire::Public(self.public.len() as u32 - 1), value)
    }

    fn secret_input(&mut self, value: Fr) -> Affine {
        let wire = self.new_private(value);
        Affine::wire(wire, value)
    }

    fn constant(&mut self, value: Fr) -> Affine {
        Affine::constant(value)
    }

    fn add(&mut self, a: &Affine, b: &Affine) -> Affine {
        let value = a.value + b.value;
        match (a.wire, b.wire) {
            (None, _) => Affine {
                offset: a.offset + b.offset,
                value,
                ..b.clone()
            },
            (_, None) => Affine {
                offset: a.offset + b.offset,
                value,
                ..a.clone()
            },
            (Some(x), Some(y)) if x == y => Affine {
                coeff: a.coeff + b.coeff,
                wire: Some(x),
                offset: a.offset + b.offset,
                value,
            },
            (Some(_), Some(_)) => {
                let out = self.new_private(value);
                self.gates.push(PendingGate {
                    wires: [a.wire, b.wire, Some(out)],
                    qo: -Fr::one(),
                    ..PendingGate::linear(a, b, a.offset + b.offset)
                });
                Affine::wire(out, value)
            }
        }
    }

    fn mul_const(&mut self, a: &Affine, c: Fr) -> Affine {
        Affine {
            coeff: a.coeff * c,
            wire: a.wire,
            offset: a.offset * c,
            value: a.value * c,
        }
    }

    fn mul(&mut self, a: &Affine, b: &Affine) -> Affine {
        if a.wire.is_none() {
            return self.mul_const(b, a.offset);
        }
        if b.wire.is_none() {
            return self.mul_const(a, b.offset);
        }
        // (ca·x + ka)(cb·y + kb) = ca·cb·xy + ca·kb·x + cb·ka·y + ka·kb
        let value = a.value * b.value;
        let out = self.new_private(value);
        self.gates.push(PendingGate {
            wires: [a.wire, b.wire, Some(out)],
            ql: a.coeff * b.offset,
            qr: b.coeff * a.offset,
            qo: -Fr::one(),
            qm: a.coeff * b.coeff,
            qc: a.offset * b.offset,
        });
        Affine::wire(out, value)
    }

    fn assert_is_equal(&mut self, a: &Affine, b: &Affine) {
        let neg_b = self.mul_const(b, -Fr::one());
        self.gates
            .push(PendingGate::linear(a, &neg_b, a.offset - b.offset));
    }

    fn assert_is_boolean(&mut self, a: &Affine) {
        // (c·x + k)² - (c·x + k) = c²·x² + (2ck - c)·x + k² - k
        let (c, k) = (a.coeff, a.offset);
        let two = Fr::from(2u64);
        self.gates.push(PendingGate {
            wires: [a.wire, a.wire, None],
            ql: two * c * k - c,
            qr: Fr::zero(),
            qo: Fr::zero(),
            qm: c * c,
            qc: k * k - k,
        });
    }

    fn value(&self, a: &Affine) -> Fr {
        a.value
    }
}

impl Builder for SparseBuilder {
    type System = SparseR1cs;

    fn finish(self) -> (SparseR1cs, Witness) {
        let gates = self
            .gates
            .iter()
            .map(|g| {
                let [l, r, o] = g.wires.map(|w| self.index(w));
                SparseGate {
                    l,
                    r,
                    o,
                    ql: g.ql,
                    qr: g.qr,
                    qo: g.qo,
                    qm: g.qm,
                    qc: g.qc,
                }
            })
            .collect();
        let cs = SparseR1cs {
            num_public: self.public.len() as u32,
            num_private: self.private.len() as u32,
            gates,
        };
        let witness = Witness {
            public: self.public,
            private: self.private,
        };
        (cs, witness)
    }
}
