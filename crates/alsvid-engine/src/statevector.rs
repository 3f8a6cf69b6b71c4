//! Dense statevector backend.

use num_complex::Complex64;
use rand::Rng;
use rand::rngs::StdRng;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::state::{GateOp, QuantumState, StateBackend};

/// A statevector representing a quantum register.
///
/// Holds 2^n complex amplitudes; practical up to ~25 qubits. Gates are
/// applied with bit-mask kernels, measurement collapses and renormalizes in
/// place.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Probability of reading 1 on the given qubit.
    pub fn probability_of_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    // =========================================================================
    // Single-qubit gate kernels
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes[i] *= phase_0;
            } else {
                self.amplitudes[i] *= phase_1;
            }
        }
    }

    fn apply_phased(&mut self, qubit: usize, theta: f64, phi: f64) {
        // R(θ, φ) = Rz(φ) · Rx(θ) · Rz(−φ)
        self.apply_rz(qubit, -phi);
        self.apply_rx(qubit, theta);
        self.apply_rz(qubit, phi);
    }

    // =========================================================================
    // Two-qubit gate kernels
    // =========================================================================

    fn apply_cnot(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..(1 << self.num_qubits) {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_rxx(&mut self, q1: usize, q2: usize, theta: f64) {
        // e^{-iθ/2·XX} mixes each basis state with both qubits flipped.
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        let both = mask1 | mask2;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..(1usize << self.num_qubits) {
            if i & mask1 == 0 {
                let j = i ^ both;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_rzz(&mut self, q1: usize, q2: usize, theta: f64) {
        // Diagonal: phase by ∓θ/2 for even/odd parity of the two bits.
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        let phase_even = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_odd = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1usize << self.num_qubits) {
            let parity = (i & mask1 != 0) ^ (i & mask2 != 0);
            self.amplitudes[i] *= if parity { phase_odd } else { phase_even };
        }
    }

    /// Collapse one qubit to a known outcome and renormalize.
    fn collapse(&mut self, qubit: usize, outcome: bool) {
        let mask = 1 << qubit;
        let mut kept_norm_sq = 0.0;
        for i in 0..(1 << self.num_qubits) {
            if ((i & mask) != 0) == outcome {
                kept_norm_sq += self.amplitudes[i].norm_sqr();
            } else {
                self.amplitudes[i] = Complex64::new(0.0, 0.0);
            }
        }
        let norm = kept_norm_sq.sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }
}

impl QuantumState for Statevector {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn apply_gate(&mut self, gate: &GateOp, qubits: &[usize]) {
        match *gate {
            GateOp::X => self.apply_x(qubits[0]),
            GateOp::Y => self.apply_y(qubits[0]),
            GateOp::Z => self.apply_z(qubits[0]),
            GateOp::H => self.apply_h(qubits[0]),
            GateOp::S => self.apply_phase(qubits[0], FRAC_PI_2),
            GateOp::Sdg => self.apply_phase(qubits[0], -FRAC_PI_2),
            GateOp::T => self.apply_phase(qubits[0], FRAC_PI_4),
            GateOp::Tdg => self.apply_phase(qubits[0], -FRAC_PI_4),
            GateOp::SqrtX => self.apply_rx(qubits[0], FRAC_PI_2),
            GateOp::Sx => {
                // S·X: X first, then S.
                self.apply_x(qubits[0]);
                self.apply_phase(qubits[0], FRAC_PI_2);
            }
            GateOp::Sy => {
                self.apply_y(qubits[0]);
                self.apply_phase(qubits[0], FRAC_PI_2);
            }
            GateOp::Rx(theta) => self.apply_rx(qubits[0], theta),
            GateOp::Ry(theta) => self.apply_ry(qubits[0], theta),
            GateOp::Rz(theta) => self.apply_rz(qubits[0], theta),
            GateOp::Phase(theta) => self.apply_phase(qubits[0], theta),
            GateOp::Phased { theta, phi } => self.apply_phased(qubits[0], theta, phi),
            GateOp::Rxx(theta) => self.apply_rxx(qubits[0], qubits[1], theta),
            GateOp::Rzz(theta) => self.apply_rzz(qubits[0], qubits[1], theta),
            GateOp::Cnot => self.apply_cnot(qubits[0], qubits[1]),
            GateOp::Swap => self.apply_swap(qubits[0], qubits[1]),
        }
    }

    fn measure(&mut self, qubit: usize, rng: &mut StdRng) -> bool {
        let prob_one = self.probability_of_one(qubit);
        let r: f64 = rng.r#gen();
        let outcome = r < prob_one;
        self.collapse(qubit, outcome);
        outcome
    }

    fn reset(&mut self, qubit: usize) {
        // Fold the |1⟩ branch onto |0⟩ and renormalize.
        let mask = 1 << qubit;
        let mut norm_sq = 0.0;
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                let j = i & !mask;
                let val = self.amplitudes[i];
                self.amplitudes[j] += val;
                self.amplitudes[i] = Complex64::new(0.0, 0.0);
            }
            norm_sq += self.amplitudes[i].norm_sqr();
        }
        let norm = norm_sq.sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }
}

impl StateBackend for Statevector {
    fn allocate(num_qubits: usize) -> Self {
        Self::new(num_qubits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(&GateOp::H, &[0]);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(&GateOp::H, &[0]);
        sv.apply_gate(&GateOp::Cnot, &[0, 1]);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_sqrt_x_squares_to_x() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(&GateOp::SqrtX, &[0]);
        sv.apply_gate(&GateOp::SqrtX, &[0]);

        // Up to global phase, the state is |1⟩.
        assert!(sv.amplitudes[0].norm() < 1e-10);
        assert!((sv.amplitudes[1].norm() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_phased_rotation_reduces_to_rx() {
        let mut a = Statevector::new(1);
        a.apply_gate(&GateOp::Phased { theta: 1.1, phi: 0.0 }, &[0]);
        let mut b = Statevector::new(1);
        b.apply_gate(&GateOp::Rx(1.1), &[0]);
        for (x, y) in a.amplitudes.iter().zip(&b.amplitudes) {
            assert!(approx_eq(*x, *y));
        }
    }

    #[test]
    fn test_rzz_is_diagonal_phase() {
        let mut sv = Statevector::new(2);
        // Even parity basis state |00⟩ picks up e^{-iθ/2}.
        sv.apply_gate(&GateOp::Rzz(PI), &[0, 1]);
        assert!(approx_eq(
            sv.amplitudes[0],
            Complex64::from_polar(1.0, -PI / 2.0)
        ));
    }

    #[test]
    fn test_rxx_on_zero_state() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(&GateOp::Rxx(PI), &[0, 1]);
        // e^{-i(π/2)XX}|00⟩ = -i|11⟩.
        assert!(sv.amplitudes[0].norm() < 1e-10);
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, -1.0)));
    }

    #[test]
    fn test_measure_deterministic_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sv = Statevector::new(1);
        sv.apply_gate(&GateOp::X, &[0]);

        for _ in 0..50 {
            assert!(sv.measure(0, &mut rng));
        }
    }

    #[test]
    fn test_measure_collapses() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sv = Statevector::new(1);
        sv.apply_gate(&GateOp::H, &[0]);

        let first = sv.measure(0, &mut rng);
        // After collapse the outcome is pinned.
        for _ in 0..20 {
            assert_eq!(sv.measure(0, &mut rng), first);
        }
    }

    #[test]
    fn test_reset_after_collapse() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sv = Statevector::new(1);
        sv.apply_gate(&GateOp::X, &[0]);
        assert!(sv.measure(0, &mut rng));

        sv.reset(0);
        assert!(sv.probability_of_one(0) < 1e-10);
    }
}
