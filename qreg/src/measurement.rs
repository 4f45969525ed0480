//! Sampling and collapse.
//!
//! Every routine here takes its random source as an argument, so a seeded
//! generator makes any sequence of measurements reproducible.

use crate::error::{QuantumError, Result};
use crate::index::{check_qubit, qubit_mask};
use crate::register::Register;
use num_complex::Complex;
use rand::Rng;

fn uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

impl Register {
    /// Samples qubit `bit` without disturbing the state.
    pub fn bmeasure_preserve<R: Rng + ?Sized>(&self, bit: usize, rng: &mut R) -> Result<u8> {
        let [p0, _] = self.bprob(bit)?;
        let outcome = if uniform(rng) < p0 { 0 } else { 1 };
        tracing::trace!(bit, outcome, "sampled qubit");
        Ok(outcome)
    }

    /// Measures qubit `bit` and collapses the register onto the outcome.
    pub fn bmeasure<R: Rng + ?Sized>(&mut self, bit: usize, rng: &mut R) -> Result<u8> {
        let outcome = self.bmeasure_preserve(bit, rng)?;
        self.bset(bit, outcome)?;
        Ok(outcome)
    }

    /// Projects qubit `bit` onto `value` and renormalizes.
    ///
    /// This is not a physical operation and exists for collapse and for
    /// tests. If `value` has probability zero the register is instead
    /// remapped so that the qubit reads `value` with total probability
    /// unchanged; a measured outcome never takes that path.
    pub fn bset(&mut self, bit: usize, value: u8) -> Result<()> {
        if value > 1 {
            return Err(QuantumError::InvalidBitValue(value));
        }
        check_qubit(self.width, bit)?;
        let mask = qubit_mask(self.width, bit);
        let wanted = if value == 1 { mask } else { 0 };
        let prob = self.bprob(bit)?[usize::from(value)];

        if prob > 0.0 {
            let scale = prob.sqrt().recip();
            for (label, amplitude) in self.amplitudes.iter_mut().enumerate() {
                if label & mask == wanted {
                    *amplitude *= scale;
                } else {
                    *amplitude = Complex::new(0.0, 0.0);
                }
            }
        } else {
            tracing::warn!(bit, value, "forcing a qubit onto a zero-probability value");
            for label in (0..self.amplitudes.len()).filter(|label| label & mask != wanted) {
                let target = label ^ mask;
                let moved = std::mem::replace(&mut self.amplitudes[label], Complex::new(0.0, 0.0));
                self.amplitudes[target] += moved;
            }
        }
        Ok(())
    }

    /// Samples a basis label of the whole register without disturbing the
    /// state.
    pub fn measure_preserve<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r = uniform(rng);
        let mut cumulative = 0.0;
        let mut last_possible = 0;
        for (label, amplitude) in self.amplitudes.iter().enumerate() {
            let prob = amplitude.norm_sqr();
            if prob > 0.0 {
                last_possible = label;
            }
            cumulative += prob;
            if r < cumulative {
                tracing::trace!(label, "sampled register");
                return label;
            }
        }
        // Rounding left the cumulative sum just below r.
        last_possible
    }

    /// Measures the whole register and collapses it onto the sampled basis
    /// state. The surviving amplitude keeps its phase, which matters when the
    /// register is part of a larger system.
    pub fn measure<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let label = self.measure_preserve(rng);
        let amplitude = self.amplitudes[label];
        let norm = amplitude.norm();
        let kept = if norm > 0.0 {
            amplitude / norm
        } else {
            Complex::new(1.0, 0.0)
        };
        self.amplitudes.fill(Complex::new(0.0, 0.0));
        self.amplitudes[label] = kept;
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    const EPS: f64 = 1e-9;

    fn approx_eq(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a - b).norm() < EPS
    }

    #[test]
    fn test_bset_on_collapsed_bit() {
        let mut register = Register::new(1, &[0]).unwrap();
        register.bset(0, 1).unwrap();
        assert_eq!(register.amplitudes()[0], Complex::new(0.0, 0.0));
        assert_eq!(register.amplitudes()[1], Complex::new(1.0, 0.0));
    }

    #[test]
    fn test_bset_keeps_relative_phase() {
        let mut register = Register::from_amplitudes(vec![
            Complex::new(FRAC_1_SQRT_2, 0.0),
            Complex::new(-FRAC_1_SQRT_2, 0.0),
            Complex::new(0.0, 0.0),
            Complex::new(0.0, 0.0),
        ])
        .unwrap();
        register.bset(1, 1).unwrap();
        assert!(approx_eq(register.amplitudes()[0], Complex::new(0.0, 0.0)));
        assert!(approx_eq(register.amplitudes()[1], Complex::new(-1.0, 0.0)));
    }

    #[test]
    fn test_bset_renormalizes_entangled_state() {
        // (|00> + |01> + |10> + i|11>) / 2, fix qubit 0 to 1.
        let mut register = Register::from_amplitudes(vec![
            Complex::new(0.5, 0.0),
            Complex::new(0.5, 0.0),
            Complex::new(0.5, 0.0),
            Complex::new(0.0, 0.5),
        ])
        .unwrap();
        register.bset(0, 1).unwrap();
        assert!(approx_eq(register.amplitudes()[0b10], Complex::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(register.amplitudes()[0b11], Complex::new(0.0, FRAC_1_SQRT_2)));
        assert!((register.total_probability() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_bset_rejects_bad_input() {
        let mut register = Register::new(2, &[]).unwrap();
        assert_eq!(register.bset(0, 2).unwrap_err(), QuantumError::InvalidBitValue(2));
        assert!(register.bset(2, 0).is_err());
        assert_eq!(register, Register::new(2, &[]).unwrap());
    }

    #[test]
    fn test_bset_zero_probability_remaps() {
        // |01>: qubit 0 is certainly 0. Forcing it to 1 moves the amplitude
        // to |11>.
        let mut register = Register::new(2, &[0b01]).unwrap();
        register.bset(0, 1).unwrap();
        assert!(approx_eq(register.amplitudes()[0b11], Complex::new(1.0, 0.0)));
        assert!(approx_eq(register.amplitudes()[0b01], Complex::new(0.0, 0.0)));
        assert!((register.total_probability() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_basis_state_measures_deterministically() {
        let width = 4;
        let mut rng = StdRng::seed_from_u64(7);
        for label in 0..1usize << width {
            for bit in 0..width {
                let mut register = Register::new(width, &[label]).unwrap();
                let expected = ((label >> (width - 1 - bit)) & 1) as u8;
                assert_eq!(register.bmeasure(bit, &mut rng).unwrap(), expected);
                assert!((register.state_prob(label).unwrap() - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_bmeasure_collapses() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mut register = Register::ket_plus();
            let first = register.bmeasure(0, &mut rng).unwrap();
            for _ in 0..5 {
                assert_eq!(register.bmeasure(0, &mut rng).unwrap(), first);
            }
            assert!((register.state_prob(usize::from(first)).unwrap() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_preserving_measurements_do_not_mutate() {
        let register = Register::ket_minus_i();
        let before = register.clone();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            register.bmeasure_preserve(0, &mut rng).unwrap();
            register.measure_preserve(&mut rng);
        }
        assert_eq!(register, before);
    }

    #[test]
    fn test_sampling_plus_state_is_balanced() {
        let register = Register::ket_plus();
        let mut rng = StdRng::seed_from_u64(42);
        let shots = 4000;
        let ones: usize = (0..shots).map(|_| register.measure_preserve(&mut rng)).sum();
        let p1 = ones as f64 / shots as f64;
        assert!((p1 - 0.5).abs() < 0.05, "p(1) ~ 0.5, got {}", p1);
    }

    #[test]
    fn test_measure_preserves_phase() {
        let mut register = Register::from_amplitudes(vec![
            Complex::new(0.0, 0.0),
            Complex::new(0.0, 0.6),
            Complex::new(0.0, 0.0),
            Complex::new(-0.8, 0.0),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let label = register.measure(&mut rng);
        let expected = match label {
            0b01 => Complex::new(0.0, 1.0),
            0b11 => Complex::new(-1.0, 0.0),
            other => panic!("impossible outcome {other}"),
        };
        assert!(approx_eq(register.amplitudes()[label], expected));
        assert!((register.total_probability() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_draw_past_rounded_total_picks_last_possible_label() {
        // Total probability 1 - 1e-11, and a draw of 1 - 2^-52 lands beyond it.
        let amplitudes = vec![
            Complex::new(0.0, 0.0),
            Complex::new(0.5f64.sqrt(), 0.0),
            Complex::new(0.0, (0.5f64 - 1e-11).sqrt()),
            Complex::new(0.0, 0.0),
        ];
        let mut register = Register::from_amplitudes(amplitudes).unwrap();
        assert!(register.total_probability() < 1.0);

        let mut rng = StepRng::new(u64::MAX, 0);
        assert_eq!(register.measure_preserve(&mut rng), 0b10);

        let label = register.measure(&mut rng);
        assert_eq!(label, 0b10);
        assert!(approx_eq(register.amplitudes()[label], Complex::new(0.0, 1.0)));
        assert!((register.amplitudes()[label].norm() - 1.0).abs() < EPS);
        assert!((register.total_probability() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_measure_never_returns_impossible_label() {
        let register = Register::new(3, &[0b010]).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            assert_eq!(register.measure_preserve(&mut rng), 0b010);
        }
    }
}
