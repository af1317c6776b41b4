//! Deterministic flux oracle.
//!
//! A single qubit prepared in |0⟩ is rotated by RZ(t·φ), then RX(t/2), then
//! mixed by a Hadamard; the flux is the Pauli-Z expectation. The state is two
//! complex amplitudes, so the whole circuit evaluates in closed form and is
//! owned by the caller rather than by a process-wide device.

use num_complex::Complex64;

use crate::constants::PHI;

/// Two-amplitude single-qubit state vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QubitState {
    amplitudes: [Complex64; 2],
}

impl QubitState {
    /// |0⟩
    pub fn ground() -> Self {
        Self {
            amplitudes: [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        }
    }

    pub fn amplitudes(&self) -> [Complex64; 2] {
        self.amplitudes
    }

    /// RZ(θ) = diag(e^{-iθ/2}, e^{iθ/2})
    pub fn rz(self, theta: f64) -> Self {
        let [a0, a1] = self.amplitudes;
        Self {
            amplitudes: [
                a0 * Complex64::from_polar(1.0, -theta / 2.0),
                a1 * Complex64::from_polar(1.0, theta / 2.0),
            ],
        }
    }

    /// RX(θ) = [[cos θ/2, -i sin θ/2], [-i sin θ/2, cos θ/2]]
    pub fn rx(self, theta: f64) -> Self {
        let [a0, a1] = self.amplitudes;
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new(0.0, -(theta / 2.0).sin());
        Self {
            amplitudes: [c * a0 + s * a1, s * a0 + c * a1],
        }
    }

    pub fn hadamard(self) -> Self {
        let [a0, a1] = self.amplitudes;
        let h = std::f64::consts::FRAC_1_SQRT_2;
        Self {
            amplitudes: [(a0 + a1) * h, (a0 - a1) * h],
        }
    }

    /// ⟨Z⟩ = |a0|² − |a1|², clamped against rounding to [-1, 1].
    pub fn expval_z(self) -> f64 {
        let [a0, a1] = self.amplitudes;
        (a0.norm_sqr() - a1.norm_sqr()).clamp(-1.0, 1.0)
    }
}

/// Time → flux oracle with its two rotation rates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluxOracle {
    phase_rate: f64,
    amplitude_rate: f64,
}

impl Default for FluxOracle {
    fn default() -> Self {
        Self::new(PHI, 0.5)
    }
}

impl FluxOracle {
    pub fn new(phase_rate: f64, amplitude_rate: f64) -> Self {
        Self {
            phase_rate,
            amplitude_rate,
        }
    }

    /// Flux at a single time value. Always in [-1, 1].
    pub fn flux(&self, t: f64) -> f64 {
        QubitState::ground()
            .rz(t * self.phase_rate)
            .rx(t * self.amplitude_rate)
            .hadamard()
            .expval_z()
    }

    /// Flux for a whole time vector. Each value depends only on its own `t`.
    pub fn evaluate(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.flux(t)).collect()
    }
}
