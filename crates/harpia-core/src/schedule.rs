//! Per-frame chaos escalation (with the phoenix clamp) and the mid-run
//! interference burst. Both are pure functions of the frame index.

use crate::constants::{
    CHAOS_CEILING, CLAMP_TRIGGER, CLAMPED_CHAOS, NOISE_AMPLITUDE, NOISE_FREQUENCY,
    NOISE_WINDOW_END, NOISE_WINDOW_START,
};

/// Linear chaos ramp from 0 toward `CHAOS_CEILING`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChaosSchedule {
    frame_count: usize,
}

impl ChaosSchedule {
    pub fn new(frame_count: usize) -> Self {
        Self { frame_count }
    }

    /// Unclamped chaos: (frame / frame_count) * 12.
    pub fn base(&self, frame: usize) -> f64 {
        (frame as f64 / self.frame_count as f64) * CHAOS_CEILING
    }

    /// Whether the phoenix clamp is engaged on this frame.
    pub fn is_clamped(&self, frame: usize) -> bool {
        self.base(frame) >= CLAMP_TRIGGER
    }

    /// Chaos after the phoenix clamp. Memoryless: depends on this frame only.
    pub fn effective(&self, frame: usize) -> f64 {
        if self.is_clamped(frame) {
            CLAMPED_CHAOS
        } else {
            self.base(frame)
        }
    }

    pub fn base_series(&self) -> Vec<f64> {
        (0..self.frame_count).map(|f| self.base(f)).collect()
    }

    pub fn effective_series(&self) -> Vec<f64> {
        (0..self.frame_count).map(|f| self.effective(f)).collect()
    }

    /// Number of frames the clamp touched (the `resets_fenix` counter).
    pub fn clamped_frames(&self) -> usize {
        (0..self.frame_count).filter(|&f| self.is_clamped(f)).count()
    }
}

/// External-interference burst confined to the middle of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseWindow {
    frame_count: usize,
}

impl NoiseWindow {
    pub fn new(frame_count: usize) -> Self {
        Self { frame_count }
    }

    /// Open interval (0.1·frame_count, 0.5·frame_count).
    pub fn contains(&self, frame: usize) -> bool {
        let f = frame as f64;
        let n = self.frame_count as f64;
        f > n * NOISE_WINDOW_START && f < n * NOISE_WINDOW_END
    }

    pub fn value(&self, frame: usize) -> f64 {
        if self.contains(frame) {
            NOISE_AMPLITUDE * (frame as f64 * NOISE_FREQUENCY).sin()
        } else {
            0.0
        }
    }

    pub fn series(&self) -> Vec<f64> {
        (0..self.frame_count).map(|f| self.value(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CRITICAL_LIMIT;

    #[test]
    fn test_chaos_ramp() {
        let chaos = ChaosSchedule::new(100);
        assert_eq!(chaos.base(0), 0.0);
        assert!((chaos.base(50) - 6.0).abs() < 1e-12);
        assert!(chaos.base(99) < CHAOS_CEILING);
    }

    #[test]
    fn test_clamp_value_is_exact() {
        let chaos = ChaosSchedule::new(1000);
        for frame in 0..1000 {
            if chaos.base(frame) >= CRITICAL_LIMIT * 0.85 {
                assert_eq!(chaos.effective(frame), CRITICAL_LIMIT * 0.80);
            } else {
                assert_eq!(chaos.effective(frame), chaos.base(frame));
            }
        }
    }

    #[test]
    fn test_clamped_frames_count() {
        // Threshold fraction is 2.2253 / 12 = 0.185441..., so frames 186..
        // of a 1000-frame run are clamped.
        let chaos = ChaosSchedule::new(1000);
        assert!(!chaos.is_clamped(185));
        assert!(chaos.is_clamped(186));
        assert_eq!(chaos.clamped_frames(), 1000 - 186);
    }

    #[test]
    fn test_short_run_never_clamps_first_frame() {
        let chaos = ChaosSchedule::new(1);
        assert_eq!(chaos.clamped_frames(), 0);
        assert_eq!(chaos.effective(0), 0.0);
    }

    #[test]
    fn test_noise_window_bounds() {
        let noise = NoiseWindow::new(100);
        assert!(!noise.contains(10));
        assert!(noise.contains(11));
        assert!(noise.contains(49));
        assert!(!noise.contains(50));
        assert_eq!(noise.value(0), 0.0);
        assert_eq!(noise.value(10), 0.0);
        assert_eq!(noise.value(50), 0.0);
        assert_eq!(noise.value(99), 0.0);
    }

    #[test]
    fn test_noise_inside_window() {
        let noise = NoiseWindow::new(100);
        let v = noise.value(20);
        assert_eq!(v, 0.35 * (20.0_f64 * 0.4).sin());
        assert!(v != 0.0);
        assert!(noise.series().iter().all(|v| v.abs() <= NOISE_AMPLITUDE));
    }
}
