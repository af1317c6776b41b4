/// Golden ratio: (1 + √5) / 2
pub const PHI: f64 = 1.618_033_988_749_895;

/// Simulated seconds per frame.
pub const TIME_STEP: f64 = 0.05;

/// Chaos reached at the (excluded) final frame of a run.
pub const CHAOS_CEILING: f64 = 12.0;

/// Critical chaos level the phoenix clamp is expressed against (φ²).
pub const CRITICAL_LIMIT: f64 = 2.618;

/// Chaos at or above this triggers the phoenix clamp.
pub const CLAMP_TRIGGER: f64 = CRITICAL_LIMIT * 0.85;

/// Effective chaos while the phoenix clamp is engaged.
pub const CLAMPED_CHAOS: f64 = CRITICAL_LIMIT * 0.80;

/// Interference window, as fractions of the run (both bounds exclusive).
pub const NOISE_WINDOW_START: f64 = 0.1;
pub const NOISE_WINDOW_END: f64 = 0.5;

/// Interference burst: amplitude * sin(frame * frequency).
pub const NOISE_AMPLITUDE: f64 = 0.35;
pub const NOISE_FREQUENCY: f64 = 0.4;

/// Singularity magnitude per unit of effective chaos.
pub const SINGULARITY_SCALE: f64 = 0.1;

/// Share of the singularity that leaks into the coherence filter's noise.
pub const SINGULARITY_NOISE_COUPLING: f64 = 0.05;

/// Oracle flux contribution to the azimuthal phase.
pub const FLUX_COUPLING: f64 = 0.08;

/// Azimuthal drift per simulated second.
pub const AZIMUTH_DRIFT: f64 = 0.2;

/// Elevation precession per simulated second (multiplied by φ).
pub const PRECESSION_RATE: f64 = 0.1;

/// Horn torus radii (R ≈ r).
pub const HORN_MAJOR_RADIUS: f64 = 10.0;
pub const HORN_MINOR_RADIUS: f64 = 9.9;
