//! Harpia geometry engine.
//!
//! Generates synthetic trajectories for a handful of marker points riding a
//! deforming horn torus. A deterministic flux oracle, an escalating chaos
//! ramp with a stabilizing clamp, seeded singularities, a pluggable gain
//! engine, and a coherence filter feed a topology-specific torus mapping
//! (tetrahedron, cube, or ring).
//!
//! No I/O here; serialization and hashing live in `harpia-store`.

pub mod coherence;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod gain;
pub mod geometry;
pub mod grid;
pub mod oracle;
pub mod pipeline;
pub mod schedule;
pub mod singularity;
pub mod topology;

pub use coherence::{CoherenceOutput, apply_coherence, coherence_score};
pub use config::SimulationConfig;
pub use constants::{CLAMP_TRIGGER, CLAMPED_CHAOS, PHI, TIME_STEP};
pub use dataset::{Dataset, FrameSummary, RunStats, SUMMARY_COLUMNS, column_names};
pub use error::{ConfigError, CoreError, Result};
pub use gain::{GainEngine, GainField, GainStrategy, LocalGain, PassThrough};
pub use geometry::{Point3, TorusSurface};
pub use grid::Grid;
pub use oracle::{FluxOracle, QubitState};
pub use pipeline::{Generation, PointState, generate, generate_traced, generate_with, rng_for};
pub use schedule::{ChaosSchedule, NoiseWindow};
pub use singularity::sample_singularities;
pub use topology::{BaseAngles, Topology};
