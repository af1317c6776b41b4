use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use harpia_core::{GainStrategy, Generation, SimulationConfig, Topology, generate_with, rng_for};
use harpia_store::{
    ConfigOverrides, ExportReport, Preset, export_dataset, hash_file, load_overrides, output_dir,
    read_table_file, short_hash, verify_digest,
};
use tokio::task::JoinSet;

#[derive(Parser)]
#[command(name = "harpia", about = "Synthetic torus trajectory generator")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one dataset and write it as a CSV table
    Generate {
        #[command(flatten)]
        run: RunArgs,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate several presets concurrently; reports every finished job
    /// before failing on the first error
    Batch {
        /// Presets to run
        #[arg(default_values_t = [Preset::Pyramid, Preset::Cube])]
        presets: Vec<Preset>,

        /// Frames per dataset
        #[arg(long)]
        frames: Option<usize>,

        /// Seed shared by every job
        #[arg(long)]
        seed: Option<u64>,

        /// Disable the local gain engine
        #[arg(long)]
        no_gain: bool,

        /// Output directory (defaults to $HARPIA_OUTPUT_DIR, then ".")
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Check a table's SHA-256 against an expected digest or prefix
    Verify {
        /// Table file
        file: PathBuf,

        /// Expected hex digest, full or prefix
        expected: String,
    },

    /// Summarize a table written by `generate`
    Inspect {
        /// Table file
        file: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Built-in starting configuration
    #[arg(long)]
    preset: Option<Preset>,

    /// TOML file layered over the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of marker points
    #[arg(long)]
    points: Option<usize>,

    /// Number of frames
    #[arg(long)]
    frames: Option<usize>,

    /// Torus topology (tetrahedron, cube, ring)
    #[arg(long)]
    topology: Option<Topology>,

    #[arg(long)]
    major_radius: Option<f64>,

    #[arg(long)]
    minor_radius: Option<f64>,

    #[arg(long)]
    flattening: Option<f64>,

    /// Disable the local gain engine
    #[arg(long)]
    no_gain: bool,

    /// RNG seed; omit for OS entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory (defaults to $HARPIA_OUTPUT_DIR, then ".")
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

impl RunArgs {
    /// Preset, then config file, then flags.
    fn resolve(&self) -> Result<SimulationConfig> {
        let base = self.preset.unwrap_or_default().config();
        let file_layer = match &self.config {
            Some(path) => load_overrides(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ConfigOverrides::default(),
        };
        let flag_layer = ConfigOverrides {
            preset: None,
            point_count: self.points,
            frame_count: self.frames,
            major_radius: self.major_radius,
            minor_radius: self.minor_radius,
            flattening_factor: self.flattening,
            enable_gain_engine: self.no_gain.then_some(false),
            topology: self.topology,
            seed: self.seed,
        };
        Ok(flag_layer.apply(file_layer.apply(base)))
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Generate { run, json } => cmd_generate(run, *json),
        Commands::Batch {
            presets,
            frames,
            seed,
            no_gain,
            out_dir,
        } => cmd_batch(presets, *frames, *seed, *no_gain, out_dir.as_deref()).await,
        Commands::Verify { file, expected } => cmd_verify(file, expected),
        Commands::Inspect { file } => cmd_inspect(file),
    }
}

/// Generate and export one configuration. Blocking; safe to call from
/// `spawn_blocking`.
fn run_job(config: &SimulationConfig, dir: &Path) -> Result<(Generation, ExportReport)> {
    let strategy = GainStrategy::from_config(config);
    let engine = strategy.engine();
    tracing::info!(
        "gain engine: {} ({} points, {} frames)",
        engine.name(),
        config.point_count,
        config.frame_count
    );

    let mut rng = rng_for(config);
    let generation =
        generate_with(config, engine.as_ref(), &mut rng).context("generation failed")?;
    let report = export_dataset(&generation.dataset, dir).context("failed to write dataset")?;
    Ok((generation, report))
}

fn print_report(generation: &Generation, report: &ExportReport) {
    let stats = &generation.stats;
    println!("file:           {}", report.path.display());
    println!("topology:       {}", generation.dataset.label());
    println!("frames:         {}", generation.dataset.frame_count());
    println!("points:         {}", generation.dataset.point_count());
    println!("resets_fenix:   {}", stats.resets_fenix);
    println!("mean_coherence: {:.6}", stats.mean_coherence);
    println!("frames/sec:     {:.0}", stats.frames_per_second);
    println!("sha256:         {}...", short_hash(&report.sha256));
}

fn report_json(generation: &Generation, report: &ExportReport) -> serde_json::Value {
    serde_json::json!({
        "file": report.path,
        "topology": generation.dataset.label(),
        "frames": generation.dataset.frame_count(),
        "points": generation.dataset.point_count(),
        "bytes": report.bytes,
        "sha256": report.sha256,
        "stats": generation.stats,
    })
}

fn cmd_generate(run: &RunArgs, json: bool) -> Result<()> {
    let config = run.resolve()?;
    let dir = output_dir(run.out_dir.as_deref());
    let (generation, report) = run_job(&config, &dir)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report_json(&generation, &report))?
        );
    } else {
        print_report(&generation, &report);
    }
    Ok(())
}

async fn cmd_batch(
    presets: &[Preset],
    frames: Option<usize>,
    seed: Option<u64>,
    no_gain: bool,
    out_dir: Option<&Path>,
) -> Result<()> {
    let dir = output_dir(out_dir);
    let layer = ConfigOverrides {
        frame_count: frames,
        enable_gain_engine: no_gain.then_some(false),
        seed,
        ..Default::default()
    };

    let mut jobs = JoinSet::new();
    for (slot, preset) in presets.iter().enumerate() {
        let config = layer.apply(preset.config());
        let dir = dir.clone();
        jobs.spawn_blocking(move || run_job(&config, &dir).map(|done| (slot, done)));
    }

    let (mut finished, failure) = join_all(jobs).await;
    // Completion order is arbitrary; report in the order requested.
    finished.sort_by_key(|(slot, _)| *slot);

    for (i, (_, (generation, report))) in finished.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_report(generation, report);
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Wait for every job, even after one fails. Blocking jobs cannot be
/// cancelled, so the survivors' tables get written either way and their
/// results are kept for reporting. Returns the first failure.
async fn join_all<T: 'static>(mut jobs: JoinSet<Result<T>>) -> (Vec<T>, Option<anyhow::Error>) {
    let mut done = Vec::with_capacity(jobs.len());
    let mut failure = None;
    while let Some(joined) = jobs.join_next().await {
        match joined.context("batch job panicked").and_then(|r| r) {
            Ok(value) => done.push(value),
            Err(e) => {
                tracing::warn!("batch job failed: {e:#}");
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }
    }
    (done, failure)
}

fn cmd_verify(file: &Path, expected: &str) -> Result<()> {
    let actual =
        hash_file(file).with_context(|| format!("failed to hash {}", file.display()))?;
    if !verify_digest(&actual, expected) {
        bail!(
            "digest mismatch for {}: expected {}, got {}",
            file.display(),
            expected.trim(),
            actual
        );
    }
    println!("ok {} {}", actual, file.display());
    Ok(())
}

fn cmd_inspect(file: &Path) -> Result<()> {
    let trajectory =
        read_table_file(file).with_context(|| format!("failed to read {}", file.display()))?;
    let topology = trajectory.topology();

    println!("frames:   {}", trajectory.frame_count());
    println!("points:   {}", trajectory.point_count);
    println!("topology: {}", topology.label(trajectory.point_count));
    println!("edges:    {}", topology.edges().len());

    if topology.edges().is_empty() {
        return Ok(());
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count = 0usize;
    for frame in 0..trajectory.frame_count() {
        for length in trajectory.edge_lengths(frame).into_iter().flatten() {
            min = min.min(length);
            max = max.max(length);
            sum += length;
            count += 1;
        }
    }
    println!("edge_min:  {min:.6}");
    println!("edge_mean: {:.6}", sum / count as f64);
    println!("edge_max:  {max:.6}");
    Ok(())
}
