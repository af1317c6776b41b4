use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use harpia_core::Dataset;

use crate::error::Result;
use crate::integrity::{sha256_hex, short_hash};
use crate::table::to_table_bytes;

/// Where a written table ended up and what it hashes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub sha256: String,
    pub bytes: usize,
}

/// `dataset_{topology}_{frames}frames.csv`
pub fn dataset_file_name(dataset: &Dataset) -> String {
    format!(
        "dataset_{}_{}frames.csv",
        dataset.label(),
        dataset.frame_count()
    )
}

/// Explicit directory, else `HARPIA_OUTPUT_DIR`, else the working directory.
pub fn output_dir(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var("HARPIA_OUTPUT_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Serialize, hash, and write a dataset into `dir`.
///
/// The table is written to a `.partial` sibling and renamed into place, so a
/// failed write never leaves a file under the final name.
pub fn export_dataset(dataset: &Dataset, dir: &Path) -> Result<ExportReport> {
    fs::create_dir_all(dir)?;

    let bytes = to_table_bytes(dataset)?;
    let sha256 = sha256_hex(&bytes);
    let path = dir.join(dataset_file_name(dataset));
    let partial = path.with_extension("csv.partial");

    if let Err(e) = fs::write(&partial, &bytes).and_then(|_| fs::rename(&partial, &path)) {
        let _ = fs::remove_file(&partial);
        tracing::warn!("failed to write {}: {e}", path.display());
        return Err(e.into());
    }

    tracing::info!(
        "wrote {} ({} bytes, sha256 {}...)",
        path.display(),
        bytes.len(),
        short_hash(&sha256)
    );

    Ok(ExportReport {
        path,
        sha256,
        bytes: bytes.len(),
    })
}
