pub mod config_file;
pub mod error;
pub mod export;
pub mod integrity;
pub mod table;

pub use config_file::{ConfigOverrides, Preset, load_overrides, parse_overrides};
pub use error::{Result, StoreError};
pub use export::{ExportReport, dataset_file_name, export_dataset, output_dir};
pub use integrity::{HASH_PREFIX_LEN, hash_file, sha256_hex, short_hash, verify_digest};
pub use table::{Trajectory, read_table, read_table_file, to_table_bytes, write_table};
