use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use clap::Parser;

pub const OUTPUT_SUFFIX: &str = "_out.csv";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "letterconv")]
#[command(about = "Convert an IMDb ratings export into a Letterboxd import file")]
pub struct CliConfig {
    /// Path of the IMDb CSV export
    pub input_file: PathBuf,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn output_file(&self) -> PathBuf {
        derive_output_path(&self.input_file)
    }
}

/// `export.csv` becomes `export_out.csv` in the same directory.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_default();
    name.push(OUTPUT_SUFFIX);
    input.with_file_name(name)
}
