pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::derive_output_path;
pub use crate::core::converter::{convert, ConversionSummary, ImdbConverter, SourceRows};
pub use domain::mapping::{convert_timestamp, map_record};
pub use domain::model::{DestinationRecord, SourceRecord, DESTINATION_HEADER};
pub use utils::error::{ConvertError, Result};
