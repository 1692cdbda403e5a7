pub mod config;
pub mod error;
pub mod merger;
pub mod naming;
pub mod readers;

pub use config::{Config, ConfigError, Dtype, ErrorPolicy};
pub use error::MergeError;
pub use merger::{BatchMerger, MergeReport, MergedBatch, SequenceMerger};
