//! subfont - font subsetter for ASS subtitles
//!
//! Rewrites subtitle font references to synthetic family names and emits
//! one subsetted font per referenced style variant, carrying only the
//! characters the subtitles draw with it.

pub mod cli;
pub mod error;

// Re-export main types for convenience
pub use cli::Cli;
pub use error::{claim_output_dir, CliError, CliResult};
pub use subfont_ass::{Document, DocumentError};
pub use subfont_core::{
    run, CanonicalId, CharacterDemand, DemandAttribution, NotFoundPolicy, RunReport, StyleBits, SubsetConfig,
    SubsetError, SubsetResult,
};

#[cfg(feature = "opentype")]
pub use subfont_core::OpenTypeEngine;
