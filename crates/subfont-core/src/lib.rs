//! subfont core - font identity resolution and subset emission
//!
//! This crate maps the font names used by ASS subtitles onto the fonts in a
//! directory, rewrites the subtitles to collision-free family names and
//! writes one subsetted font per demanded style variant.

pub mod config;
pub mod constants;
pub mod demand;
pub mod emit;
pub mod error;
pub mod font;
pub mod pipeline;
pub mod rewrite;

// Re-export main types
pub use config::{DemandAttribution, NotFoundPolicy, SubsetConfig};
pub use demand::CharacterDemand;
pub use emit::SubsetEmitter;
pub use error::{SubsetError, SubsetResult};
pub use font::{CanonicalId, FontEngine, FontFace, FontInventory, InventoryBuilder, StyleBits};
pub use pipeline::{prepare_output_dir, run, RunReport};
pub use rewrite::{FontRef, FontResolver, SubtitleRewriter};

#[cfg(feature = "opentype")]
pub use font::OpenTypeEngine;
