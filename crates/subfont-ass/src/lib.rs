//! # subfont-ass
//!
//! The subtitle side of subfont: a line-oriented ASS/SSA document model
//! and a tokenizer for the override blocks embedded in event text.
//! Only the parts of the format that decide which font draws which
//! characters are interpreted; everything else round-trips untouched.

pub mod document;
pub mod markup;

pub use document::{Document, DocumentError, EventKind, EventRecord, Line, StyleRecord};
pub use markup::{plain_text, rewrite_font_overrides, runs, ActiveFont, Run, Segment, Segments, TagKind, Tags};
