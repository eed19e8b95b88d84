//! Font engine seam
//!
//! Decoding, subsetting and encoding of font binaries live behind these
//! traits so the pipeline can run against the OpenType backend or the
//! in-memory one used by tests.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{COLLECTION_EXTENSIONS, KEPT_LAYOUT_FEATURES, SINGLE_FONT_EXTENSIONS};

use super::StyleBits;

/// Container format, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Single,
    Collection,
}

impl ContainerKind {
    /// `None` for files that are not fonts.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if SINGLE_FONT_EXTENSIONS.contains(&ext.as_str()) {
            Some(ContainerKind::Single)
        } else if COLLECTION_EXTENSIONS.contains(&ext.as_str()) {
            Some(ContainerKind::Collection)
        } else {
            None
        }
    }
}

/// OpenType layout tables that carry a script list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayoutTable {
    Gsub,
    Gpos,
}

impl LayoutTable {
    pub const ALL: [LayoutTable; 2] = [LayoutTable::Gsub, LayoutTable::Gpos];

    pub const fn tag(self) -> &'static [u8; 4] {
        match self {
            LayoutTable::Gsub => b"GSUB",
            LayoutTable::Gpos => b"GPOS",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            LayoutTable::Gsub => "GSUB",
            LayoutTable::Gpos => "GPOS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetOptions {
    pub hinting: bool,
    /// Layout features retained through subsetting; all others are dropped.
    pub layout_features: Vec<String>,
}

impl Default for SubsetOptions {
    fn default() -> Self {
        Self {
            hinting: false,
            layout_features: KEPT_LAYOUT_FEATURES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// A name-table entry on the Windows platform (US English).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NameRecord {
    pub name_id: u16,
    pub value: String,
}

impl NameRecord {
    pub fn new(name_id: u16, value: impl Into<String>) -> Self {
        Self { name_id, value: value.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FontEngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid font data: {0}")]
    InvalidData(String),

    #[error("Missing table: {0}")]
    MissingTable(&'static str),

    #[error("Subsetting failed: {0}")]
    Subset(String),

    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Opens font files.
pub trait FontEngine {
    type Face: FontFace;

    /// Opens every face stored in `path`; collections yield one face per member.
    fn open(&self, path: &Path, kind: ContainerKind) -> Result<Vec<Self::Face>, FontEngineError>;
}

/// One decoded face. Mutating operations apply in call order.
pub trait FontFace {
    /// Every Windows-platform family name (name ID 1) in record order.
    fn display_names(&self) -> Result<Vec<String>, FontEngineError>;

    fn style_bits(&self) -> Result<StyleBits, FontEngineError>;

    fn has_table(&self, table: LayoutTable) -> bool;

    fn script_tags(&self, table: LayoutTable) -> Result<Vec<String>, FontEngineError>;

    /// Drops every script record of `table` not listed in `keep`.
    fn restrict_scripts(&mut self, table: LayoutTable, keep: &[String]) -> Result<(), FontEngineError>;

    fn subset(&mut self, chars: &BTreeSet<char>, options: &SubsetOptions) -> Result<(), FontEngineError>;

    /// Replaces the whole name table.
    fn set_name_records(&mut self, records: &[NameRecord]) -> Result<(), FontEngineError>;

    fn save(&self, path: &Path) -> Result<(), FontEngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_kind_by_extension() {
        assert_eq!(ContainerKind::from_path(Path::new("a/Font.TTF")), Some(ContainerKind::Single));
        assert_eq!(ContainerKind::from_path(Path::new("b.otf")), Some(ContainerKind::Single));
        assert_eq!(ContainerKind::from_path(Path::new("c.ttc")), Some(ContainerKind::Collection));
        assert_eq!(ContainerKind::from_path(Path::new("d.otc")), Some(ContainerKind::Collection));
        assert_eq!(ContainerKind::from_path(Path::new("readme.txt")), None);
        assert_eq!(ContainerKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn default_options_disable_hinting_and_keep_vertical_features() {
        let options = SubsetOptions::default();
        assert!(!options.hinting);
        assert_eq!(options.layout_features, vec!["vert", "vrt2"]);
    }
}
