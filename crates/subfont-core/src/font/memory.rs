//! In-memory font engine for exercising the pipeline without font binaries

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::engine::{ContainerKind, FontEngine, FontEngineError, FontFace, LayoutTable, NameRecord, SubsetOptions};
use super::StyleBits;
use crate::constants::WINDOWS_PLATFORM;

/// A face described by plain data. `save` writes it as JSON, which
/// [`MemoryFace::read_saved`] loads back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryFace {
    pub name_records: Vec<(u16, u16, String)>,
    pub fs_selection: u16,
    pub scripts: BTreeMap<LayoutTable, Vec<String>>,
    /// `None` covers every character.
    pub coverage: Option<BTreeSet<char>>,
    pub hinted: bool,
    pub features: Option<Vec<String>>,
    pub fail_subset: bool,
}

impl MemoryFace {
    /// A face whose Windows family names are `names`.
    pub fn new(names: &[&str], fs_selection: u16) -> Self {
        Self {
            name_records: names
                .iter()
                .map(|n| (WINDOWS_PLATFORM, 1, n.to_string()))
                .collect(),
            fs_selection,
            hinted: true,
            ..Self::default()
        }
    }

    /// Adds a family name on a non-Windows platform, which lookups ignore.
    pub fn with_mac_name(mut self, name: &str) -> Self {
        self.name_records.push((1, 1, name.to_string()));
        self
    }

    pub fn with_scripts(mut self, table: LayoutTable, tags: &[&str]) -> Self {
        self.scripts.insert(table, tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_coverage(mut self, chars: &str) -> Self {
        self.coverage = Some(chars.chars().collect());
        self
    }

    pub fn failing_subset(mut self) -> Self {
        self.fail_subset = true;
        self
    }

    /// Name records with the given id, any platform.
    pub fn names_with_id(&self, name_id: u16) -> Vec<&str> {
        self.name_records
            .iter()
            .filter(|(_, id, _)| *id == name_id)
            .map(|(_, _, value)| value.as_str())
            .collect()
    }

    /// Loads a face written by `save`.
    pub fn read_saved(path: &Path) -> io::Result<MemoryFace> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl FontFace for MemoryFace {
    fn display_names(&self) -> Result<Vec<String>, FontEngineError> {
        Ok(self
            .name_records
            .iter()
            .filter(|(platform, id, _)| *platform == WINDOWS_PLATFORM && *id == 1)
            .map(|(_, _, value)| value.clone())
            .collect())
    }

    fn style_bits(&self) -> Result<StyleBits, FontEngineError> {
        Ok(StyleBits::from_fs_selection(self.fs_selection))
    }

    fn has_table(&self, table: LayoutTable) -> bool {
        self.scripts.contains_key(&table)
    }

    fn script_tags(&self, table: LayoutTable) -> Result<Vec<String>, FontEngineError> {
        self.scripts
            .get(&table)
            .cloned()
            .ok_or(FontEngineError::MissingTable(table.name()))
    }

    fn restrict_scripts(&mut self, table: LayoutTable, keep: &[String]) -> Result<(), FontEngineError> {
        let tags = self
            .scripts
            .get_mut(&table)
            .ok_or(FontEngineError::MissingTable(table.name()))?;
        tags.retain(|tag| keep.contains(tag));
        Ok(())
    }

    fn subset(&mut self, chars: &BTreeSet<char>, options: &SubsetOptions) -> Result<(), FontEngineError> {
        if self.fail_subset {
            return Err(FontEngineError::Subset("glyph closure failed".to_string()));
        }
        let kept = match &self.coverage {
            Some(coverage) => coverage.intersection(chars).copied().collect(),
            None => chars.clone(),
        };
        self.coverage = Some(kept);
        self.hinted = self.hinted && options.hinting;
        self.features = Some(options.layout_features.clone());
        Ok(())
    }

    fn set_name_records(&mut self, records: &[NameRecord]) -> Result<(), FontEngineError> {
        self.name_records = records
            .iter()
            .map(|r| (WINDOWS_PLATFORM, r.name_id, r.value.clone()))
            .collect();
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<(), FontEngineError> {
        let bytes = serde_json::to_vec_pretty(self).map_err(|e| FontEngineError::Serialize(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Serves faces registered per path. The files themselves only need to
/// exist so that directory scanning finds them.
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    files: HashMap<PathBuf, Result<Vec<MemoryFace>, String>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, faces: Vec<MemoryFace>) -> &mut Self {
        self.files.insert(path.into(), Ok(faces));
        self
    }

    /// Registers a file that fails to decode.
    pub fn add_corrupt(&mut self, path: impl Into<PathBuf>, reason: &str) -> &mut Self {
        self.files.insert(path.into(), Err(reason.to_string()));
        self
    }
}

impl FontEngine for MemoryEngine {
    type Face = MemoryFace;

    fn open(&self, path: &Path, kind: ContainerKind) -> Result<Vec<MemoryFace>, FontEngineError> {
        match self.files.get(path) {
            Some(Ok(faces)) if kind == ContainerKind::Single && faces.len() != 1 => Err(
                FontEngineError::InvalidData(format!("expected one face, found {}", faces.len())),
            ),
            Some(Ok(faces)) => Ok(faces.clone()),
            Some(Err(reason)) => Err(FontEngineError::InvalidData(reason.clone())),
            None => Err(FontEngineError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no face registered for {}", path.display()),
            ))),
        }
    }
}
