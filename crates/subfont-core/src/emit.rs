//! Subset emission: one relabeled, subsetted font per demanded style variant

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_SCRIPT_TAG, OUTPUT_FONT_EXTENSION, TOOL_VERSION_STRING};
use crate::demand::CharacterDemand;
use crate::error::{SubsetError, SubsetResult};
use crate::font::{CanonicalId, FontEngineError, FontFace, FontInventory, LayoutTable, NameRecord, StyleBits, SubsetOptions};

/// `DFLT` when declared, otherwise the first script.
pub fn preferred_script(tags: &[String]) -> Option<&String> {
    tags.iter().find(|tag| tag.as_str() == DEFAULT_SCRIPT_TAG).or_else(|| tags.first())
}

/// Name records that replace the whole name table of an emitted face.
pub fn name_records(id: &CanonicalId, style: StyleBits) -> Vec<NameRecord> {
    vec![
        NameRecord::new(1, id.as_str()),
        NameRecord::new(2, style.label()),
        NameRecord::new(3, id.as_str()),
        NameRecord::new(4, id.as_str()),
        NameRecord::new(5, TOOL_VERSION_STRING),
        NameRecord::new(6, id.as_str()),
    ]
}

pub fn output_file_name(id: &CanonicalId, style: StyleBits) -> String {
    format!("{}-{}.{}", id, style, OUTPUT_FONT_EXTENSION)
}

pub struct SubsetEmitter<'o> {
    output_dir: &'o Path,
    options: SubsetOptions,
}

impl<'o> SubsetEmitter<'o> {
    pub fn new(output_dir: &'o Path) -> Self {
        Self { output_dir, options: SubsetOptions::default() }
    }

    pub fn with_options(mut self, options: SubsetOptions) -> Self {
        self.options = options;
        self
    }

    /// Emits every style variant of every font with non-empty demand.
    pub fn emit<F: FontFace>(
        &self,
        inventory: &mut FontInventory<F>,
        demand: &CharacterDemand,
    ) -> SubsetResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (id, chars) in demand.iter() {
            if chars.is_empty() {
                tracing::debug!("{} has no rendered characters; skipped", id);
                continue;
            }
            for (style, mut face) in inventory.take_variants(id) {
                written.push(self.emit_face(id, style, &mut face, chars)?);
            }
        }
        Ok(written)
    }

    /// Relabels, trims, subsets and saves one face.
    pub fn emit_face<F: FontFace>(
        &self,
        id: &CanonicalId,
        style: StyleBits,
        face: &mut F,
        chars: &BTreeSet<char>,
    ) -> SubsetResult<PathBuf> {
        let subsetting = |err: FontEngineError| SubsetError::Subsetting {
            canonical_id: id.to_string(),
            style_bits: style.bits(),
            message: err.to_string(),
        };

        face.set_name_records(&name_records(id, style)).map_err(subsetting)?;
        for table in LayoutTable::ALL {
            if !face.has_table(table) {
                continue;
            }
            let tags = face.script_tags(table).map_err(subsetting)?;
            if let Some(keep) = preferred_script(&tags).cloned() {
                face.restrict_scripts(table, &[keep]).map_err(subsetting)?;
            }
        }
        face.subset(chars, &self.options).map_err(subsetting)?;

        let path = self.output_dir.join(output_file_name(id, style));
        face.save(&path).map_err(|err| SubsetError::FontEncode {
            path: path.clone(),
            message: err.to_string(),
        })?;
        tracing::info!("Wrote {} ({} characters, {})", path.display(), chars.len(), style.label());
        Ok(path)
    }
}
