//! OpenType engine backed by write-fonts and HarfBuzz
//!
//! Faces keep the bytes of their source file until the first edit. Edits
//! rebuild a standalone font, so collection members become ordinary sfnt
//! files before they are subset.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use hb_subset as hb;
use write_fonts::from_obj::ToOwnedTable;
use write_fonts::read::{FileRef, FontRef, TableProvider};
use write_fonts::tables::gpos::Gpos;
use write_fonts::tables::gsub::Gsub;
use write_fonts::tables::name::{Name, NameRecord as NameTableRecord};
use write_fonts::types::{NameId, Tag};
use write_fonts::FontBuilder;

use super::engine::{ContainerKind, FontEngine, FontEngineError, FontFace, LayoutTable, NameRecord, SubsetOptions};
use super::StyleBits;
use crate::constants::{ENGLISH_US, WINDOWS_PLATFORM, WINDOWS_UNICODE_BMP};

fn invalid(err: impl Display) -> FontEngineError {
    FontEngineError::InvalidData(err.to_string())
}

fn serialize(err: impl Display) -> FontEngineError {
    FontEngineError::Serialize(err.to_string())
}

fn subset_error(err: impl Display) -> FontEngineError {
    FontEngineError::Subset(err.to_string())
}

/// Opens `.ttf`/`.otf` files and `.ttc`/`.otc` collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTypeEngine;

impl OpenTypeEngine {
    pub fn new() -> Self {
        Self
    }
}

impl FontEngine for OpenTypeEngine {
    type Face = OpenTypeFace;

    fn open(&self, path: &Path, kind: ContainerKind) -> Result<Vec<OpenTypeFace>, FontEngineError> {
        let data: Arc<[u8]> = std::fs::read(path)?.into();
        let count = match (FileRef::new(&data).map_err(invalid)?, kind) {
            (FileRef::Font(_), ContainerKind::Single) => 1,
            (FileRef::Collection(collection), ContainerKind::Collection) => collection.len(),
            (FileRef::Font(_), ContainerKind::Collection) => {
                return Err(invalid("expected a font collection, found a single font"));
            }
            (FileRef::Collection(_), ContainerKind::Single) => {
                return Err(invalid("expected a single font, found a font collection"));
            }
        };

        let mut faces = Vec::with_capacity(count as usize);
        for index in 0..count {
            FontRef::from_index(&data, index).map_err(invalid)?;
            faces.push(OpenTypeFace {
                source: Arc::clone(&data),
                index,
                edited: None,
            });
        }
        tracing::debug!("{}: {} face(s)", path.display(), count);
        Ok(faces)
    }
}

/// One face of a font file.
#[derive(Debug, Clone)]
pub struct OpenTypeFace {
    source: Arc<[u8]>,
    index: u32,
    edited: Option<Vec<u8>>,
}

impl OpenTypeFace {
    fn font(&self) -> Result<FontRef<'_>, FontEngineError> {
        match &self.edited {
            Some(bytes) => FontRef::new(bytes).map_err(invalid),
            None => FontRef::from_index(&self.source, self.index).map_err(invalid),
        }
    }

    /// Standalone sfnt bytes of the face.
    fn standalone(&mut self) -> Result<Vec<u8>, FontEngineError> {
        if let Some(bytes) = self.edited.take() {
            return Ok(bytes);
        }
        let font = FontRef::from_index(&self.source, self.index).map_err(invalid)?;
        Ok(FontBuilder::new().copy_missing_tables(font).build())
    }

    /// Current bytes; unedited single fonts are returned as read.
    pub fn bytes(&self) -> Result<Vec<u8>, FontEngineError> {
        match &self.edited {
            Some(bytes) => Ok(bytes.clone()),
            None if matches!(FileRef::new(&self.source), Ok(FileRef::Font(_))) => Ok(self.source.to_vec()),
            None => {
                let font = FontRef::from_index(&self.source, self.index).map_err(invalid)?;
                Ok(FontBuilder::new().copy_missing_tables(font).build())
            }
        }
    }
}

impl FontFace for OpenTypeFace {
    fn display_names(&self) -> Result<Vec<String>, FontEngineError> {
        let font = self.font()?;
        let name = font.name().map_err(invalid)?;
        let strings = name.string_data();
        Ok(name
            .name_record()
            .iter()
            .filter(|record| record.platform_id() == WINDOWS_PLATFORM && record.name_id() == NameId::FAMILY_NAME)
            .filter_map(|record| record.string(strings).ok())
            .map(|value| value.chars().collect::<String>())
            .collect())
    }

    fn style_bits(&self) -> Result<StyleBits, FontEngineError> {
        let os2 = self.font()?.os2().map_err(invalid)?;
        Ok(StyleBits::from_fs_selection(os2.fs_selection().bits()))
    }

    fn has_table(&self, table: LayoutTable) -> bool {
        self.font()
            .map(|font| font.table_data(Tag::new(table.tag())).is_some())
            .unwrap_or(false)
    }

    fn script_tags(&self, table: LayoutTable) -> Result<Vec<String>, FontEngineError> {
        let font = self.font()?;
        let tags = match table {
            LayoutTable::Gsub => {
                let gsub = font.gsub().map_err(invalid)?;
                let scripts = gsub.script_list().map_err(invalid)?;
                scripts.script_records().iter().map(|r| r.script_tag().to_string()).collect()
            }
            LayoutTable::Gpos => {
                let gpos = font.gpos().map_err(invalid)?;
                let scripts = gpos.script_list().map_err(invalid)?;
                scripts.script_records().iter().map(|r| r.script_tag().to_string()).collect()
            }
        };
        Ok(tags)
    }

    fn restrict_scripts(&mut self, table: LayoutTable, keep: &[String]) -> Result<(), FontEngineError> {
        let bytes = self.standalone()?;
        let font = FontRef::new(&bytes).map_err(invalid)?;
        let kept = |tag: &Tag| keep.iter().any(|k| *k == tag.to_string());

        let mut builder = FontBuilder::new();
        match table {
            LayoutTable::Gsub => {
                let mut gsub: Gsub = font.gsub().map_err(invalid)?.to_owned_table();
                gsub.script_list.script_records.retain(|r| kept(&r.script_tag));
                builder.add_table(&gsub).map_err(serialize)?;
            }
            LayoutTable::Gpos => {
                let mut gpos: Gpos = font.gpos().map_err(invalid)?.to_owned_table();
                gpos.script_list.script_records.retain(|r| kept(&r.script_tag));
                builder.add_table(&gpos).map_err(serialize)?;
            }
        }
        let rebuilt = builder.copy_missing_tables(font).build();
        self.edited = Some(rebuilt);
        Ok(())
    }

    fn subset(&mut self, chars: &BTreeSet<char>, options: &SubsetOptions) -> Result<(), FontEngineError> {
        let bytes = self.standalone()?;

        let blob = hb::Blob::from_bytes(&bytes).map_err(subset_error)?;
        let face = hb::FontFace::new(blob).map_err(subset_error)?;
        let mut input = hb::SubsetInput::new().map_err(subset_error)?;
        {
            let mut unicodes = input.unicode_set();
            for &c in chars {
                unicodes.insert(c);
            }
        }
        if !options.hinting {
            input.flags().remove_hinting();
        }
        {
            let mut features = input.layout_feature_tag_set();
            features.clear();
            for feature in &options.layout_features {
                features.insert(hb::Tag::new(feature_tag(feature)));
            }
        }

        let subset = input.subset_font(&face).map_err(subset_error)?;
        self.edited = Some(subset.underlying_blob().to_vec());
        Ok(())
    }

    fn set_name_records(&mut self, records: &[NameRecord]) -> Result<(), FontEngineError> {
        let bytes = self.standalone()?;
        let font = FontRef::new(&bytes).map_err(invalid)?;
        let name = Name::new(
            records
                .iter()
                .map(|r| {
                    NameTableRecord::new(
                        WINDOWS_PLATFORM,
                        WINDOWS_UNICODE_BMP,
                        ENGLISH_US,
                        NameId::new(r.name_id),
                        r.value.clone().into(),
                    )
                })
                .collect(),
        );

        let mut builder = FontBuilder::new();
        builder.add_table(&name).map_err(serialize)?;
        let rebuilt = builder.copy_missing_tables(font).build();
        self.edited = Some(rebuilt);
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<(), FontEngineError> {
        std::fs::write(path, self.bytes()?)?;
        Ok(())
    }
}

/// Four-byte tag, space padded.
fn feature_tag(feature: &str) -> [u8; 4] {
    let mut tag = [b' '; 4];
    for (slot, byte) in tag.iter_mut().zip(feature.bytes()) {
        *slot = byte;
    }
    tag
}
