//! Font inventory: display name -> canonical id -> style variants

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::engine::{ContainerKind, FontEngine, FontFace};
use super::names::{NameIndex, NameMatching};
use super::{CanonicalId, StyleBits};
use crate::error::{SubsetError, SubsetResult};

/// One logical font: every face reachable through a chain of shared names.
#[derive(Debug)]
pub struct FontIdentity<F> {
    pub canonical_id: CanonicalId,
    pub display_names: BTreeSet<String>,
    pub style_variants: BTreeMap<StyleBits, F>,
}

impl<F> FontIdentity<F> {
    fn new(canonical_id: CanonicalId) -> Self {
        Self {
            canonical_id,
            display_names: BTreeSet::new(),
            style_variants: BTreeMap::new(),
        }
    }
}

/// The finished identity table.
#[derive(Debug)]
pub struct FontInventory<F> {
    names: NameIndex,
    identities: BTreeMap<CanonicalId, FontIdentity<F>>,
}

impl<F> FontInventory<F> {
    pub fn names(&self) -> &NameIndex {
        &self.names
    }

    /// Canonical id for a display name.
    pub fn resolve(&self, name: &str) -> Option<&CanonicalId> {
        self.names.get(name)
    }

    pub fn identity(&self, id: &CanonicalId) -> Option<&FontIdentity<F>> {
        self.identities.get(id)
    }

    pub fn identities(&self) -> impl Iterator<Item = &FontIdentity<F>> {
        self.identities.values()
    }

    /// Removes and returns the faces of `id`, keyed by style.
    pub fn take_variants(&mut self, id: &CanonicalId) -> BTreeMap<StyleBits, F> {
        self.identities
            .get_mut(id)
            .map(|identity| std::mem::take(&mut identity.style_variants))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

/// Lists font candidates under `dir`, sorted by path so that id merging is
/// reproducible.
pub fn walk_font_dir(dir: &Path, recursive: bool) -> SubsetResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current).map_err(|e| SubsetError::io(&current, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SubsetError::io(&current, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| SubsetError::io(&path, e))?;
            if file_type.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Scans font files and merges their faces into logical fonts.
pub struct InventoryBuilder<'e, E: FontEngine> {
    engine: &'e E,
    rng: Box<dyn RngCore>,
    names: NameIndex,
    identities: BTreeMap<CanonicalId, FontIdentity<E::Face>>,
}

impl<'e, E: FontEngine> InventoryBuilder<'e, E> {
    pub fn new(engine: &'e E, matching: NameMatching) -> Self {
        Self {
            engine,
            rng: Box::new(StdRng::from_os_rng()),
            names: NameIndex::new(matching),
            identities: BTreeMap::new(),
        }
    }

    /// Uses a seeded generator so minted ids repeat across runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Box::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn scan_dir(&mut self, dir: &Path, recursive: bool) -> SubsetResult<usize> {
        let mut faces = 0;
        for path in walk_font_dir(dir, recursive)? {
            faces += self.add_file(&path)?;
        }
        tracing::info!("Scanned {} font faces in {}", faces, dir.display());
        Ok(faces)
    }

    /// Adds every face in `path`; returns how many were added. Files whose
    /// extension is not a font extension are skipped.
    pub fn add_file(&mut self, path: &Path) -> SubsetResult<usize> {
        let Some(kind) = ContainerKind::from_path(path) else {
            return Ok(0);
        };

        let decode_error = |message: String| SubsetError::FontDecode {
            path: path.to_path_buf(),
            message,
        };
        let faces = self.engine.open(path, kind).map_err(|e| decode_error(e.to_string()))?;

        let mut added = 0;
        for face in faces {
            let names = face.display_names().map_err(|e| decode_error(e.to_string()))?;
            let style = face.style_bits().map_err(|e| decode_error(e.to_string()))?;
            if names.is_empty() {
                tracing::warn!("{} has a face without a Windows family name; skipped", path.display());
                continue;
            }
            let id = self.add_face(&names, style, face);
            tracing::debug!("{}: {:?} {} -> {}", path.display(), names, style.label(), id);
            added += 1;
        }
        Ok(added)
    }

    /// Binds `names` to one canonical id and files `face` under `style`.
    ///
    /// The id of the first already-known name is reused; identities reached
    /// through any other known name are merged into it.
    pub fn add_face(&mut self, names: &[String], style: StyleBits, face: E::Face) -> CanonicalId {
        let known: Vec<CanonicalId> = names.iter().filter_map(|n| self.names.get(n).cloned()).collect();

        let id = match known.first() {
            Some(id) => id.clone(),
            None => {
                let id = CanonicalId::mint(&mut *self.rng);
                self.identities.insert(id.clone(), FontIdentity::new(id.clone()));
                id
            }
        };

        for other in known.iter().skip(1) {
            if *other != id {
                self.merge(other, &id);
            }
        }
        for name in names {
            self.names.insert(name, id.clone());
        }

        if let Some(identity) = self.identities.get_mut(&id) {
            identity.display_names.extend(names.iter().cloned());
            insert_variant(identity, style, face);
        }
        id
    }

    fn merge(&mut self, from: &CanonicalId, into: &CanonicalId) {
        let Some(absorbed) = self.identities.remove(from) else {
            return;
        };
        self.names.rebind(from, into);
        if let Some(identity) = self.identities.get_mut(into) {
            identity.display_names.extend(absorbed.display_names);
            for (style, face) in absorbed.style_variants {
                insert_variant(identity, style, face);
            }
        }
    }

    pub fn finish(self) -> FontInventory<E::Face> {
        FontInventory {
            names: self.names,
            identities: self.identities,
        }
    }
}

fn insert_variant<F>(identity: &mut FontIdentity<F>, style: StyleBits, face: F) {
    if identity.style_variants.contains_key(&style) {
        tracing::warn!(
            "multiple candidates are found for \"{}\" style={} ({}); keeping the first",
            identity.display_names.iter().next().map(String::as_str).unwrap_or_default(),
            style,
            style.label()
        );
        return;
    }
    identity.style_variants.insert(style, face);
}
