//! Subtitle rewriting and character demand collection
//!
//! Style font names and inline `\fn` overrides are replaced by canonical ids
//! while the rendered text of every dialogue line is credited to the fonts
//! that draw it.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use subfont_ass::{plain_text, rewrite_font_overrides, runs, ActiveFont, Document};

use crate::config::{DemandAttribution, NotFoundPolicy, SubsetConfig};
use crate::constants::VERTICAL_MARKER;
use crate::demand::CharacterDemand;
use crate::error::{SubsetError, SubsetResult};
use crate::font::{CanonicalId, NameIndex};

/// A resolved font reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRef {
    pub id: CanonicalId,
    /// The reference carried the vertical marker.
    pub vertical: bool,
}

impl FontRef {
    /// The name written back into the document.
    pub fn rendered_name(&self) -> String {
        if self.vertical {
            format!("{}{}", VERTICAL_MARKER, self.id)
        } else {
            self.id.to_string()
        }
    }
}

/// Splits off a leading vertical marker.
fn split_marker(raw: &str) -> (&str, bool) {
    match raw.strip_prefix(VERTICAL_MARKER) {
        Some(name) => (name, true),
        None => (raw, false),
    }
}

/// Resolves raw font references against the inventory and applies the
/// not-found policy.
#[derive(Debug)]
pub struct FontResolver<'a> {
    names: &'a NameIndex,
    policy: NotFoundPolicy,
    missing: BTreeSet<String>,
}

impl<'a> FontResolver<'a> {
    pub fn new(names: &'a NameIndex, policy: NotFoundPolicy) -> Self {
        Self { names, policy, missing: BTreeSet::new() }
    }

    /// Resolves without applying the policy; misses map to the fallback id.
    pub fn lookup(&self, raw: &str) -> FontRef {
        let (name, vertical) = split_marker(raw);
        let id = self.names.get(name).cloned().unwrap_or_else(CanonicalId::fallback);
        FontRef { id, vertical }
    }

    pub fn resolve(&mut self, raw: &str) -> SubsetResult<FontRef> {
        let font = self.lookup(raw);
        if font.id.is_fallback() {
            self.not_found(split_marker(raw).0)?;
        }
        Ok(font)
    }

    /// Applies the policy to an unresolved display name. Under
    /// `LogAndContinue` each distinct name is warned about once per run.
    pub fn not_found(&mut self, name: &str) -> SubsetResult<()> {
        match self.policy {
            NotFoundPolicy::FailFast => Err(SubsetError::FontNotFound { name: name.to_string() }),
            NotFoundPolicy::LogAndContinue => {
                if self.missing.insert(name.to_string()) {
                    tracing::warn!("font not found: \"{}\"", name);
                }
                Ok(())
            }
        }
    }

    /// Distinct names reported missing so far.
    pub fn missing(&self) -> &BTreeSet<String> {
        &self.missing
    }
}

/// Font of one style after the style pass.
#[derive(Debug, Clone)]
struct StyleFont {
    original: String,
    font: FontRef,
}

impl StyleFont {
    /// Canonical id of the style, checking the policy once the style is used.
    fn resolve(&self, resolver: &mut FontResolver<'_>) -> SubsetResult<CanonicalId> {
        if self.font.id.is_fallback() {
            resolver.not_found(split_marker(&self.original).0)?;
        }
        Ok(self.font.id.clone())
    }
}

/// Rewrites documents one at a time, accumulating demand across all of them.
pub struct SubtitleRewriter<'a> {
    resolver: FontResolver<'a>,
    attribution: DemandAttribution,
    demand: CharacterDemand,
}

impl<'a> SubtitleRewriter<'a> {
    pub fn new(names: &'a NameIndex, policy: NotFoundPolicy, attribution: DemandAttribution) -> Self {
        Self {
            resolver: FontResolver::new(names, policy),
            attribution,
            demand: CharacterDemand::new(),
        }
    }

    pub fn from_config(names: &'a NameIndex, config: &SubsetConfig) -> Self {
        Self::new(names, config.not_found, config.attribution)
    }

    /// Rewrites `doc` in place. `path` only labels errors.
    pub fn rewrite_document(&mut self, doc: &mut Document, path: &Path) -> SubsetResult<()> {
        // Style pass: silent, misses become the fallback id
        let mut styles: HashMap<String, StyleFont> = HashMap::new();
        for style in doc.styles_mut() {
            let original = style.fontname().to_string();
            let font = self.resolver.lookup(&original);
            style.set_fontname(font.rendered_name());
            styles.insert(style.name().to_string(), StyleFont { original, font });
        }

        for event in doc.events_mut() {
            if event.is_comment() {
                continue;
            }
            let style = styles.get(event.style()).ok_or_else(|| SubsetError::MalformedDocument {
                path: path.to_path_buf(),
                reason: format!("event references undefined style \"{}\"", event.style()),
            })?;

            let plain = plain_text(event.text());
            if plain.is_empty() {
                continue;
            }
            let base = style.resolve(&mut self.resolver)?;

            let resolver = &mut self.resolver;
            let mut inline: Vec<CanonicalId> = Vec::new();
            let mut failure: Option<SubsetError> = None;
            let rewritten = rewrite_font_overrides(event.text(), |name| {
                if failure.is_some() {
                    return name.to_string();
                }
                match resolver.resolve(name) {
                    Ok(font) => {
                        let rendered = font.rendered_name();
                        inline.push(font.id);
                        rendered
                    }
                    Err(err) => {
                        failure = Some(err);
                        name.to_string()
                    }
                }
            });
            if let Some(err) = failure {
                return Err(err);
            }

            match self.attribution {
                DemandAttribution::WholeEvent => {
                    let mut active = inline;
                    active.push(base);
                    for run in runs(event.text()) {
                        if let ActiveFont::Style(name) = run.font {
                            if let Some(other) = styles.get(name) {
                                active.push(other.resolve(&mut self.resolver)?);
                            }
                        }
                    }
                    for id in &active {
                        self.demand.record(id, &plain);
                    }
                }
                DemandAttribution::PerRun => {
                    // Every referenced font gets an entry, even one drawing nothing
                    self.demand.record(&base, "");
                    for id in &inline {
                        self.demand.record(id, "");
                    }
                    for run in runs(event.text()) {
                        let id = match run.font {
                            ActiveFont::Inherit => base.clone(),
                            ActiveFont::Font(name) => self.resolver.lookup(name).id,
                            ActiveFont::Style(name) => match styles.get(name) {
                                Some(other) => other.resolve(&mut self.resolver)?,
                                None => base.clone(),
                            },
                        };
                        self.demand.record(&id, &run.text);
                    }
                }
            }

            event.set_text(rewritten);
        }
        Ok(())
    }

    /// Reads `input`, rewrites it and writes the result under `output_dir`
    /// with the same file name. The write goes through a temporary sibling
    /// that is renamed into place.
    pub fn rewrite_file(&mut self, input: &Path, output_dir: &Path) -> SubsetResult<PathBuf> {
        let bytes = fs::read(input).map_err(|e| SubsetError::io(input, e))?;
        let mut doc = Document::from_bytes(&bytes).map_err(|e| SubsetError::MalformedDocument {
            path: input.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.rewrite_document(&mut doc, input)?;

        let file_name = input.file_name().ok_or_else(|| SubsetError::InvalidConfiguration {
            field: "ass_files".to_string(),
            value: input.display().to_string(),
        })?;
        let target = output_dir.join(file_name);
        let staging = output_dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

        fs::write(&staging, doc.to_string_crlf()).map_err(|e| SubsetError::io(&staging, e))?;
        fs::rename(&staging, &target).map_err(|e| SubsetError::io(&target, e))?;
        tracing::info!("Wrote {}", target.display());
        Ok(target)
    }

    pub fn demand(&self) -> &CharacterDemand {
        &self.demand
    }

    pub fn missing_fonts(&self) -> &BTreeSet<String> {
        self.resolver.missing()
    }

    pub fn finish(self) -> CharacterDemand {
        self.demand
    }
}
