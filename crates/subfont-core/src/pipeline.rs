//! End-to-end run: inventory, rewrite of every document, emission

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SubsetConfig;
use crate::emit::SubsetEmitter;
use crate::error::{SubsetError, SubsetResult};
use crate::font::{FontEngine, InventoryBuilder};
use crate::rewrite::SubtitleRewriter;

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub documents: Vec<PathBuf>,
    pub fonts: Vec<PathBuf>,
    /// Distinct names that could not be resolved (continue policy only).
    pub missing_fonts: BTreeSet<String>,
}

/// Creates the output directory when absent; warns when it already holds
/// files, which may be overwritten.
pub fn prepare_output_dir(dir: &Path) -> SubsetResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| SubsetError::io(dir, e))?;
        return Ok(());
    }
    let mut entries = fs::read_dir(dir).map_err(|e| SubsetError::io(dir, e))?;
    if entries.next().is_some() {
        tracing::warn!("output directory {} is not empty", dir.display());
    }
    Ok(())
}

/// Runs the whole pipeline over `inputs`.
///
/// Every document is rewritten before any font is subset, since a font's
/// character set is the union over all documents.
pub fn run<E: FontEngine>(config: &SubsetConfig, inputs: &[PathBuf], engine: &E) -> SubsetResult<RunReport> {
    config.validate()?;

    let mut builder = InventoryBuilder::new(engine, config.name_matching());
    builder.scan_dir(&config.fonts_dir, config.recursive_fonts_dir)?;
    let mut inventory = builder.finish();
    tracing::info!("{} logical fonts, {} names", inventory.len(), inventory.names().len());

    prepare_output_dir(&config.output_dir)?;

    let mut rewriter = SubtitleRewriter::from_config(inventory.names(), config);
    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        documents.push(rewriter.rewrite_file(input, &config.output_dir)?);
    }
    let missing_fonts = rewriter.missing_fonts().clone();
    let demand = rewriter.finish();

    let fonts = SubsetEmitter::new(&config.output_dir).emit(&mut inventory, &demand)?;

    Ok(RunReport { documents, fonts, missing_fonts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{MemoryEngine, MemoryFace};

    #[test]
    fn prepare_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b");
        prepare_output_dir(&out).unwrap();
        assert!(out.is_dir());
        fs::write(out.join("stale.otf"), b"").unwrap();
        prepare_output_dir(&out).unwrap();
    }

    #[test]
    fn run_rewrites_then_emits() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = dir.path().join("fonts");
        fs::create_dir(&fonts).unwrap();
        fs::write(fonts.join("sans.ttf"), b"").unwrap();
        let input = dir.path().join("a.ass");
        fs::write(
            &input,
            "Format: Name, Fontname\nStyle: Default,Sans\nFormat: Layer, Style, Text\nDialogue: 0,Default,Hi\n",
        )
        .unwrap();

        let mut engine = MemoryEngine::new();
        engine.add_file(fonts.join("sans.ttf"), vec![MemoryFace::new(&["Sans"], 0)]);

        let config = SubsetConfig::new(&fonts, dir.path().join("out"));
        let report = run(&config, &[input], &engine).unwrap();
        assert_eq!(report.documents, vec![dir.path().join("out").join("a.ass")]);
        assert_eq!(report.fonts.len(), 1);
        assert!(report.missing_fonts.is_empty());

        let face = MemoryFace::read_saved(&report.fonts[0]).unwrap();
        assert_eq!(face.coverage, Some("Hi".chars().collect()));
    }

    #[test]
    fn invalid_config_stops_before_scanning() {
        let engine = MemoryEngine::new();
        let config = SubsetConfig::new("", "out");
        assert!(matches!(run(&config, &[], &engine), Err(SubsetError::InvalidConfiguration { .. })));
    }
}
