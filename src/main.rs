// src/main.rs
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use subfont::{claim_output_dir, run, Cli, OpenTypeEngine};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    claim_output_dir(&cli.output_dir, cli.force)?;

    let config = cli.to_config();
    let report = run(&config, &cli.ass_files, &OpenTypeEngine::new())
        .with_context(|| format!("subsetting fonts from {}", config.fonts_dir.display()))?;

    tracing::info!(
        "Done: {} subtitle file(s), {} font file(s) in {}",
        report.documents.len(),
        report.fonts.len(),
        config.output_dir.display()
    );
    if !report.missing_fonts.is_empty() {
        tracing::warn!("{} font(s) were not found: {:?}", report.missing_fonts.len(), report.missing_fonts);
    }
    Ok(())
}
