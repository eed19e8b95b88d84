// src/cli.rs
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use subfont_core::{DemandAttribution, SubsetConfig};

#[derive(Parser, Debug)]
#[command(name = "subfont", version, about = "Font subsetter for ASS subtitles")]
pub struct Cli {
    /// The input ASS subtitle files
    #[arg(value_name = "ASS_FILE", required = true)]
    pub ass_files: Vec<PathBuf>,

    /// The fonts directory
    #[arg(long, value_name = "DIR")]
    pub fonts_dir: PathBuf,

    /// The output directory (must not exist unless --force is given)
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Remove an existing output directory before writing
    #[arg(long, action = ArgAction::SetTrue)]
    pub force: bool,

    /// Recursively walk the fonts directory
    #[arg(long, action = ArgAction::SetTrue)]
    pub recursive_fonts_dir: bool,

    /// Log and continue when a font is not found, instead of stopping
    #[arg(long, action = ArgAction::SetTrue)]
    pub continue_on_font_not_found: bool,

    /// Match font names without regard to case
    #[arg(long, action = ArgAction::SetTrue)]
    pub ignore_case: bool,

    /// Give every font named in a line the whole line's characters
    #[arg(long, action = ArgAction::SetTrue)]
    pub whole_event_demand: bool,

    /// Log per-face and per-file detail
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> SubsetConfig {
        let attribution = if self.whole_event_demand {
            DemandAttribution::WholeEvent
        } else {
            DemandAttribution::PerRun
        };
        SubsetConfig::new(&self.fonts_dir, &self.output_dir)
            .with_recursive_fonts_dir(self.recursive_fonts_dir)
            .with_continue_on_font_not_found(self.continue_on_font_not_found)
            .with_ignore_case(self.ignore_case)
            .with_attribution(attribution)
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subfont_core::NotFoundPolicy;

    #[test]
    fn parses_flags_into_config() {
        let cli = Cli::try_parse_from([
            "subfont",
            "a.ass",
            "b.ass",
            "--fonts-dir",
            "fonts",
            "--output-dir",
            "out",
            "--continue-on-font-not-found",
            "--whole-event-demand",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.ass_files.len(), 2);
        assert_eq!(cli.log_filter(), "debug");

        let config = cli.to_config();
        assert_eq!(config.fonts_dir, PathBuf::from("fonts"));
        assert_eq!(config.not_found, NotFoundPolicy::LogAndContinue);
        assert_eq!(config.attribution, DemandAttribution::WholeEvent);
        assert!(!config.ignore_case);
    }

    #[test]
    fn requires_inputs_and_directories() {
        assert!(Cli::try_parse_from(["subfont", "--fonts-dir", "f", "--output-dir", "o"]).is_err());
        assert!(Cli::try_parse_from(["subfont", "a.ass", "--output-dir", "o"]).is_err());
    }
}
