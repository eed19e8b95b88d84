// src/config.rs
use std::path::PathBuf;

use crate::error::{SubsetError, SubsetResult};
use crate::font::NameMatching;

/// What to do when a referenced font has no match in the inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotFoundPolicy {
    /// Abort the run with [`SubsetError::FontNotFound`].
    #[default]
    FailFast,
    /// Warn once per distinct name and substitute the fallback id.
    LogAndContinue,
}

/// How rendered characters are credited to fonts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DemandAttribution {
    /// Each run is credited to the font active while it is drawn.
    #[default]
    PerRun,
    /// Every font named by an event receives the event's whole text.
    WholeEvent,
}

#[derive(Clone, Debug)]
pub struct SubsetConfig {
    pub fonts_dir: PathBuf,
    pub output_dir: PathBuf,
    pub recursive_fonts_dir: bool,
    pub not_found: NotFoundPolicy,
    /// Match font names without regard to case.
    pub ignore_case: bool,
    pub attribution: DemandAttribution,
}

impl Default for SubsetConfig {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("fonts"),
            output_dir: PathBuf::from("output"),
            recursive_fonts_dir: false,
            not_found: NotFoundPolicy::FailFast,
            ignore_case: false,
            attribution: DemandAttribution::PerRun,
        }
    }
}

impl SubsetConfig {
    pub fn new(fonts_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_recursive_fonts_dir(mut self, recursive: bool) -> Self {
        self.recursive_fonts_dir = recursive;
        self
    }

    pub fn with_not_found_policy(mut self, policy: NotFoundPolicy) -> Self {
        self.not_found = policy;
        self
    }

    pub fn with_continue_on_font_not_found(self, enabled: bool) -> Self {
        self.with_not_found_policy(if enabled {
            NotFoundPolicy::LogAndContinue
        } else {
            NotFoundPolicy::FailFast
        })
    }

    pub fn with_ignore_case(mut self, enabled: bool) -> Self {
        self.ignore_case = enabled;
        self
    }

    pub fn with_attribution(mut self, attribution: DemandAttribution) -> Self {
        self.attribution = attribution;
        self
    }

    pub fn name_matching(&self) -> NameMatching {
        if self.ignore_case {
            NameMatching::CaseInsensitive
        } else {
            NameMatching::CaseSensitive
        }
    }

    pub fn validate(&self) -> SubsetResult<()> {
        for (field, path) in [("fonts_dir", &self.fonts_dir), ("output_dir", &self.output_dir)] {
            if path.as_os_str().is_empty() {
                return Err(SubsetError::InvalidConfiguration {
                    field: field.to_string(),
                    value: String::new(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = SubsetConfig::new("in", "out")
            .with_recursive_fonts_dir(true)
            .with_continue_on_font_not_found(true)
            .with_ignore_case(true)
            .with_attribution(DemandAttribution::WholeEvent);
        assert_eq!(config.fonts_dir, PathBuf::from("in"));
        assert!(config.recursive_fonts_dir);
        assert_eq!(config.not_found, NotFoundPolicy::LogAndContinue);
        assert_eq!(config.name_matching(), NameMatching::CaseInsensitive);
        assert_eq!(config.attribution, DemandAttribution::WholeEvent);
    }

    #[test]
    fn empty_paths_are_rejected() {
        let err = SubsetConfig::new("", "out").validate().unwrap_err();
        assert!(matches!(err, SubsetError::InvalidConfiguration { ref field, .. } if field == "fonts_dir"));
        assert!(SubsetConfig::new("in", "out").validate().is_ok());
    }
}
