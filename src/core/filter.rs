//! Static filter chain over directory names: hidden names, exclude list, regex pattern.

use regex::Regex;

use crate::core::config::Config;

/// Marker that makes a directory name hidden.
const HIDDEN_PREFIX: char = '.';

/// The single rule that rejected a directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Hidden,
    Excluded,
    PatternMismatch,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hidden => write!(f, "hidden directory"),
            Self::Excluded => write!(f, "excluded by exclude list"),
            Self::PatternMismatch => write!(f, "does not match filter pattern"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticFilters {
    pub include_hidden: bool,
    pub exclude: Vec<String>,
    pub pattern: Option<Regex>,
}

impl StaticFilters {
    pub fn from_config(config: &Config) -> Self {
        Self {
            include_hidden: config.include_hidden,
            exclude: config.exclude.clone(),
            pattern: config.filter.clone(),
        }
    }

    /// First rule rejecting `name`, checked in order hidden → exclude → pattern.
    pub fn check(&self, name: &str) -> Result<(), Rejection> {
        if !self.include_hidden && name.starts_with(HIDDEN_PREFIX) {
            return Err(Rejection::Hidden);
        }
        if self.exclude.iter().any(|e| e == name) {
            return Err(Rejection::Excluded);
        }
        if let Some(ref pattern) = self.pattern
            && !pattern.is_match(name)
        {
            return Err(Rejection::PatternMismatch);
        }
        Ok(())
    }

    /// Keep names passing every rule, preserving order. Rejections are logged.
    pub fn apply(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|name| match self.check(name) {
                Ok(()) => true,
                Err(reason) => {
                    log::info!("Skipping {}: {}", name, reason);
                    false
                }
            })
            .collect()
    }
}
