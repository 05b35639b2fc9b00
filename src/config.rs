//! # Instrument Configuration
//!
//! Describes a fretted instrument in YAML and turns it into a [`Fretboard`].
//!
//! ## Format
//! ```yaml
//! name: Drop D Guitar
//! tuning: [D2, A2, D3, G3, B3, E4]   # lowest string first
//! frets: 24                          # optional, defaults to 22
//! ```
//!
//! ## Example
//! ```rust
//! use fretwise::InstrumentConfig;
//!
//! let config = InstrumentConfig::from_yaml("name: Bass\ntuning: [E1, A1, D2, G2]\n")?;
//! let board = config.to_fretboard()?;
//! assert_eq!(board.string_count(), 4);
//! assert_eq!(board.frets(), 22);
//! # Ok::<(), fretwise::TheoryError>(())
//! ```

use crate::error::TheoryError;
use crate::fretboard::{Fretboard, Tuning, DEFAULT_FRETS};
use serde::Deserialize;

fn default_frets() -> u8 {
    DEFAULT_FRETS
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstrumentConfig {
    pub name: String,
    /// Open-string note names, lowest string first
    pub tuning: Vec<String>,
    #[serde(default = "default_frets")]
    pub frets: u8,
}

impl InstrumentConfig {
    pub fn from_yaml(content: &str) -> Result<Self, TheoryError> {
        serde_yaml::from_str(content).map_err(|e| TheoryError::ConfigError(e.to_string()))
    }

    /// Validate the tuning and fret count.
    pub fn to_fretboard(&self) -> Result<Fretboard, TheoryError> {
        if self.tuning.is_empty() {
            return Err(TheoryError::ConfigError(format!(
                "'{}' has no strings",
                self.name
            )));
        }
        let tuning = Tuning::from_names(&self.tuning).map_err(|e| {
            TheoryError::ConfigError(format!("'{}' has a bad open string: {}", self.name, e))
        })?;
        let board = Fretboard::new(tuning, self.frets)?;
        log::debug!(
            "configured {} with {} strings and {} frets",
            self.name,
            board.string_count(),
            board.frets()
        );
        Ok(board)
    }
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            name: "Standard Guitar".to_string(),
            tuning: ["E2", "A2", "D3", "G3", "B3", "E4"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            frets: DEFAULT_FRETS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_standard_guitar() {
        let board = InstrumentConfig::default().to_fretboard().unwrap();
        assert_eq!(board, Fretboard::standard_guitar());
    }

    #[test]
    fn test_drop_d() {
        let yaml = "name: Drop D\ntuning: [D2, A2, D3, G3, B3, E4]\nfrets: 24\n";
        let board = InstrumentConfig::from_yaml(yaml)
            .unwrap()
            .to_fretboard()
            .unwrap();
        assert_eq!(board.pitch_at(0, 0).unwrap().value(), 38);
        assert_eq!(board.frets(), 24);
    }

    #[test]
    fn test_invalid_configs() {
        let cases = [
            "name: X\ntuning: []\n",
            "name: X\ntuning: [E2, Q2]\n",
            "name: X\ntuning: [E2]\nfrets: 0\n",
            "name: X\ntuning: [E2]\nfrets: 40\n",
            "name: X\ntuning: [E2]\ncapo: 2\n",
            "name: X\ntuning: [E2, G9]\nfrets: 12\n",
            "tuning: [E2]\n",
        ];
        for yaml in cases {
            let result = InstrumentConfig::from_yaml(yaml).and_then(|c| c.to_fretboard());
            assert!(
                matches!(result, Err(TheoryError::ConfigError(_))),
                "{:?} for {}",
                result,
                yaml
            );
        }
    }
}
