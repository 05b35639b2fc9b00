//! # Error Types
//!
//! This module defines all error types for the fretwise theory engine.
//!
//! Every error carries the offending input so the message can be shown to a
//! user as-is.
//!
//! ## Error Types
//! - `ParseError` - Malformed note or chord text
//! - `UnknownChordType` - Chord quality alias not in the alias table
//! - `PitchOutOfRange` - A pitch fell outside 0-127
//! - `PositionOutOfRange` - String or fret not on the fretboard
//! - `UnknownScale` - Scale name not in the catalog
//! - `CatalogError` - Malformed entry in the embedded scale or pattern data
//! - `ConfigError` - Malformed instrument configuration
//! - `NoDiatonicMatch` - No chord quality fits a scale degree
//!
//! An empty pattern search is not an error: the matcher returns an empty list.
//!
//! ## Usage
//! ```rust
//! use fretwise::{resolve_chord, TheoryError};
//!
//! match resolve_chord("Cxyz") {
//!     Ok(chord) => println!("{}", chord.symbol),
//!     Err(TheoryError::UnknownChordType { alias, .. }) => {
//!         eprintln!("No chord type called '{}'", alias);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TheoryError {
    /// Malformed note or chord text.
    ///
    /// # Example
    /// ```
    /// # use fretwise::TheoryError;
    /// let err = TheoryError::ParseError {
    ///     input: "H#".to_string(),
    ///     message: "unrecognized note letter 'H'".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error in 'H#': unrecognized note letter 'H'");
    /// ```
    #[error("Parse error in '{input}': {message}")]
    ParseError { input: String, message: String },

    /// The quality part of a chord symbol is not a known alias.
    ///
    /// # Example
    /// ```
    /// # use fretwise::TheoryError;
    /// let err = TheoryError::UnknownChordType {
    ///     input: "Cxyz".to_string(),
    ///     alias: "xyz".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Unknown chord type 'xyz' in 'Cxyz'");
    /// ```
    #[error("Unknown chord type '{alias}' in '{input}'")]
    UnknownChordType { input: String, alias: String },

    /// A pitch or transposition left the representable range.
    #[error("Pitch {pitch} is out of range (0-127)")]
    PitchOutOfRange { pitch: i32 },

    /// A string or fret that does not exist on the fretboard.
    #[error("No position at string {string}, fret {fret} on this fretboard")]
    PositionOutOfRange { string: usize, fret: i32 },

    #[error("Unknown scale: {0}")]
    UnknownScale(String),

    /// An entry of the embedded static data failed validation.
    #[error("Invalid catalog entry '{entry}': {message}")]
    CatalogError { entry: String, message: String },

    #[error("Invalid instrument configuration: {0}")]
    ConfigError(String),

    /// No chord quality (including the sus2/sus4 retries) fits a scale degree.
    ///
    /// # Example
    /// ```
    /// # use fretwise::TheoryError;
    /// let err = TheoryError::NoDiatonicMatch {
    ///     degree: 1,
    ///     notes: "C E A".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "No chord quality matches scale degree 1 (C E A)");
    /// ```
    #[error("No chord quality matches scale degree {degree} ({notes})")]
    NoDiatonicMatch { degree: usize, notes: String },
}

impl TheoryError {
    pub(crate) fn parse(input: &str, message: impl Into<String>) -> Self {
        TheoryError::ParseError {
            input: input.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn catalog(entry: &str, message: impl Into<String>) -> Self {
        TheoryError::CatalogError {
            entry: entry.to_string(),
            message: message.into(),
        }
    }
}
