//! String/fret lattice.
//!
//! A position's pitch is the open string's pitch plus the fret number. The
//! lattice stores nothing beyond the tuning and the fret count; every lookup
//! is computed on demand.

use crate::error::TheoryError;
use crate::note::{Note, Pitch};
use serde::Serialize;

/// Frets on a stock guitar neck
pub const DEFAULT_FRETS: u8 = 22;

/// Largest fret count accepted from configuration
pub const MAX_FRETS: u8 = 36;

/// String 0 is the lowest-pitched string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FretPosition {
    pub string: usize,
    pub fret: u8,
}

/// Open-string pitches, lowest string first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tuning(Vec<Pitch>);

impl Tuning {
    pub fn new(open_strings: Vec<Pitch>) -> Result<Self, TheoryError> {
        if open_strings.is_empty() {
            return Err(TheoryError::ConfigError(
                "a tuning needs at least one string".to_string(),
            ));
        }
        Ok(Self(open_strings))
    }

    /// E2 A2 D3 G3 B3 E4
    pub fn standard_guitar() -> Self {
        Self(
            [40, 45, 50, 55, 59, 64]
                .into_iter()
                .map(Pitch::from_raw)
                .collect(),
        )
    }

    /// Parse note names such as `["E2", "A2", "D3"]`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, TheoryError> {
        let pitches = names
            .iter()
            .map(|name| Note::parse(name.as_ref())?.pitch())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(pitches)
    }

    pub fn strings(&self) -> &[Pitch] {
        &self.0
    }

    pub fn string_count(&self) -> usize {
        self.0.len()
    }
}

/// Pitch sounding at `string`, `fret` for a tuning, with no upper fret limit.
pub fn pitch_at(tuning: &Tuning, string: usize, fret: u8) -> Result<Pitch, TheoryError> {
    let open = tuning
        .strings()
        .get(string)
        .ok_or(TheoryError::PositionOutOfRange {
            string,
            fret: fret as i32,
        })?;
    open.transpose(fret as i32)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fretboard {
    tuning: Tuning,
    frets: u8,
}

impl Fretboard {
    pub fn new(tuning: Tuning, frets: u8) -> Result<Self, TheoryError> {
        if frets == 0 || frets > MAX_FRETS {
            return Err(TheoryError::ConfigError(format!(
                "fret count {} is outside 1-{}",
                frets, MAX_FRETS
            )));
        }
        if let Some(open) = tuning
            .strings()
            .iter()
            .find(|open| open.value() as u32 + frets as u32 > 127)
        {
            return Err(TheoryError::ConfigError(format!(
                "open string {} with {} frets goes above pitch 127",
                open.value(),
                frets
            )));
        }
        Ok(Self { tuning, frets })
    }

    /// Six-string guitar in standard tuning with 22 frets
    pub fn standard_guitar() -> Self {
        Self {
            tuning: Tuning::standard_guitar(),
            frets: DEFAULT_FRETS,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn frets(&self) -> u8 {
        self.frets
    }

    pub fn string_count(&self) -> usize {
        self.tuning.string_count()
    }

    pub fn contains(&self, string: usize, fret: i32) -> bool {
        string < self.string_count() && (0..=self.frets as i32).contains(&fret)
    }

    pub fn pitch_at(&self, string: usize, fret: u8) -> Result<Pitch, TheoryError> {
        if fret > self.frets {
            return Err(TheoryError::PositionOutOfRange {
                string,
                fret: fret as i32,
            });
        }
        pitch_at(&self.tuning, string, fret)
    }

    /// Every position sounding `pitch_class`, ordered by string then fret.
    pub fn positions_of(&self, pitch_class: u8) -> Vec<FretPosition> {
        let mut positions = Vec::new();
        for (string, open) in self.tuning.strings().iter().enumerate() {
            for fret in 0..=self.frets {
                match open.transpose(fret as i32) {
                    Ok(pitch) if pitch.pitch_class() == pitch_class % 12 => {
                        positions.push(FretPosition { string, fret })
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        }
        positions
    }
}

impl Default for Fretboard {
    fn default() -> Self {
        Self::standard_guitar()
    }
}
