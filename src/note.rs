//! # Notes and Pitches
//!
//! Value types shared by every other module.
//!
//! ## Type Hierarchy
//! ```text
//! Pitch  (checked u8, 0-127, C4 = 60)
//! Note
//!   ├── letter: Letter (C-B)
//!   ├── accidental: i8 (+1 = #, -1 = b, any magnitude)
//!   └── octave: Option<i8> (scientific pitch notation, follows the letter)
//! ```
//!
//! ## Text Format
//! - Letter in either case: `C`, `c`
//! - Accidental run: `#`, `♯`, `x`, `𝄪`, `b`, `♭`, `𝄫`, `♮`
//! - Optional octave, bare or after a slash: `C#4`, `C#/4`, `B-1`
//!
//! Octave-qualified notes print as `C#/4`, octave-less notes as `C#`.
//!
//! ### Octave follows the letter
//! `Cb/5` is pitch 71 and `B#/4` is pitch 72, just like in written music.

use crate::error::TheoryError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Highest representable pitch.
pub const MAX_PITCH: i32 = 127;

/// Octave assumed when a note is written without one.
pub const DEFAULT_OCTAVE: i8 = 4;

/// Note letters C through B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum Letter {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// Position within C D E F G A B (C = 0)
    pub fn index(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Semitone offset of the natural note from C
    pub fn natural_pitch_class(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Move up (or down, for negative `steps`) the letter sequence, wrapping B -> C.
    pub fn advance(self, steps: i32) -> Self {
        Self::ALL[(self.index() + steps).rem_euclid(7) as usize]
    }
}

/// Semitone value of one accidental glyph. `♮` is a valid glyph worth nothing.
pub(crate) fn accidental_value(c: char) -> Option<i8> {
    match c {
        '#' | '♯' => Some(1),
        'x' | '𝄪' => Some(2),
        'b' | '♭' => Some(-1),
        '𝄫' => Some(-2),
        '♮' => Some(0),
        _ => None,
    }
}

/// ASCII rendering of an accidental offset: `#`, `##`, `b`, `bb`, `###`, ...
pub fn accidental_symbol(accidental: i8) -> String {
    if accidental >= 0 {
        "#".repeat(accidental as usize)
    } else {
        "b".repeat(accidental.unsigned_abs() as usize)
    }
}

/// Integer semitone identity, always within 0-127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pitch(u8);

impl Pitch {
    pub fn new(value: i32) -> Result<Self, TheoryError> {
        if (0..=MAX_PITCH).contains(&value) {
            Ok(Pitch(value as u8))
        } else {
            Err(TheoryError::PitchOutOfRange { pitch: value })
        }
    }

    /// For compile-time constants already known to be in range.
    pub(crate) const fn from_raw(value: u8) -> Self {
        Pitch(value & 0x7F)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn pitch_class(self) -> u8 {
        self.0 % 12
    }

    pub fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    pub fn transpose(self, semitones: i32) -> Result<Self, TheoryError> {
        Pitch::new(self.0 as i32 + semitones)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A spelled note. Immutable value; every transformation returns a new Note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Note {
    pub letter: Letter,
    pub accidental: i8,
    pub octave: Option<i8>,
}

impl Note {
    pub fn new(letter: Letter, accidental: i8) -> Self {
        Self {
            letter,
            accidental,
            octave: None,
        }
    }

    pub fn with_octave(self, octave: i8) -> Self {
        Self {
            octave: Some(octave),
            ..self
        }
    }

    pub fn without_octave(self) -> Self {
        Self {
            octave: None,
            ..self
        }
    }

    /// Parse note text such as `C`, `f#`, `Eb/3`, `B♭2` or `C𝄪/4`.
    pub fn parse(text: &str) -> Result<Self, TheoryError> {
        let trimmed = text.trim();
        let mut chars = trimmed.char_indices().peekable();

        let letter = match chars.next() {
            Some((_, c)) => Letter::from_char(c).ok_or_else(|| {
                TheoryError::parse(text, format!("unrecognized note letter '{}'", c))
            })?,
            None => return Err(TheoryError::parse(text, "empty note name")),
        };

        let mut accidental: i8 = 0;
        while let Some(&(_, c)) = chars.peek() {
            match accidental_value(c) {
                Some(value) => {
                    accidental = accidental.checked_add(value).ok_or_else(|| {
                        TheoryError::parse(text, "accidental run is too long")
                    })?;
                    chars.next();
                }
                None => break,
            }
        }

        let rest = match chars.peek() {
            Some(&(idx, _)) => &trimmed[idx..],
            None => "",
        };
        let octave_text = rest.strip_prefix('/').unwrap_or(rest);
        if rest.is_empty() {
            return Ok(Self::new(letter, accidental));
        }

        let is_octave = !octave_text.is_empty()
            && octave_text
                .strip_prefix('-')
                .unwrap_or(octave_text)
                .chars()
                .all(|c| c.is_ascii_digit())
            && octave_text != "-";
        if !is_octave {
            return Err(TheoryError::parse(
                text,
                format!("cannot interpret accidental or octave '{}'", rest),
            ));
        }
        let octave: i8 = octave_text
            .parse()
            .map_err(|_| TheoryError::parse(text, format!("invalid octave '{}'", octave_text)))?;

        Ok(Self::new(letter, accidental).with_octave(octave))
    }

    /// Pitch class 0-11, octave ignored
    pub fn pitch_class(&self) -> u8 {
        (self.letter.natural_pitch_class() + self.accidental as i32).rem_euclid(12) as u8
    }

    /// Unchecked MIDI number, using the default octave when none is set
    pub fn midi_value(&self) -> i32 {
        let octave = self.octave.unwrap_or(DEFAULT_OCTAVE) as i32;
        (octave + 1) * 12 + self.letter.natural_pitch_class() + self.accidental as i32
    }

    pub fn pitch(&self) -> Result<Pitch, TheoryError> {
        Pitch::new(self.midi_value())
    }

    /// Letter plus accidentals, no octave (`C#`, `Bb`)
    pub fn name(&self) -> String {
        format!("{}{}", self.letter.as_char(), accidental_symbol(self.accidental))
    }

    pub fn is_enharmonic(&self, other: &Note) -> bool {
        self.pitch_class() == other.pitch_class()
    }

    /// Spell a MIDI number with a fixed letter, using the accidental of
    /// smallest magnitude. The octave is chosen to match the letter.
    pub fn spell_midi(midi: i32, letter: Letter) -> Self {
        let mut offset = (midi - letter.natural_pitch_class()).rem_euclid(12);
        if offset > 6 {
            offset -= 12;
        }
        let octave = (midi - offset - letter.natural_pitch_class()).div_euclid(12) - 1;
        Self::new(letter, offset as i8).with_octave(octave as i8)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.octave {
            Some(octave) => write!(f, "{}/{}", self.name(), octave),
            None => write!(f, "{}", self.name()),
        }
    }
}

impl FromStr for Note {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s)
    }
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_letters() {
        let c = Note::parse("C").unwrap();
        assert_eq!(c.letter, Letter::C);
        assert_eq!(c.accidental, 0);
        assert_eq!(c.octave, None);

        let g = Note::parse("g").unwrap();
        assert_eq!(g.letter, Letter::G);
    }

    #[test]
    fn test_parse_accidental_glyphs() {
        assert_eq!(Note::parse("C#").unwrap().accidental, 1);
        assert_eq!(Note::parse("C♯").unwrap().accidental, 1);
        assert_eq!(Note::parse("Db").unwrap().accidental, -1);
        assert_eq!(Note::parse("D♭").unwrap().accidental, -1);
        assert_eq!(Note::parse("F##").unwrap().accidental, 2);
        assert_eq!(Note::parse("Fx").unwrap().accidental, 2);
        assert_eq!(Note::parse("F𝄪").unwrap().accidental, 2);
        assert_eq!(Note::parse("Bbb").unwrap().accidental, -2);
        assert_eq!(Note::parse("B𝄫").unwrap().accidental, -2);
        assert_eq!(Note::parse("E♮").unwrap().accidental, 0);
    }

    #[test]
    fn test_parse_octaves() {
        assert_eq!(Note::parse("C#4").unwrap().octave, Some(4));
        assert_eq!(Note::parse("C#/4").unwrap().octave, Some(4));
        assert_eq!(Note::parse("B/-1").unwrap().octave, Some(-1));
        assert_eq!(Note::parse("A0").unwrap().octave, Some(0));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Note::parse("H"),
            Err(TheoryError::ParseError { .. })
        ));
        assert!(Note::parse("").is_err());
        assert!(Note::parse("C?").is_err());
        assert!(Note::parse("C/").is_err());
        assert!(Note::parse("C#m").is_err());
    }

    #[test]
    fn test_midi_values() {
        assert_eq!(Note::parse("C").unwrap().midi_value(), 60);
        assert_eq!(Note::parse("C/4").unwrap().pitch().unwrap().value(), 60);
        assert_eq!(Note::parse("A4").unwrap().midi_value(), 69);
        assert_eq!(Note::parse("E2").unwrap().midi_value(), 40);
        assert_eq!(Note::parse("Cb/5").unwrap().midi_value(), 71);
        assert_eq!(Note::parse("B#/4").unwrap().midi_value(), 72);
        assert_eq!(Note::parse("C/-1").unwrap().midi_value(), 0);
    }

    #[test]
    fn test_pitch_range() {
        assert!(Pitch::new(0).is_ok());
        assert!(Pitch::new(127).is_ok());
        assert_eq!(
            Pitch::new(128),
            Err(TheoryError::PitchOutOfRange { pitch: 128 })
        );
        assert!(Pitch::new(-1).is_err());
        assert!(Note::parse("G#/9").unwrap().pitch().is_err());
    }

    #[test]
    fn test_pitch_accessors() {
        let p = Pitch::new(61).unwrap();
        assert_eq!(p.pitch_class(), 1);
        assert_eq!(p.octave(), 4);
        assert_eq!(p.transpose(12).unwrap().value(), 73);
        assert!(p.transpose(100).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Note::parse("c#4").unwrap().to_string(), "C#/4");
        assert_eq!(Note::parse("Eb").unwrap().to_string(), "Eb");
        assert_eq!(Note::parse("F𝄪/3").unwrap().to_string(), "F##/3");
        assert_eq!(Note::new(Letter::G, 3).to_string(), "G###");
    }

    #[test]
    fn test_spell_midi() {
        let note = Note::spell_midi(70, Letter::B);
        assert_eq!(note.to_string(), "Bb/4");
        let note = Note::spell_midi(70, Letter::A);
        assert_eq!(note.to_string(), "A#/4");
        let note = Note::spell_midi(72, Letter::B);
        assert_eq!(note.to_string(), "B#/4");
        let note = Note::spell_midi(71, Letter::C);
        assert_eq!(note.to_string(), "Cb/5");
    }

    #[test]
    fn test_letter_advance_wraps() {
        assert_eq!(Letter::B.advance(1), Letter::C);
        assert_eq!(Letter::C.advance(-1), Letter::B);
        assert_eq!(Letter::E.advance(14), Letter::E);
    }
}
