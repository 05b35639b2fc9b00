//! # Pitch / Note Name Translation
//!
//! Converts between MIDI pitch numbers and spelled note names.
//!
//! ## Spelling
//! Without a scale context every pitch is spelled sharp (`C#`, not `Db`).
//! A [`ScaleContext`] carries the spelling a scale gives each of its pitch
//! classes, one letter per degree, so that pitches inside the scale come out
//! the way the scale writes them (`Bb` in F major, `A#` in B major). Pitch
//! classes outside the scale fall back to flats when the scale itself is
//! spelled with flats, sharps otherwise.
//!
//! ## Example
//! ```rust
//! use fretwise::{note_name_to_pitch, pitch_to_note_name, Note, ScaleContext};
//! use fretwise::scale::ScaleFormula;
//!
//! assert_eq!(pitch_to_note_name(70, None)?.to_string(), "A#/4");
//!
//! let f_major = ScaleContext::new(&Note::parse("F")?, &ScaleFormula::parse("W W H W W W H")?)?;
//! assert_eq!(pitch_to_note_name(70, Some(&f_major))?.to_string(), "Bb/4");
//!
//! assert_eq!(note_name_to_pitch("Bb/4")?.value(), 70);
//! # Ok::<(), fretwise::TheoryError>(())
//! ```

use crate::error::TheoryError;
use crate::note::{Letter, Note, Pitch};
use crate::scale::{generate_scale, Scale, ScaleFormula};

const SHARP_SPELLINGS: [(Letter, i8); 12] = [
    (Letter::C, 0),
    (Letter::C, 1),
    (Letter::D, 0),
    (Letter::D, 1),
    (Letter::E, 0),
    (Letter::F, 0),
    (Letter::F, 1),
    (Letter::G, 0),
    (Letter::G, 1),
    (Letter::A, 0),
    (Letter::A, 1),
    (Letter::B, 0),
];

const FLAT_SPELLINGS: [(Letter, i8); 12] = [
    (Letter::C, 0),
    (Letter::D, -1),
    (Letter::D, 0),
    (Letter::E, -1),
    (Letter::E, 0),
    (Letter::F, 0),
    (Letter::G, -1),
    (Letter::G, 0),
    (Letter::A, -1),
    (Letter::A, 0),
    (Letter::B, -1),
    (Letter::B, 0),
];

/// Pitch-class spelling table derived from one spelled scale
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleContext {
    spellings: [Option<(Letter, i8)>; 12],
    prefer_flats: bool,
}

impl ScaleContext {
    /// Generate the scale from `root` and `formula`, then build the table.
    pub fn new(root: &Note, formula: &ScaleFormula) -> Result<Self, TheoryError> {
        Ok(Self::from_scale(&generate_scale(root, formula)?))
    }

    /// Build the table from an already spelled scale. The first spelling seen
    /// for a pitch class wins, so one semitone never maps to two letters.
    pub fn from_scale(scale: &Scale) -> Self {
        let mut spellings = [None; 12];
        let mut accidental_sum: i32 = 0;

        for note in scale.degrees() {
            let slot = &mut spellings[note.pitch_class() as usize];
            if slot.is_none() {
                *slot = Some((note.letter, note.accidental));
                accidental_sum += note.accidental as i32;
            }
        }

        Self {
            spellings,
            prefer_flats: accidental_sum < 0,
        }
    }

    /// Letter and accidental used for a pitch class
    pub fn spelling_for(&self, pitch_class: u8) -> (Letter, i8) {
        let index = (pitch_class % 12) as usize;
        self.spellings[index].unwrap_or(if self.prefer_flats {
            FLAT_SPELLINGS[index]
        } else {
            SHARP_SPELLINGS[index]
        })
    }

    pub fn contains(&self, pitch_class: u8) -> bool {
        self.spellings[(pitch_class % 12) as usize].is_some()
    }
}

/// Spell a MIDI pitch. Fails with `PitchOutOfRange` outside 0-127.
pub fn pitch_to_note_name(pitch: i32, context: Option<&ScaleContext>) -> Result<Note, TheoryError> {
    let pitch = Pitch::new(pitch)?;
    let (letter, accidental) = match context {
        Some(context) => context.spelling_for(pitch.pitch_class()),
        None => SHARP_SPELLINGS[pitch.pitch_class() as usize],
    };
    Ok(spell_with(pitch, letter, accidental))
}

/// Parse note text and return its pitch (octave 4 when none is written).
pub fn note_name_to_pitch(text: &str) -> Result<Pitch, TheoryError> {
    Note::parse(text)?.pitch()
}

/// Attach the octave that makes `letter` + `accidental` sound at `pitch`.
fn spell_with(pitch: Pitch, letter: Letter, accidental: i8) -> Note {
    let natural = pitch.value() as i32 - accidental as i32;
    let octave = (natural - letter.natural_pitch_class()).div_euclid(12) - 1;
    Note::new(letter, accidental).with_octave(octave as i8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sharp_spelling() {
        assert_eq!(pitch_to_note_name(60, None).unwrap().to_string(), "C/4");
        assert_eq!(pitch_to_note_name(61, None).unwrap().to_string(), "C#/4");
        assert_eq!(pitch_to_note_name(0, None).unwrap().to_string(), "C/-1");
        assert_eq!(pitch_to_note_name(127, None).unwrap().to_string(), "G/9");
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            pitch_to_note_name(128, None),
            Err(TheoryError::PitchOutOfRange { pitch: 128 })
        );
        assert!(pitch_to_note_name(-1, None).is_err());
    }

    #[test]
    fn test_round_trip_all_pitches() {
        for pitch in 0..=127 {
            let note = pitch_to_note_name(pitch, None).unwrap();
            let back = note_name_to_pitch(&note.to_string()).unwrap();
            assert_eq!(back.value() as i32, pitch, "round trip failed for {}", note);
        }
    }

    #[test]
    fn test_note_name_to_pitch() {
        assert_eq!(note_name_to_pitch("C").unwrap().value(), 60);
        assert_eq!(note_name_to_pitch("E2").unwrap().value(), 40);
        assert_eq!(note_name_to_pitch("D♭/4").unwrap().value(), 61);
        assert_eq!(note_name_to_pitch("C𝄪").unwrap().value(), 62);
        assert!(matches!(
            note_name_to_pitch("Q4"),
            Err(TheoryError::ParseError { .. })
        ));
        assert!(matches!(
            note_name_to_pitch("C$"),
            Err(TheoryError::ParseError { .. })
        ));
    }

    #[test]
    fn test_scale_context_spelling() {
        let f_major = ScaleContext::new(
            &Note::parse("F").unwrap(),
            &ScaleFormula::parse("W W H W W W H").unwrap(),
        )
        .unwrap();
        assert_eq!(pitch_to_note_name(70, Some(&f_major)).unwrap().to_string(), "Bb/4");
        // out of scale, flat-leaning context
        assert_eq!(pitch_to_note_name(63, Some(&f_major)).unwrap().to_string(), "Eb/4");

        let b_major = ScaleContext::new(
            &Note::parse("B").unwrap(),
            &ScaleFormula::parse("W W H W W W H").unwrap(),
        )
        .unwrap();
        assert_eq!(pitch_to_note_name(70, Some(&b_major)).unwrap().to_string(), "A#/4");
    }

    #[test]
    fn test_scale_context_keeps_letter_octave() {
        let c_flat_major = ScaleContext::new(
            &Note::parse("Cb").unwrap(),
            &ScaleFormula::parse("W W H W W W H").unwrap(),
        )
        .unwrap();
        // B4 sounds as Cb5
        let note = pitch_to_note_name(71, Some(&c_flat_major)).unwrap();
        assert_eq!(note.to_string(), "Cb/5");
        assert_eq!(note.pitch().unwrap().value(), 71);
    }

    #[test]
    fn test_scale_context_one_letter_per_pitch_class() {
        let c_major = ScaleContext::new(
            &Note::parse("C").unwrap(),
            &ScaleFormula::parse("W W H W W W H").unwrap(),
        )
        .unwrap();
        for pc in [0, 2, 4, 5, 7, 9, 11] {
            assert!(c_major.contains(pc));
            assert_eq!(c_major.spelling_for(pc).1, 0);
        }
        assert!(!c_major.contains(1));
    }
}
