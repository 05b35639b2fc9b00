//! # Scale Generation
//!
//! Builds spelled scales from a root note and a step formula.
//!
//! ## Step Tokens
//! | token | semitones | name                 |
//! |-------|-----------|----------------------|
//! | `H`   | 1         | half step            |
//! | `W`   | 2         | whole step           |
//! | `A`   | 3         | augmented second     |
//! | `P`   | 4         | major third leap     |
//!
//! ## Spelling
//! Every degree gets its own letter. For seven-step formulas that simply means
//! one letter per step (C D E F G A B). Shorter formulas spread the seven
//! letters over their steps, picking the spread that needs the fewest
//! accidentals (C D E G A for the major pentatonic). The accidental on each
//! letter is whatever makes it sound at the accumulated chromatic target, so
//! unusual formulas may produce double or triple accidentals.

use crate::error::TheoryError;
use crate::note::{Letter, Note, Pitch, DEFAULT_OCTAVE};
use serde::Serialize;
use std::fmt;

/// Letters in one octave
const LETTER_COUNT: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Step {
    H,
    W,
    A,
    P,
}

impl Step {
    pub fn semitones(self) -> i32 {
        match self {
            Step::H => 1,
            Step::W => 2,
            Step::A => 3,
            Step::P => 4,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "H" | "h" => Some(Step::H),
            "W" | "w" => Some(Step::W),
            "A" | "a" => Some(Step::A),
            "P" | "p" => Some(Step::P),
            _ => None,
        }
    }

    pub fn token(self) -> char {
        match self {
            Step::H => 'H',
            Step::W => 'W',
            Step::A => 'A',
            Step::P => 'P',
        }
    }
}

/// Ordered step tokens, between one and seven of them
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScaleFormula(Vec<Step>);

impl ScaleFormula {
    pub fn new(steps: Vec<Step>) -> Result<Self, TheoryError> {
        if steps.is_empty() || steps.len() > LETTER_COUNT as usize {
            let text: String = steps.iter().map(|s| s.token()).collect();
            return Err(TheoryError::parse(
                &text,
                "a scale formula needs between one and seven steps",
            ));
        }
        Ok(Self(steps))
    }

    /// Parse `"W W H W W W H"`, `"W,W,H"` or packed `"WWHWWWH"`.
    pub fn parse(text: &str) -> Result<Self, TheoryError> {
        let tokens: Vec<&str> = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();

        let mut steps = Vec::new();
        for token in tokens {
            match Step::from_token(token) {
                Some(step) => steps.push(step),
                None => {
                    for c in token.chars() {
                        let step = Step::from_token(c.encode_utf8(&mut [0; 4])).ok_or_else(
                            || TheoryError::parse(text, format!("unknown step token '{}'", c)),
                        )?;
                        steps.push(step);
                    }
                }
            }
        }
        Self::new(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total span in semitones (12 for any octave-repeating scale)
    pub fn semitones(&self) -> i32 {
        self.0.iter().map(|step| step.semitones()).sum()
    }
}

impl fmt::Display for ScaleFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.0.iter().map(|s| s.token().to_string()).collect();
        write!(f, "{}", tokens.join(" "))
    }
}

/// A spelled scale. `notes` has one more entry than the formula has steps;
/// the last one is the root an octave up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scale {
    pub root: Note,
    pub formula: ScaleFormula,
    pub notes: Vec<Note>,
    pub pitches: Vec<Pitch>,
}

impl Scale {
    /// Notes without the closing octave
    pub fn degrees(&self) -> &[Note] {
        &self.notes[..self.notes.len().saturating_sub(1)]
    }

    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    pub fn degree_count(&self) -> usize {
        self.formula.len()
    }

    /// Octave-free names, including the closing root (`C D E F G A B C`)
    pub fn note_names(&self) -> Vec<String> {
        self.notes.iter().map(|note| note.name()).collect()
    }

    pub fn letters(&self) -> Vec<Letter> {
        self.notes.iter().map(|note| note.letter).collect()
    }
}

/// Generate a spelled scale.
///
/// # Example
/// ```
/// use fretwise::{generate_scale, Note};
/// use fretwise::scale::ScaleFormula;
///
/// let formula = ScaleFormula::parse("W W H W W W H").unwrap();
/// let scale = generate_scale(&Note::parse("C").unwrap(), &formula).unwrap();
/// assert_eq!(scale.note_names(), vec!["C", "D", "E", "F", "G", "A", "B", "C"]);
/// ```
///
/// # Errors
/// [`TheoryError::PitchOutOfRange`] if a degree leaves 0-127.
pub fn generate_scale(root: &Note, formula: &ScaleFormula) -> Result<Scale, TheoryError> {
    let root = root.with_octave(root.octave.unwrap_or(DEFAULT_OCTAVE));
    let root_midi = root.midi_value();

    let mut offsets = Vec::with_capacity(formula.len());
    let mut total = 0;
    for step in formula.steps() {
        total += step.semitones();
        offsets.push(total);
    }

    let letter_steps = spread_letters(&root, root_midi, &offsets);

    let mut notes = Vec::with_capacity(formula.len() + 1);
    let mut pitches = Vec::with_capacity(formula.len() + 1);
    notes.push(root);
    pitches.push(Pitch::new(root_midi)?);

    let mut letter_offset = 0;
    for (offset, letter_step) in offsets.iter().zip(&letter_steps) {
        letter_offset += letter_step;
        let midi = root_midi + offset;
        pitches.push(Pitch::new(midi)?);
        notes.push(Note::spell_midi(midi, root.letter.advance(letter_offset)));
    }

    log::debug!(
        "generated scale {} {}: {}",
        root.name(),
        formula,
        notes.iter().map(|n| n.name()).collect::<Vec<_>>().join(" ")
    );

    Ok(Scale {
        root,
        formula: formula.clone(),
        notes,
        pitches,
    })
}

/// Choose how many letters each step advances. Every step takes at least one
/// letter and all steps together take exactly seven. The cheapest spread (sum
/// of accidental magnitudes) wins; ties go to the spread whose early steps
/// are smallest.
fn spread_letters(root: &Note, root_midi: i32, offsets: &[i32]) -> Vec<i32> {
    let mut best: Option<(i32, Vec<i32>)> = None;
    let mut current = Vec::with_capacity(offsets.len());
    search_spread(root, root_midi, offsets, 0, 0, &mut current, &mut best);
    best.map(|(_, spread)| spread)
        .unwrap_or_else(|| vec![1; offsets.len()])
}

fn search_spread(
    root: &Note,
    root_midi: i32,
    offsets: &[i32],
    letters_used: i32,
    cost: i32,
    current: &mut Vec<i32>,
    best: &mut Option<(i32, Vec<i32>)>,
) {
    let depth = current.len();
    if depth == offsets.len() {
        if letters_used == LETTER_COUNT && best.as_ref().map_or(true, |(c, _)| cost < *c) {
            *best = Some((cost, current.clone()));
        }
        return;
    }

    let steps_left_after = (offsets.len() - depth - 1) as i32;
    let max_step = LETTER_COUNT - letters_used - steps_left_after;
    for step in 1..=max_step {
        let letter = root.letter.advance(letters_used + step);
        let accidental = Note::spell_midi(root_midi + offsets[depth], letter).accidental;
        current.push(step);
        search_spread(
            root,
            root_midi,
            offsets,
            letters_used + step,
            cost + accidental.abs() as i32,
            current,
            best,
        );
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(root: &str, formula: &str) -> Scale {
        generate_scale(
            &Note::parse(root).unwrap(),
            &ScaleFormula::parse(formula).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_c_ionian() {
        let s = scale("C", "W W H W W W H");
        assert_eq!(s.note_names(), vec!["C", "D", "E", "F", "G", "A", "B", "C"]);
        let values: Vec<u8> = s.pitches.iter().map(|p| p.value()).collect();
        assert_eq!(values, vec![60, 62, 64, 65, 67, 69, 71, 72]);
    }

    #[test]
    fn test_flat_keys_use_flats() {
        let s = scale("F", "W W H W W W H");
        assert_eq!(s.note_names(), vec!["F", "G", "A", "Bb", "C", "D", "E", "F"]);
        let s = scale("Eb", "W H W W H W W");
        assert_eq!(s.note_names(), vec!["Eb", "F", "Gb", "Ab", "Bb", "Cb", "Db", "Eb"]);
    }

    #[test]
    fn test_sharp_keys_use_sharps() {
        let s = scale("F#", "W W H W W W H");
        assert_eq!(s.note_names(), vec!["F#", "G#", "A#", "B", "C#", "D#", "E#", "F#"]);
    }

    #[test]
    fn test_augmented_step_keeps_one_letter_per_degree() {
        let s = scale("A", "W H W W H A H");
        assert_eq!(s.note_names(), vec!["A", "B", "C", "D", "E", "F", "G#", "A"]);
    }

    #[test]
    fn test_stacked_accidentals() {
        let s = scale("G#", "W H W W H A H");
        assert_eq!(s.note_names()[6], "F##");
        let s = scale("Gb", "H H A H W H A");
        assert!(s.note_names().iter().any(|n| n.contains("bbb")));
    }

    #[test]
    fn test_pentatonic_spreads_letters() {
        let s = scale("C", "W W A W A");
        assert_eq!(s.note_names(), vec!["C", "D", "E", "G", "A", "C"]);
        let s = scale("A", "A W W A W");
        assert_eq!(s.note_names(), vec!["A", "C", "D", "E", "G", "A"]);
        let s = scale("C", "H P W H P");
        assert_eq!(s.note_names(), vec!["C", "Db", "F", "G", "Ab", "C"]);
    }

    #[test]
    fn test_whole_tone() {
        let s = scale("C", "W W W W W W");
        assert_eq!(s.note_names(), vec!["C", "D", "E", "F#", "G#", "A#", "C"]);
    }

    #[test]
    fn test_degrees_exclude_octave() {
        let s = scale("D", "W H W W W H W");
        assert_eq!(s.degrees().len(), 7);
        assert_eq!(s.notes.len(), 8);
        assert_eq!(s.notes[7].octave, Some(5));
    }

    #[test]
    fn test_formula_parsing() {
        assert_eq!(ScaleFormula::parse("WWHWWWH").unwrap().len(), 7);
        assert_eq!(ScaleFormula::parse("W,W,H").unwrap().semitones(), 5);
        assert!(ScaleFormula::parse("W Q").is_err());
        assert!(ScaleFormula::parse("").is_err());
        assert!(ScaleFormula::parse("W W W W W W W W").is_err());
        assert_eq!(
            ScaleFormula::parse("W W H").unwrap().to_string(),
            "W W H"
        );
    }

    #[test]
    fn test_out_of_range() {
        let formula = ScaleFormula::parse("W W H W W W H").unwrap();
        assert!(matches!(
            generate_scale(&Note::parse("G9").unwrap(), &formula),
            Err(TheoryError::PitchOutOfRange { .. })
        ));
    }
}
