//! Chord resolution
//!
//! Applies the parsed modifiers to the quality's interval formula and renders
//! the result as spelled, octave-qualified notes.
//!
//! ## Modifier Application
//! The formula is loaded into an ordered map keyed by chord degree
//! (1, 3, 5, 7, 9, ...). The passes then write into that map in a fixed order:
//!
//! | pass        | effect                                               |
//! |-------------|------------------------------------------------------|
//! | suspensions | degree 3 := M2 (sus2) or P4 (sus4), last one wins     |
//! | flats       | 3 m3, 5 d5, 7 m7, 9 m9, 11 P11, 13 M13                |
//! | sharps      | 3 A3, 5 A5, 7 A7, 9 A9, 11 A11, 13 A13                |
//! | added tones | 2 M2, 4 P4, 6 M6, 7 M7, 9 M9, 11 P11, 13 M13          |
//! | omissions   | drop every interval whose degree number matches      |
//!
//! Flattening the map in degree order gives the final interval list.

use crate::chord::grammar::{parse_chord_symbol, ChordModifiers, ParsedChordToken};
use crate::chord::quality::ChordQuality;
use crate::error::TheoryError;
use crate::interval::Interval;
use crate::note::{Note, Pitch, DEFAULT_OCTAVE};
use crate::translator::pitch_to_note_name;
use serde::Serialize;
use std::collections::BTreeMap;

/// Degree slot that holds the third (or the suspension replacing it)
const THIRD_SLOT: u8 = 3;

/// A fully resolved chord. Built once per evaluation and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedChord {
    pub symbol: String,
    pub root: Note,
    pub quality: ChordQuality,
    pub intervals: Vec<Interval>,
    pub notes: Vec<Note>,
    pub pitches: Vec<Pitch>,
    pub root_pitch: Pitch,
    pub bass: Option<Note>,
}

impl ResolvedChord {
    /// Octave-qualified note names, e.g. `["C/4", "E/4", "G/4"]`
    pub fn note_names(&self) -> Vec<String> {
        self.notes.iter().map(|note| note.to_string()).collect()
    }

    /// Distinct pitch classes, ascending
    pub fn pitch_classes(&self) -> Vec<u8> {
        let mut classes: Vec<u8> = self.notes.iter().map(|note| note.pitch_class()).collect();
        classes.sort_unstable();
        classes.dedup();
        classes
    }
}

/// Resolve chord text with the root in octave 4.
///
/// # Example
/// ```
/// use fretwise::resolve_chord;
///
/// let chord = resolve_chord("C").unwrap();
/// assert_eq!(chord.note_names(), vec!["C/4", "E/4", "G/4"]);
/// assert_eq!(chord.root_pitch.value(), 60);
/// ```
pub fn resolve_chord(text: &str) -> Result<ResolvedChord, TheoryError> {
    resolve_chord_in_octave(text, DEFAULT_OCTAVE)
}

/// Resolve chord text with the root placed in `octave`.
pub fn resolve_chord_in_octave(text: &str, octave: i8) -> Result<ResolvedChord, TheoryError> {
    let token = parse_chord_symbol(text)?;
    resolve_parsed(text.trim(), &token, octave)
}

/// Build a [`ResolvedChord`] from an already parsed token.
pub fn resolve_parsed(
    symbol: &str,
    token: &ParsedChordToken,
    octave: i8,
) -> Result<ResolvedChord, TheoryError> {
    let intervals = apply_modifiers(token.quality.formula(), &token.modifiers);
    let (mut notes, mut pitches) = render_intervals(&token.root, &intervals, octave)?;
    let root_pitch = token.root.with_octave(octave).pitch()?;

    // Bass is appended, not moved below the root
    if let Some(bass) = token.bass {
        let bass = bass.with_octave(bass.octave.unwrap_or(octave));
        pitches.push(bass.pitch()?);
        notes.push(bass);
    }

    Ok(ResolvedChord {
        symbol: symbol.to_string(),
        root: token.root,
        quality: token.quality,
        intervals,
        notes,
        pitches,
        root_pitch,
        bass: token.bass,
    })
}

/// Apply suspension, flat, sharp, add and omit requests to a formula.
///
/// The input formula is never modified; a new list is returned.
pub fn apply_modifiers(formula: &[Interval], modifiers: &ChordModifiers) -> Vec<Interval> {
    let mut slots: BTreeMap<u8, Interval> = formula
        .iter()
        .map(|interval| (interval.degree(), *interval))
        .collect();

    for suspension in &modifiers.suspensions {
        let interval = if *suspension == 2 {
            Interval::MajorSecond
        } else {
            Interval::PerfectFourth
        };
        slots.insert(THIRD_SLOT, interval);
    }

    for degree in &modifiers.flats {
        if let Some(interval) = flattened(*degree) {
            slots.insert(*degree, interval);
        }
    }

    for degree in &modifiers.sharps {
        if let Some(interval) = sharpened(*degree) {
            slots.insert(*degree, interval);
        }
    }

    for degree in &modifiers.added {
        if let Some(interval) = added(*degree) {
            slots.insert(*degree, interval);
        }
    }

    // any label carrying the digits goes: no3 also drops M13, no1 drops P11
    for degree in &modifiers.omitted {
        let digits = degree.to_string();
        slots.retain(|_, interval| !interval.label().contains(digits.as_str()));
    }

    slots.into_values().collect()
}

fn flattened(degree: u8) -> Option<Interval> {
    match degree {
        3 => Some(Interval::MinorThird),
        5 => Some(Interval::DiminishedFifth),
        7 => Some(Interval::MinorSeventh),
        9 => Some(Interval::MinorNinth),
        11 => Some(Interval::PerfectEleventh),
        13 => Some(Interval::MajorThirteenth),
        _ => None,
    }
}

fn sharpened(degree: u8) -> Option<Interval> {
    match degree {
        3 => Some(Interval::AugmentedThird),
        5 => Some(Interval::AugmentedFifth),
        7 => Some(Interval::AugmentedSeventh),
        9 => Some(Interval::AugmentedNinth),
        11 => Some(Interval::AugmentedEleventh),
        13 => Some(Interval::AugmentedThirteenth),
        _ => None,
    }
}

fn added(degree: u8) -> Option<Interval> {
    match degree {
        2 => Some(Interval::MajorSecond),
        4 => Some(Interval::PerfectFourth),
        6 => Some(Interval::MajorSixth),
        7 => Some(Interval::MajorSeventh),
        9 => Some(Interval::MajorNinth),
        11 => Some(Interval::PerfectEleventh),
        13 => Some(Interval::MajorThirteenth),
        _ => None,
    }
}

/// Render intervals above `root` (placed in `octave`) as spelled notes.
///
/// Each tone is spelled on the letter its degree implies (a third above C is
/// some kind of E). Spellings that would need more than a double accidental
/// fall back to the default sharp spelling.
///
/// # Errors
/// [`TheoryError::PitchOutOfRange`] if the root or any tone leaves 0-127.
pub fn render_intervals(
    root: &Note,
    intervals: &[Interval],
    octave: i8,
) -> Result<(Vec<Note>, Vec<Pitch>), TheoryError> {
    let root_midi = root.with_octave(octave).midi_value();
    Pitch::new(root_midi)?;

    let mut notes = Vec::with_capacity(intervals.len());
    let mut pitches = Vec::with_capacity(intervals.len());

    for interval in intervals {
        let midi = root_midi + interval.semitones() as i32;
        let pitch = Pitch::new(midi)?;
        let letter = root.letter.advance(interval.degree() as i32 - 1);
        let spelled = Note::spell_midi(midi, letter);
        let note = if spelled.accidental.abs() <= 2 {
            spelled
        } else {
            pitch_to_note_name(midi, None)?
        };
        notes.push(note);
        pitches.push(pitch);
    }

    Ok((notes, pitches))
}
