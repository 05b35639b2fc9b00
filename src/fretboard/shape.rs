//! Single connected fingering for a chord.
//!
//! Scans center frets 3 through 12. For each center, every chord tone takes
//! its closest position within four frets of the center on a string no
//! other tone has taken. The first center that places at least
//! `min(3, tones)` notes wins. If none does, each tone takes its first free
//! position from the low string up.

use crate::fretboard::lattice::{FretPosition, Fretboard};
use crate::note::{Note, Pitch};
use serde::Serialize;
use std::ops::RangeInclusive;

const CENTER_FRETS: RangeInclusive<u8> = 3..=12;

/// Frets a hand reaches on either side of the center
const REACH: u8 = 4;

const MIN_SHAPE_TONES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeNote {
    pub string: usize,
    pub fret: u8,
    pub pitch: Pitch,
    pub tone: Note,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalShape {
    /// `None` when the fallback placement was used
    pub center_fret: Option<u8>,
    pub notes: Vec<ShapeNote>,
}

/// Pick one playable position per chord tone.
///
/// Duplicate pitch classes in `chord_notes` count once.
pub fn find_optimal_shape(chord_notes: &[Note], fretboard: &Fretboard) -> OptimalShape {
    let tones = distinct_tones(chord_notes);
    if tones.is_empty() {
        return OptimalShape {
            center_fret: None,
            notes: Vec::new(),
        };
    }
    let candidates: Vec<Vec<FretPosition>> = tones
        .iter()
        .map(|tone| fretboard.positions_of(tone.pitch_class()))
        .collect();
    let needed = MIN_SHAPE_TONES.min(tones.len());

    for center in CENTER_FRETS {
        let picked = place_around(center, &tones, &candidates);
        if picked.len() >= needed {
            log::debug!("shape centered on fret {} with {} notes", center, picked.len());
            return OptimalShape {
                center_fret: Some(center),
                notes: to_shape_notes(picked, fretboard),
            };
        }
    }

    log::debug!("no centered shape, using first free positions");
    let mut used = Vec::new();
    let mut picked = Vec::new();
    for (tone, positions) in tones.iter().zip(&candidates) {
        if let Some(position) = positions.iter().find(|p| !used.contains(&p.string)) {
            used.push(position.string);
            picked.push((*position, *tone));
        }
    }
    OptimalShape {
        center_fret: None,
        notes: to_shape_notes(picked, fretboard),
    }
}

fn distinct_tones(chord_notes: &[Note]) -> Vec<Note> {
    let mut tones: Vec<Note> = Vec::with_capacity(chord_notes.len());
    for note in chord_notes {
        if !tones.iter().any(|t| t.is_enharmonic(note)) {
            tones.push(note.without_octave());
        }
    }
    tones
}

fn place_around(
    center: u8,
    tones: &[Note],
    candidates: &[Vec<FretPosition>],
) -> Vec<(FretPosition, Note)> {
    let mut used: Vec<usize> = Vec::new();
    let mut picked = Vec::new();
    for (tone, positions) in tones.iter().zip(candidates) {
        let best = positions
            .iter()
            .filter(|p| !used.contains(&p.string) && p.fret.abs_diff(center) <= REACH)
            .min_by_key(|p| (p.fret.abs_diff(center), p.string, p.fret));
        if let Some(position) = best {
            used.push(position.string);
            picked.push((*position, *tone));
        }
    }
    picked
}

fn to_shape_notes(picked: Vec<(FretPosition, Note)>, fretboard: &Fretboard) -> Vec<ShapeNote> {
    picked
        .into_iter()
        .filter_map(|(position, tone)| {
            fretboard
                .pitch_at(position.string, position.fret)
                .ok()
                .map(|pitch| ShapeNote {
                    string: position.string,
                    fret: position.fret,
                    pitch,
                    tone,
                })
        })
        .collect()
}
