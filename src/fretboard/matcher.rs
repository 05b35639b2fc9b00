//! Template matching against a fretboard.
//!
//! For every template and every fret where the chord root sits on the
//! template's root string, the template is laid onto the neck. Notes that
//! fall off the board are dropped individually. The placement is accepted
//! only when its pitch classes are exactly the chord's pitch classes: no
//! foreign tones, and no chord tone missing.

use crate::error::TheoryError;
use crate::fretboard::lattice::Fretboard;
use crate::fretboard::template::ChordPatternTemplate;
use crate::interval::Interval;
use crate::note::{Note, Pitch};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPosition {
    pub string: usize,
    pub fret: u8,
    pub pitch: Pitch,
    pub interval: Interval,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub template_id: String,
    pub template_name: String,
    pub root_string: usize,
    pub root_fret: u8,
    pub positions: Vec<MatchedPosition>,
}

impl PatternMatch {
    pub fn min_fret(&self) -> u8 {
        self.positions.iter().map(|p| p.fret).min().unwrap_or(self.root_fret)
    }

    pub fn max_fret(&self) -> u8 {
        self.positions.iter().map(|p| p.fret).max().unwrap_or(self.root_fret)
    }

    pub fn fret_span(&self) -> u8 {
        self.max_fret() - self.min_fret()
    }

    pub fn pitch_classes(&self) -> BTreeSet<u8> {
        self.positions.iter().map(|p| p.pitch.pitch_class()).collect()
    }
}

/// Find every placement of `templates` that plays exactly `chord_notes`.
///
/// An empty result means no template fits; it is not an error.
///
/// # Errors
/// [`TheoryError::PitchOutOfRange`] when the tuning pushes a position above
/// pitch 127.
pub fn find_pattern_matches(
    chord_notes: &[Note],
    root: &Note,
    fretboard: &Fretboard,
    templates: &[ChordPatternTemplate],
) -> Result<Vec<PatternMatch>, TheoryError> {
    let required: BTreeSet<u8> = chord_notes.iter().map(|n| n.pitch_class()).collect();
    if required.is_empty() {
        return Ok(Vec::new());
    }
    let root_class = root.pitch_class();

    let mut matches = Vec::new();
    for template in templates {
        if template.root_string >= fretboard.string_count() {
            log::trace!("{}: root string not on this instrument", template.id);
            continue;
        }

        for root_fret in 0..=fretboard.frets() {
            if fretboard.pitch_at(template.root_string, root_fret)?.pitch_class() != root_class {
                continue;
            }
            if !template.accepts_root_fret(root_fret) {
                log::trace!("{}: root fret {} not allowed", template.id, root_fret);
                continue;
            }

            let positions = place_template(template, root_fret, fretboard)?;
            let found: BTreeSet<u8> = positions.iter().map(|p| p.pitch.pitch_class()).collect();
            if found != required {
                log::trace!("{}: fret {} plays the wrong tones", template.id, root_fret);
                continue;
            }

            matches.push(PatternMatch {
                template_id: template.id.clone(),
                template_name: template.name.clone(),
                root_string: template.root_string,
                root_fret,
                positions,
            });
        }
    }

    log::debug!(
        "{} pattern matches for {} tones over {} templates",
        matches.len(),
        required.len(),
        templates.len()
    );
    Ok(matches)
}

/// Absolute positions of a template rooted at `root_fret`, minus the notes
/// that land off the board.
fn place_template(
    template: &ChordPatternTemplate,
    root_fret: u8,
    fretboard: &Fretboard,
) -> Result<Vec<MatchedPosition>, TheoryError> {
    let mut positions = Vec::with_capacity(template.notes.len());
    for note in &template.notes {
        let fret = root_fret as i32 + note.fret_offset;
        if !fretboard.contains(note.string, fret) {
            continue;
        }
        let fret = fret as u8;
        positions.push(MatchedPosition {
            string: note.string,
            fret,
            pitch: fretboard.pitch_at(note.string, fret)?,
            interval: note.interval,
            label: note.label.clone(),
        });
    }
    Ok(positions)
}

/// Sort lowest position first, then tightest span, then template id.
pub fn rank_matches(mut matches: Vec<PatternMatch>) -> Vec<PatternMatch> {
    matches.sort_by(|a, b| {
        a.min_fret()
            .cmp(&b.min_fret())
            .then(a.fret_span().cmp(&b.fret_span()))
            .then_with(|| a.template_id.cmp(&b.template_id))
            .then(a.root_fret.cmp(&b.root_fret))
    });
    matches
}
