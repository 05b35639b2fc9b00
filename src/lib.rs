pub mod catalog;
pub mod chord;
pub mod config;
pub mod diatonic;
pub mod enharmonic;
pub mod error;
pub mod fretboard;
pub mod interval;
pub mod note;
pub mod scale;
pub mod translator;

pub use catalog::{generate_named_scale, ScaleCatalog, ScaleEntry};
pub use chord::{parse_chord_symbol, resolve_chord, resolve_chord_in_octave, ChordQuality, ResolvedChord};
pub use config::InstrumentConfig;
pub use diatonic::{identify_diatonic_chords, ChordSize, DiatonicCache, DiatonicChord};
pub use enharmonic::{are_equivalent, are_equivalent_names, are_equivalent_notes, are_equivalent_sets};
pub use error::*;
pub use fretboard::{Fretboard, OptimalShape, PatternMatch};
pub use interval::Interval;
pub use note::{Letter, Note, Pitch};
pub use scale::{generate_scale, Scale, ScaleFormula};
pub use translator::{note_name_to_pitch, pitch_to_note_name, ScaleContext};

/// Resolve chord text and find every built-in fingering for it, lowest
/// position first.
pub fn find_patterns(symbol: &str, fretboard: &Fretboard) -> Result<Vec<PatternMatch>, TheoryError> {
    let chord = resolve_chord(symbol)?;
    let templates = fretboard::TemplateCatalog::builtin()?;
    let matches =
        fretboard::find_pattern_matches(&chord.notes, &chord.root, fretboard, templates.templates())?;
    Ok(fretboard::rank_matches(matches))
}

/// Resolve chord text and pick a single connected fingering for it.
pub fn find_shape(symbol: &str, fretboard: &Fretboard) -> Result<OptimalShape, TheoryError> {
    let chord = resolve_chord(symbol)?;
    Ok(fretboard::find_optimal_shape(&chord.notes, fretboard))
}
