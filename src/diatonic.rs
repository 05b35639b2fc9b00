//! # Diatonic Chord Identification
//!
//! Names the chord built on every degree of a scale.
//!
//! ## Purpose
//! For each degree the identifier stacks alternate scale members (1-3-5 for
//! triads, 1-3-5-7 for sevenths), then looks for a chord quality of the same
//! size whose rendering from that degree has exactly the same pitch classes.
//!
//! ## Matching Stages
//! 1. every quality as written
//! 2. every quality with a forced `sus2`
//! 3. every quality with a forced `sus4`
//!
//! Suspended qualities and the flat-five triad are skipped in stages 2 and 3.
//! When no stage matches, identification fails with
//! [`TheoryError::NoDiatonicMatch`]; pentatonic and other irregular scales
//! usually end up there.
//!
//! ## Example
//! ```rust
//! use fretwise::{generate_named_scale, identify_diatonic_chords, ChordSize, Note};
//!
//! let c_major = generate_named_scale(&Note::parse("C")?, "Ionian")?;
//! let chords = identify_diatonic_chords(&c_major, ChordSize::Triad)?;
//! let symbols: Vec<&str> = chords.iter().map(|c| c.symbol.as_str()).collect();
//! assert_eq!(symbols, vec!["C", "Dm", "Em", "F", "G", "Am", "Bdim"]);
//! # Ok::<(), fretwise::TheoryError>(())
//! ```

use crate::catalog::generate_named_scale;
use crate::chord::grammar::ChordModifiers;
use crate::chord::quality::ChordQuality;
use crate::chord::resolver::{apply_modifiers, render_intervals};
use crate::enharmonic::are_equivalent_sets;
use crate::error::TheoryError;
use crate::note::{Letter, Note, DEFAULT_OCTAVE};
use crate::scale::Scale;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Forced suspensions tried after the plain qualities, in order
const RETRY_SUSPENSIONS: [u8; 2] = [2, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChordSize {
    Triad,
    Seventh,
}

impl ChordSize {
    pub fn tones(self) -> usize {
        match self {
            ChordSize::Triad => 3,
            ChordSize::Seventh => 4,
        }
    }
}

/// Chord found on one scale degree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiatonicChord {
    /// 1-based scale degree
    pub degree: usize,
    pub root: Note,
    pub quality: ChordQuality,
    /// Forced suspension (2 or 4) when only a retry stage matched
    pub suspension: Option<u8>,
    /// Chord text that resolves back to the same pitch classes (`Bdim`, `Dbmaj7sus2`)
    pub symbol: String,
    /// Scale members forming the chord, octave stripped
    pub notes: Vec<Note>,
}

/// Identify the chord on every degree of `scale`.
///
/// # Errors
/// [`TheoryError::NoDiatonicMatch`] for the first degree that matches no
/// quality at any stage.
pub fn identify_diatonic_chords(
    scale: &Scale,
    size: ChordSize,
) -> Result<Vec<DiatonicChord>, TheoryError> {
    let degrees = scale.degrees();
    let mut chords = Vec::with_capacity(degrees.len());

    for index in 0..degrees.len() {
        let tones: Vec<Note> = (0..size.tones())
            .map(|k| degrees[(index + 2 * k) % degrees.len()].without_octave())
            .collect();
        chords.push(identify_chord(index + 1, tones, size)?);
    }

    log::debug!(
        "identified {} {:?} chords in {} {}",
        chords.len(),
        size,
        scale.root.name(),
        scale.formula
    );
    Ok(chords)
}

fn identify_chord(
    degree: usize,
    tones: Vec<Note>,
    size: ChordSize,
) -> Result<DiatonicChord, TheoryError> {
    let root = tones[0];

    if let Some(quality) = matching_quality(&root, &tones, size, None)? {
        return Ok(build_chord(degree, root, quality, None, tones));
    }

    for suspension in RETRY_SUSPENSIONS {
        if let Some(quality) = matching_quality(&root, &tones, size, Some(suspension))? {
            return Ok(build_chord(degree, root, quality, Some(suspension), tones));
        }
    }

    let notes: Vec<String> = tones.iter().map(|note| note.name()).collect();
    Err(TheoryError::NoDiatonicMatch {
        degree,
        notes: notes.join(" "),
    })
}

fn matching_quality(
    root: &Note,
    tones: &[Note],
    size: ChordSize,
    suspension: Option<u8>,
) -> Result<Option<ChordQuality>, TheoryError> {
    for quality in ChordQuality::with_size(size.tones()) {
        let modifiers = match suspension {
            Some(_) if quality.is_suspended() || quality == ChordQuality::MajorFlatFive => {
                continue
            }
            Some(degree) => ChordModifiers::suspended(degree),
            None => ChordModifiers::default(),
        };

        let intervals = apply_modifiers(quality.formula(), &modifiers);
        let (notes, _) = render_intervals(root, &intervals, DEFAULT_OCTAVE)?;
        if are_equivalent_sets(&notes, tones) {
            return Ok(Some(quality));
        }
        log::trace!("{}{} does not match degree chord", root.name(), quality.symbol());
    }
    Ok(None)
}

fn build_chord(
    degree: usize,
    root: Note,
    quality: ChordQuality,
    suspension: Option<u8>,
    notes: Vec<Note>,
) -> DiatonicChord {
    let mut symbol = format!("{}{}", root.name(), quality.symbol());
    if let Some(suspension) = suspension {
        symbol.push_str(&format!("sus{}", suspension));
    }
    DiatonicChord {
        degree,
        root,
        quality,
        suspension,
        symbol,
        notes,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    scale: String,
    root: (Letter, i8),
    size: ChordSize,
}

/// Memo of identified chords keyed by scale name, root spelling and size.
///
/// Owned by the caller and safe to share between threads. A miss computes
/// outside the lock and inserts only if no other thread got there first, so
/// racing misses are harmless.
#[derive(Debug, Default)]
pub struct DiatonicCache {
    entries: RwLock<HashMap<CacheKey, Arc<Vec<DiatonicChord>>>>,
}

impl DiatonicCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chords for a built-in scale, computed on first request.
    pub fn get_or_compute(
        &self,
        scale_name: &str,
        root: &Note,
        size: ChordSize,
    ) -> Result<Arc<Vec<DiatonicChord>>, TheoryError> {
        let key = CacheKey {
            scale: scale_name.trim().to_lowercase(),
            root: (root.letter, root.accidental),
            size,
        };

        if let Some(chords) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(chords));
        }

        let scale = generate_named_scale(&root.without_octave(), scale_name)?;
        let computed = Arc::new(identify_diatonic_chords(&scale, size)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(computed)))
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::resolver::resolve_chord;
    use crate::scale::{generate_scale, ScaleFormula};

    fn chords(root: &str, scale: &str, size: ChordSize) -> Vec<DiatonicChord> {
        let scale = generate_named_scale(&Note::parse(root).unwrap(), scale).unwrap();
        identify_diatonic_chords(&scale, size).unwrap()
    }

    fn symbols(chords: &[DiatonicChord]) -> Vec<String> {
        chords.iter().map(|c| c.symbol.clone()).collect()
    }

    #[test]
    fn test_major_triads() {
        let found = chords("C", "Ionian", ChordSize::Triad);
        assert_eq!(symbols(&found), vec!["C", "Dm", "Em", "F", "G", "Am", "Bdim"]);
        assert_eq!(found[6].quality, ChordQuality::Diminished);
        assert_eq!(found[1].degree, 2);
        assert_eq!(found[1].notes[1].name(), "F");
    }

    #[test]
    fn test_major_sevenths() {
        let found = chords("C", "Ionian", ChordSize::Seventh);
        assert_eq!(
            symbols(&found),
            vec!["Cmaj7", "Dm7", "Em7", "Fmaj7", "G7", "Am7", "Bm7b5"]
        );
    }

    #[test]
    fn test_flat_key_spelling() {
        let found = chords("Eb", "Ionian", ChordSize::Triad);
        assert_eq!(
            symbols(&found),
            vec!["Eb", "Fm", "Gm", "Ab", "Bb", "Cm", "Ddim"]
        );
    }

    #[test]
    fn test_harmonic_minor_sevenths() {
        let found = chords("A", "Harmonic Minor", ChordSize::Seventh);
        assert_eq!(found[0].quality, ChordQuality::MinorMajorSeventh);
        assert_eq!(found[2].quality, ChordQuality::AugmentedMajorSeventh);
        assert_eq!(found[4].symbol, "E7");
        assert_eq!(found[6].quality, ChordQuality::DiminishedSeventh);
    }

    #[test]
    fn test_suspension_retry() {
        // B Db F: no plain triad fits, diminished with a major second does
        let found = chords("C", "Double Harmonic Major", ChordSize::Triad);
        let seventh_degree = &found[6];
        assert_eq!(seventh_degree.quality, ChordQuality::Diminished);
        assert_eq!(seventh_degree.suspension, Some(2));
        assert_eq!(seventh_degree.symbol, "Bdimsus2");
    }

    #[test]
    fn test_sus4_stage() {
        // C D E# F## G# A# B stacks C E# G# on degree 1: an augmented triad
        // with a fourth, which neither the plain nor the sus2 stage covers
        let formula = ScaleFormula::parse("W A W H W H H").unwrap();
        let scale = generate_scale(&Note::parse("C").unwrap(), &formula).unwrap();
        let degrees = scale.degrees();
        let tones = vec![
            degrees[0].without_octave(),
            degrees[2].without_octave(),
            degrees[4].without_octave(),
        ];
        let chord = identify_chord(1, tones, ChordSize::Triad).unwrap();
        assert_eq!(chord.quality, ChordQuality::Augmented);
        assert_eq!(chord.suspension, Some(4));
        assert_eq!(chord.symbol, "Caugsus4");

        let resolved = resolve_chord(&chord.symbol).unwrap();
        assert!(are_equivalent_sets(&resolved.notes, &chord.notes));
    }

    #[test]
    fn test_retries_skip_suspended_and_flat_five() {
        let tones = |names: &[&str]| -> Vec<Note> {
            names.iter().map(|n| Note::parse(n).unwrap()).collect()
        };

        // C F Gb is also a flat-five triad with a fourth; the diminished
        // quality is the one reported
        let chord = identify_chord(1, tones(&["C", "F", "Gb"]), ChordSize::Triad).unwrap();
        assert_eq!(chord.quality, ChordQuality::Diminished);
        assert_eq!(chord.suspension, Some(4));

        let chord = identify_chord(1, tones(&["C", "D", "Gb"]), ChordSize::Triad).unwrap();
        assert_eq!(chord.quality, ChordQuality::Diminished);
        assert_eq!(chord.suspension, Some(2));

        let catalog = crate::catalog::ScaleCatalog::builtin().unwrap();
        for entry in catalog.iter() {
            for root in ["C", "Eb", "F#"] {
                let scale = generate_scale(&Note::parse(root).unwrap(), &entry.formula).unwrap();
                let degrees = scale.degrees();
                for size in [ChordSize::Triad, ChordSize::Seventh] {
                    for index in 0..degrees.len() {
                        let tones: Vec<Note> = (0..size.tones())
                            .map(|k| degrees[(index + 2 * k) % degrees.len()].without_octave())
                            .collect();
                        let Ok(chord) = identify_chord(index + 1, tones, size) else {
                            continue;
                        };
                        if chord.suspension.is_some() {
                            assert!(!chord.quality.is_suspended(), "{}", chord.symbol);
                            assert_ne!(chord.quality, ChordQuality::MajorFlatFive);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_symbols_resolve_to_same_pitch_classes() {
        for scale in ["Ionian", "Harmonic Minor", "Melodic Minor", "Double Harmonic Major"] {
            for size in [ChordSize::Triad, ChordSize::Seventh] {
                for chord in chords("Db", scale, size) {
                    let resolved = resolve_chord(&chord.symbol).unwrap();
                    assert!(
                        are_equivalent_sets(&resolved.notes, &chord.notes),
                        "{} in {} {:?}",
                        chord.symbol,
                        scale,
                        size
                    );
                }
            }
        }
    }

    #[test]
    fn test_pentatonic_fails_loudly() {
        let scale = generate_named_scale(&Note::parse("C").unwrap(), "Major Pentatonic").unwrap();
        assert!(matches!(
            identify_diatonic_chords(&scale, ChordSize::Triad),
            Err(TheoryError::NoDiatonicMatch { degree: 1, .. })
        ));
    }

    #[test]
    fn test_cache_reuses_entries() {
        let cache = DiatonicCache::new();
        let root = Note::parse("G").unwrap();
        let first = cache.get_or_compute("Ionian", &root, ChordSize::Triad).unwrap();
        let second = cache.get_or_compute("ionian", &root, ChordSize::Triad).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first[4].symbol, "D");

        cache.get_or_compute("Ionian", &root, ChordSize::Seventh).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.get_or_compute("Nope", &root, ChordSize::Triad).is_err());
    }

    #[test]
    fn test_cache_across_threads() {
        let cache = Arc::new(DiatonicCache::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let root = Note::parse("F").unwrap();
                    cache
                        .get_or_compute("Dorian", &root, ChordSize::Triad)
                        .unwrap()
                        .len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 7);
        }
        assert_eq!(cache.len(), 1);
    }
}
