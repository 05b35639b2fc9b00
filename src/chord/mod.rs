//! # Chord Module
//!
//! Turns chord text such as `Am7/G` or `C7(b9)` into spelled notes.
//!
//! ## Sub-modules
//! - `grammar` - extraction passes that split chord text into root, quality
//!   alias, modifiers and bass note
//! - `quality` - closed set of chord qualities, their interval formulas and
//!   the alias table
//! - `resolver` - applies modifiers to the formula and renders notes
//!
//! ## Key Types
//! - [`ParsedChordToken`] - output of the grammar, consumed by the resolver
//! - [`ChordQuality`] - canonical chord identity
//! - [`ResolvedChord`] - final intervals, notes and pitches
//!
//! ## Example
//! ```rust
//! use fretwise::chord::resolve_chord;
//!
//! let chord = resolve_chord("Gsus4")?;
//! assert_eq!(chord.note_names(), vec!["G/4", "C/5", "D/5"]);
//! # Ok::<(), fretwise::TheoryError>(())
//! ```

pub mod grammar;
pub mod quality;
pub mod resolver;

pub use grammar::{parse_chord_symbol, ChordModifiers, ParsedChordToken};
pub use quality::ChordQuality;
pub use resolver::{
    apply_modifiers, render_intervals, resolve_chord, resolve_chord_in_octave, resolve_parsed,
    ResolvedChord,
};
