//! # Fretboard
//!
//! Chord fingerings on fretted instruments.
//!
//! ## Modules
//! - `lattice` - tuning, fret count and the string/fret → pitch function
//! - `template` - movable chord shapes loaded from `data/patterns.yaml`
//! - `matcher` - lays templates onto the neck and keeps exact matches
//! - `shape` - single connected fingering around a center fret
//!
//! ## Example
//! ```rust
//! use fretwise::fretboard::{find_pattern_matches, rank_matches, Fretboard, TemplateCatalog};
//! use fretwise::resolve_chord;
//!
//! let chord = resolve_chord("C")?;
//! let matches = find_pattern_matches(
//!     &chord.notes,
//!     &chord.root,
//!     &Fretboard::standard_guitar(),
//!     TemplateCatalog::builtin()?.templates(),
//! )?;
//! let best = &rank_matches(matches)[0];
//! assert_eq!(best.template_id, "c-major");
//! # Ok::<(), fretwise::TheoryError>(())
//! ```

pub mod lattice;
pub mod matcher;
pub mod shape;
pub mod template;

pub use lattice::{pitch_at, FretPosition, Fretboard, Tuning, DEFAULT_FRETS, MAX_FRETS};
pub use matcher::{find_pattern_matches, rank_matches, MatchedPosition, PatternMatch};
pub use shape::{find_optimal_shape, OptimalShape, ShapeNote};
pub use template::{ChordPatternTemplate, TemplateCatalog, TemplateNote};
