//! Chord quality table
//!
//! `ChordQuality` is the closed set of harmonic types the engine knows. Textual
//! aliases (`m7b5`, `ø`, `-7b5`, ...) map many-to-one onto it through a single
//! static table, so the rest of the engine switches on the enum, never on text.

use crate::interval::Interval;
use crate::interval::Interval::*;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    SuspendedSecond,
    SuspendedFourth,
    Power,
    MajorFlatFive,
    Sixth,
    MinorSixth,
    SixNine,
    MinorSixNine,
    DominantSeventh,
    MajorSeventh,
    MinorSeventh,
    MinorMajorSeventh,
    HalfDiminishedSeventh,
    DiminishedSeventh,
    AugmentedSeventh,
    AugmentedMajorSeventh,
    DominantSeventhFlatFive,
    SeventhSuspendedFourth,
    SeventhSuspendedSecond,
    DominantNinth,
    MajorNinth,
    MinorNinth,
    MinorMajorNinth,
    DominantEleventh,
    MajorEleventh,
    MinorEleventh,
    DominantThirteenth,
    MajorThirteenth,
    MinorThirteenth,
}

/// Alias text (after glyph normalization) -> quality.
///
/// The first alias listed for a quality is not special; the display symbol
/// comes from [`ChordQuality::symbol`].
///
/// Aliases carrying a `bN`/`#N` alteration (`b5`, `m7b5`, `-7b5`, `7#5`,
/// `maj7#5`, `7b5`) are never looked up by the chord grammar, which strips the
/// alteration first and resolves the rest (`m7b5` is `m7` with a flat five).
/// They stay listed so [`ChordQuality::aliases`] reports the full vocabulary.
const ALIASES: &[(&str, ChordQuality)] = &[
    ("", ChordQuality::Major),
    ("maj", ChordQuality::Major),
    ("major", ChordQuality::Major),
    ("M", ChordQuality::Major),
    ("m", ChordQuality::Minor),
    ("min", ChordQuality::Minor),
    ("minor", ChordQuality::Minor),
    ("mi", ChordQuality::Minor),
    ("-", ChordQuality::Minor),
    ("dim", ChordQuality::Diminished),
    ("o", ChordQuality::Diminished),
    ("aug", ChordQuality::Augmented),
    ("+", ChordQuality::Augmented),
    ("sus2", ChordQuality::SuspendedSecond),
    ("sus", ChordQuality::SuspendedFourth),
    ("sus4", ChordQuality::SuspendedFourth),
    ("5", ChordQuality::Power),
    ("b5", ChordQuality::MajorFlatFive),
    ("-5", ChordQuality::MajorFlatFive),
    ("6", ChordQuality::Sixth),
    ("maj6", ChordQuality::Sixth),
    ("M6", ChordQuality::Sixth),
    ("m6", ChordQuality::MinorSixth),
    ("min6", ChordQuality::MinorSixth),
    ("-6", ChordQuality::MinorSixth),
    ("69", ChordQuality::SixNine),
    ("6/9", ChordQuality::SixNine),
    ("m69", ChordQuality::MinorSixNine),
    ("m6/9", ChordQuality::MinorSixNine),
    ("-69", ChordQuality::MinorSixNine),
    ("7", ChordQuality::DominantSeventh),
    ("dom", ChordQuality::DominantSeventh),
    ("dom7", ChordQuality::DominantSeventh),
    ("maj7", ChordQuality::MajorSeventh),
    ("Maj7", ChordQuality::MajorSeventh),
    ("ma7", ChordQuality::MajorSeventh),
    ("M7", ChordQuality::MajorSeventh),
    ("j7", ChordQuality::MajorSeventh),
    ("D", ChordQuality::MajorSeventh),
    ("D7", ChordQuality::MajorSeventh),
    ("^", ChordQuality::MajorSeventh),
    ("^7", ChordQuality::MajorSeventh),
    ("m7", ChordQuality::MinorSeventh),
    ("min7", ChordQuality::MinorSeventh),
    ("mi7", ChordQuality::MinorSeventh),
    ("-7", ChordQuality::MinorSeventh),
    ("mMaj7", ChordQuality::MinorMajorSeventh),
    ("mmaj7", ChordQuality::MinorMajorSeventh),
    ("mM7", ChordQuality::MinorMajorSeventh),
    ("minmaj7", ChordQuality::MinorMajorSeventh),
    ("-maj7", ChordQuality::MinorMajorSeventh),
    ("-M7", ChordQuality::MinorMajorSeventh),
    ("mD7", ChordQuality::MinorMajorSeventh),
    ("ø", ChordQuality::HalfDiminishedSeventh),
    ("ø7", ChordQuality::HalfDiminishedSeventh),
    ("m7b5", ChordQuality::HalfDiminishedSeventh),
    ("-7b5", ChordQuality::HalfDiminishedSeventh),
    ("h", ChordQuality::HalfDiminishedSeventh),
    ("h7", ChordQuality::HalfDiminishedSeventh),
    ("dim7", ChordQuality::DiminishedSeventh),
    ("o7", ChordQuality::DiminishedSeventh),
    ("aug7", ChordQuality::AugmentedSeventh),
    ("+7", ChordQuality::AugmentedSeventh),
    ("7#5", ChordQuality::AugmentedSeventh),
    ("augmaj7", ChordQuality::AugmentedMajorSeventh),
    ("+maj7", ChordQuality::AugmentedMajorSeventh),
    ("+M7", ChordQuality::AugmentedMajorSeventh),
    ("maj7#5", ChordQuality::AugmentedMajorSeventh),
    ("7b5", ChordQuality::DominantSeventhFlatFive),
    ("7sus", ChordQuality::SeventhSuspendedFourth),
    ("7sus4", ChordQuality::SeventhSuspendedFourth),
    ("7sus2", ChordQuality::SeventhSuspendedSecond),
    ("9", ChordQuality::DominantNinth),
    ("dom9", ChordQuality::DominantNinth),
    ("maj9", ChordQuality::MajorNinth),
    ("M9", ChordQuality::MajorNinth),
    ("D9", ChordQuality::MajorNinth),
    ("m9", ChordQuality::MinorNinth),
    ("min9", ChordQuality::MinorNinth),
    ("-9", ChordQuality::MinorNinth),
    ("mMaj9", ChordQuality::MinorMajorNinth),
    ("mmaj9", ChordQuality::MinorMajorNinth),
    ("mM9", ChordQuality::MinorMajorNinth),
    ("11", ChordQuality::DominantEleventh),
    ("dom11", ChordQuality::DominantEleventh),
    ("maj11", ChordQuality::MajorEleventh),
    ("M11", ChordQuality::MajorEleventh),
    ("m11", ChordQuality::MinorEleventh),
    ("min11", ChordQuality::MinorEleventh),
    ("-11", ChordQuality::MinorEleventh),
    ("13", ChordQuality::DominantThirteenth),
    ("dom13", ChordQuality::DominantThirteenth),
    ("maj13", ChordQuality::MajorThirteenth),
    ("M13", ChordQuality::MajorThirteenth),
    ("m13", ChordQuality::MinorThirteenth),
    ("min13", ChordQuality::MinorThirteenth),
    ("-13", ChordQuality::MinorThirteenth),
];

static ALIAS_TABLE: Lazy<HashMap<&'static str, ChordQuality>> =
    Lazy::new(|| ALIASES.iter().copied().collect());

impl ChordQuality {
    pub const ALL: [ChordQuality; 33] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::SuspendedSecond,
        ChordQuality::SuspendedFourth,
        ChordQuality::Power,
        ChordQuality::MajorFlatFive,
        ChordQuality::Sixth,
        ChordQuality::MinorSixth,
        ChordQuality::SixNine,
        ChordQuality::MinorSixNine,
        ChordQuality::DominantSeventh,
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::MinorMajorSeventh,
        ChordQuality::HalfDiminishedSeventh,
        ChordQuality::DiminishedSeventh,
        ChordQuality::AugmentedSeventh,
        ChordQuality::AugmentedMajorSeventh,
        ChordQuality::DominantSeventhFlatFive,
        ChordQuality::SeventhSuspendedFourth,
        ChordQuality::SeventhSuspendedSecond,
        ChordQuality::DominantNinth,
        ChordQuality::MajorNinth,
        ChordQuality::MinorNinth,
        ChordQuality::MinorMajorNinth,
        ChordQuality::DominantEleventh,
        ChordQuality::MajorEleventh,
        ChordQuality::MinorEleventh,
        ChordQuality::DominantThirteenth,
        ChordQuality::MajorThirteenth,
        ChordQuality::MinorThirteenth,
    ];

    /// Resolve alias text (already glyph-normalized) to a quality
    pub fn from_alias(alias: &str) -> Option<Self> {
        ALIAS_TABLE.get(alias).copied()
    }

    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        ALIASES
            .iter()
            .filter(move |(_, quality)| *quality == self)
            .map(|(alias, _)| *alias)
    }

    /// Canonical name, e.g. "Half Diminished Seventh"
    pub fn name(self) -> &'static str {
        match self {
            ChordQuality::Major => "Major Triad",
            ChordQuality::Minor => "Minor Triad",
            ChordQuality::Diminished => "Diminished Triad",
            ChordQuality::Augmented => "Augmented Triad",
            ChordQuality::SuspendedSecond => "Suspended Second",
            ChordQuality::SuspendedFourth => "Suspended Fourth",
            ChordQuality::Power => "Power Chord",
            ChordQuality::MajorFlatFive => "Major Flat Five",
            ChordQuality::Sixth => "Major Sixth",
            ChordQuality::MinorSixth => "Minor Sixth",
            ChordQuality::SixNine => "Six Nine",
            ChordQuality::MinorSixNine => "Minor Six Nine",
            ChordQuality::DominantSeventh => "Dominant Seventh",
            ChordQuality::MajorSeventh => "Major Seventh",
            ChordQuality::MinorSeventh => "Minor Seventh",
            ChordQuality::MinorMajorSeventh => "Minor Major Seventh",
            ChordQuality::HalfDiminishedSeventh => "Half Diminished Seventh",
            ChordQuality::DiminishedSeventh => "Diminished Seventh",
            ChordQuality::AugmentedSeventh => "Augmented Seventh",
            ChordQuality::AugmentedMajorSeventh => "Augmented Major Seventh",
            ChordQuality::DominantSeventhFlatFive => "Dominant Seventh Flat Five",
            ChordQuality::SeventhSuspendedFourth => "Seventh Suspended Fourth",
            ChordQuality::SeventhSuspendedSecond => "Seventh Suspended Second",
            ChordQuality::DominantNinth => "Dominant Ninth",
            ChordQuality::MajorNinth => "Major Ninth",
            ChordQuality::MinorNinth => "Minor Ninth",
            ChordQuality::MinorMajorNinth => "Minor Major Ninth",
            ChordQuality::DominantEleventh => "Dominant Eleventh",
            ChordQuality::MajorEleventh => "Major Eleventh",
            ChordQuality::MinorEleventh => "Minor Eleventh",
            ChordQuality::DominantThirteenth => "Dominant Thirteenth",
            ChordQuality::MajorThirteenth => "Major Thirteenth",
            ChordQuality::MinorThirteenth => "Minor Thirteenth",
        }
    }

    /// Display suffix written after the root. Every symbol parses back to the
    /// same quality (or an equivalent quality plus modifiers).
    pub fn symbol(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::SuspendedSecond => "sus2",
            ChordQuality::SuspendedFourth => "sus4",
            ChordQuality::Power => "5",
            ChordQuality::MajorFlatFive => "(b5)",
            ChordQuality::Sixth => "6",
            ChordQuality::MinorSixth => "m6",
            ChordQuality::SixNine => "6/9",
            ChordQuality::MinorSixNine => "m6/9",
            ChordQuality::DominantSeventh => "7",
            ChordQuality::MajorSeventh => "maj7",
            ChordQuality::MinorSeventh => "m7",
            ChordQuality::MinorMajorSeventh => "mMaj7",
            ChordQuality::HalfDiminishedSeventh => "m7b5",
            ChordQuality::DiminishedSeventh => "dim7",
            ChordQuality::AugmentedSeventh => "aug7",
            ChordQuality::AugmentedMajorSeventh => "maj7#5",
            ChordQuality::DominantSeventhFlatFive => "7b5",
            ChordQuality::SeventhSuspendedFourth => "7sus4",
            ChordQuality::SeventhSuspendedSecond => "7sus2",
            ChordQuality::DominantNinth => "9",
            ChordQuality::MajorNinth => "maj9",
            ChordQuality::MinorNinth => "m9",
            ChordQuality::MinorMajorNinth => "mMaj9",
            ChordQuality::DominantEleventh => "11",
            ChordQuality::MajorEleventh => "maj11",
            ChordQuality::MinorEleventh => "m11",
            ChordQuality::DominantThirteenth => "13",
            ChordQuality::MajorThirteenth => "maj13",
            ChordQuality::MinorThirteenth => "m13",
        }
    }

    /// Interval formula from the root
    pub fn formula(self) -> &'static [Interval] {
        match self {
            ChordQuality::Major => &[PerfectUnison, MajorThird, PerfectFifth],
            ChordQuality::Minor => &[PerfectUnison, MinorThird, PerfectFifth],
            ChordQuality::Diminished => &[PerfectUnison, MinorThird, DiminishedFifth],
            ChordQuality::Augmented => &[PerfectUnison, MajorThird, AugmentedFifth],
            ChordQuality::SuspendedSecond => &[PerfectUnison, MajorSecond, PerfectFifth],
            ChordQuality::SuspendedFourth => &[PerfectUnison, PerfectFourth, PerfectFifth],
            ChordQuality::Power => &[PerfectUnison, PerfectFifth],
            ChordQuality::MajorFlatFive => &[PerfectUnison, MajorThird, DiminishedFifth],
            ChordQuality::Sixth => &[PerfectUnison, MajorThird, PerfectFifth, MajorSixth],
            ChordQuality::MinorSixth => &[PerfectUnison, MinorThird, PerfectFifth, MajorSixth],
            ChordQuality::SixNine => &[
                PerfectUnison,
                MajorThird,
                PerfectFifth,
                MajorSixth,
                MajorNinth,
            ],
            ChordQuality::MinorSixNine => &[
                PerfectUnison,
                MinorThird,
                PerfectFifth,
                MajorSixth,
                MajorNinth,
            ],
            ChordQuality::DominantSeventh => {
                &[PerfectUnison, MajorThird, PerfectFifth, MinorSeventh]
            }
            ChordQuality::MajorSeventh => &[PerfectUnison, MajorThird, PerfectFifth, MajorSeventh],
            ChordQuality::MinorSeventh => &[PerfectUnison, MinorThird, PerfectFifth, MinorSeventh],
            ChordQuality::MinorMajorSeventh => {
                &[PerfectUnison, MinorThird, PerfectFifth, MajorSeventh]
            }
            ChordQuality::HalfDiminishedSeventh => {
                &[PerfectUnison, MinorThird, DiminishedFifth, MinorSeventh]
            }
            ChordQuality::DiminishedSeventh => {
                &[PerfectUnison, MinorThird, DiminishedFifth, DiminishedSeventh]
            }
            ChordQuality::AugmentedSeventh => {
                &[PerfectUnison, MajorThird, AugmentedFifth, MinorSeventh]
            }
            ChordQuality::AugmentedMajorSeventh => {
                &[PerfectUnison, MajorThird, AugmentedFifth, MajorSeventh]
            }
            ChordQuality::DominantSeventhFlatFive => {
                &[PerfectUnison, MajorThird, DiminishedFifth, MinorSeventh]
            }
            ChordQuality::SeventhSuspendedFourth => {
                &[PerfectUnison, PerfectFourth, PerfectFifth, MinorSeventh]
            }
            ChordQuality::SeventhSuspendedSecond => {
                &[PerfectUnison, MajorSecond, PerfectFifth, MinorSeventh]
            }
            ChordQuality::DominantNinth => &[
                PerfectUnison,
                MajorThird,
                PerfectFifth,
                MinorSeventh,
                MajorNinth,
            ],
            ChordQuality::MajorNinth => &[
                PerfectUnison,
                MajorThird,
                PerfectFifth,
                MajorSeventh,
                MajorNinth,
            ],
            ChordQuality::MinorNinth => &[
                PerfectUnison,
                MinorThird,
                PerfectFifth,
                MinorSeventh,
                MajorNinth,
            ],
            ChordQuality::MinorMajorNinth => &[
                PerfectUnison,
                MinorThird,
                PerfectFifth,
                MajorSeventh,
                MajorNinth,
            ],
            ChordQuality::DominantEleventh => &[
                PerfectUnison,
                MajorThird,
                PerfectFifth,
                MinorSeventh,
                MajorNinth,
                PerfectEleventh,
            ],
            ChordQuality::MajorEleventh => &[
                PerfectUnison,
                MajorThird,
                PerfectFifth,
                MajorSeventh,
                MajorNinth,
                PerfectEleventh,
            ],
            ChordQuality::MinorEleventh => &[
                PerfectUnison,
                MinorThird,
                PerfectFifth,
                MinorSeventh,
                MajorNinth,
                PerfectEleventh,
            ],
            ChordQuality::DominantThirteenth => &[
                PerfectUnison,
                MajorThird,
                PerfectFifth,
                MinorSeventh,
                MajorNinth,
                PerfectEleventh,
                MajorThirteenth,
            ],
            ChordQuality::MajorThirteenth => &[
                PerfectUnison,
                MajorThird,
                PerfectFifth,
                MajorSeventh,
                MajorNinth,
                PerfectEleventh,
                MajorThirteenth,
            ],
            ChordQuality::MinorThirteenth => &[
                PerfectUnison,
                MinorThird,
                PerfectFifth,
                MinorSeventh,
                MajorNinth,
                PerfectEleventh,
                MajorThirteenth,
            ],
        }
    }

    pub fn is_suspended(self) -> bool {
        matches!(
            self,
            ChordQuality::SuspendedSecond
                | ChordQuality::SuspendedFourth
                | ChordQuality::SeventhSuspendedFourth
                | ChordQuality::SeventhSuspendedSecond
        )
    }

    /// Qualities with exactly `size` tones, in table order
    pub fn with_size(size: usize) -> impl Iterator<Item = ChordQuality> {
        Self::ALL
            .into_iter()
            .filter(move |quality| quality.formula().len() == size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_aliases_are_unique() {
        let mut seen = HashSet::new();
        for (alias, _) in ALIASES {
            assert!(seen.insert(*alias), "duplicate alias '{}'", alias);
        }
    }

    #[test]
    fn test_every_quality_has_an_alias() {
        for quality in ChordQuality::ALL {
            assert!(
                quality.aliases().next().is_some(),
                "{:?} has no alias",
                quality
            );
        }
    }

    #[test]
    fn test_half_diminished_aliases() {
        for alias in ["m7b5", "ø", "-7b5", "h7"] {
            assert_eq!(
                ChordQuality::from_alias(alias),
                Some(ChordQuality::HalfDiminishedSeventh)
            );
        }
    }

    #[test]
    fn test_unknown_alias() {
        assert_eq!(ChordQuality::from_alias("xyz"), None);
        assert_eq!(ChordQuality::from_alias("MAJ7"), None);
    }

    #[test]
    fn test_formulas_start_at_root_and_ascend() {
        for quality in ChordQuality::ALL {
            let formula = quality.formula();
            assert_eq!(formula[0], PerfectUnison, "{:?}", quality);
            for pair in formula.windows(2) {
                assert!(
                    pair[0].semitones() < pair[1].semitones(),
                    "{:?} formula is not ascending",
                    quality
                );
            }
        }
    }

    #[test]
    fn test_size_tables() {
        let triads: Vec<_> = ChordQuality::with_size(3).collect();
        assert_eq!(triads[0], ChordQuality::Major);
        assert!(triads.contains(&ChordQuality::Diminished));
        assert!(!triads.contains(&ChordQuality::Power));

        let sevenths: Vec<_> = ChordQuality::with_size(4).collect();
        assert!(sevenths.contains(&ChordQuality::HalfDiminishedSeventh));
        assert!(sevenths.contains(&ChordQuality::MinorSixth));
        assert!(!sevenths.contains(&ChordQuality::Major));
    }
}
