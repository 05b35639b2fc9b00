//! Interval vocabulary.
//!
//! A closed set of labelled semitone distances from a chord or scale root.
//! Labels follow the usual shorthand: `P` perfect, `M` major, `m` minor,
//! `A` augmented, `d` diminished, followed by the degree number.

use crate::error::TheoryError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Interval {
    PerfectUnison,
    MinorSecond,
    MajorSecond,
    AugmentedSecond,
    MinorThird,
    MajorThird,
    AugmentedThird,
    DiminishedFourth,
    PerfectFourth,
    AugmentedFourth,
    DiminishedFifth,
    PerfectFifth,
    AugmentedFifth,
    MinorSixth,
    MajorSixth,
    AugmentedSixth,
    DiminishedSeventh,
    MinorSeventh,
    MajorSeventh,
    AugmentedSeventh,
    PerfectOctave,
    MinorNinth,
    MajorNinth,
    AugmentedNinth,
    PerfectEleventh,
    AugmentedEleventh,
    MinorThirteenth,
    MajorThirteenth,
    AugmentedThirteenth,
}

/// (interval, label, degree, semitones)
const INTERVAL_TABLE: [(Interval, &str, u8, u8); 29] = [
    (Interval::PerfectUnison, "P1", 1, 0),
    (Interval::MinorSecond, "m2", 2, 1),
    (Interval::MajorSecond, "M2", 2, 2),
    (Interval::AugmentedSecond, "A2", 2, 3),
    (Interval::MinorThird, "m3", 3, 3),
    (Interval::MajorThird, "M3", 3, 4),
    (Interval::AugmentedThird, "A3", 3, 5),
    (Interval::DiminishedFourth, "d4", 4, 4),
    (Interval::PerfectFourth, "P4", 4, 5),
    (Interval::AugmentedFourth, "A4", 4, 6),
    (Interval::DiminishedFifth, "d5", 5, 6),
    (Interval::PerfectFifth, "P5", 5, 7),
    (Interval::AugmentedFifth, "A5", 5, 8),
    (Interval::MinorSixth, "m6", 6, 8),
    (Interval::MajorSixth, "M6", 6, 9),
    (Interval::AugmentedSixth, "A6", 6, 10),
    (Interval::DiminishedSeventh, "d7", 7, 9),
    (Interval::MinorSeventh, "m7", 7, 10),
    (Interval::MajorSeventh, "M7", 7, 11),
    (Interval::AugmentedSeventh, "A7", 7, 12),
    (Interval::PerfectOctave, "P8", 8, 12),
    (Interval::MinorNinth, "m9", 9, 13),
    (Interval::MajorNinth, "M9", 9, 14),
    (Interval::AugmentedNinth, "A9", 9, 15),
    (Interval::PerfectEleventh, "P11", 11, 17),
    (Interval::AugmentedEleventh, "A11", 11, 18),
    (Interval::MinorThirteenth, "m13", 13, 20),
    (Interval::MajorThirteenth, "M13", 13, 21),
    (Interval::AugmentedThirteenth, "A13", 13, 22),
];

impl Interval {
    fn entry(self) -> &'static (Interval, &'static str, u8, u8) {
        // The table lists every variant in declaration order.
        &INTERVAL_TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.entry().1
    }

    /// Scale degree the interval spans (3 for any kind of third)
    pub fn degree(self) -> u8 {
        self.entry().2
    }

    pub fn semitones(self) -> u8 {
        self.entry().3
    }

    /// Look up a label such as `m3` or `P11`. Unknown labels are an error.
    pub fn from_label(label: &str) -> Result<Self, TheoryError> {
        INTERVAL_TABLE
            .iter()
            .find(|(_, l, _, _)| *l == label)
            .map(|(interval, _, _, _)| *interval)
            .ok_or_else(|| TheoryError::parse(label, "unknown interval label"))
    }

    pub fn all() -> impl Iterator<Item = Interval> {
        INTERVAL_TABLE.iter().map(|(interval, _, _, _)| *interval)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Interval {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::from_label(s)
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_declaration_order() {
        for (i, (interval, _, _, _)) in INTERVAL_TABLE.iter().enumerate() {
            assert_eq!(*interval as usize, i, "{:?} is out of order", interval);
        }
    }

    #[test]
    fn test_semitone_values() {
        assert_eq!(Interval::PerfectUnison.semitones(), 0);
        assert_eq!(Interval::MinorThird.semitones(), 3);
        assert_eq!(Interval::MajorThird.semitones(), 4);
        assert_eq!(Interval::DiminishedFifth.semitones(), 6);
        assert_eq!(Interval::PerfectFifth.semitones(), 7);
        assert_eq!(Interval::MinorSeventh.semitones(), 10);
        assert_eq!(Interval::MajorNinth.semitones(), 14);
        assert_eq!(Interval::PerfectEleventh.semitones(), 17);
        assert_eq!(Interval::MajorThirteenth.semitones(), 21);
    }

    #[test]
    fn test_labels_round_trip() {
        for interval in Interval::all() {
            assert_eq!(Interval::from_label(interval.label()).unwrap(), interval);
        }
    }

    #[test]
    fn test_unknown_label_fails() {
        assert!(matches!(
            Interval::from_label("X9"),
            Err(TheoryError::ParseError { .. })
        ));
        assert!("p5".parse::<Interval>().is_err());
    }

    #[test]
    fn test_degrees() {
        assert_eq!(Interval::AugmentedSecond.degree(), 2);
        assert_eq!(Interval::DiminishedSeventh.degree(), 7);
        assert_eq!(Interval::AugmentedEleventh.degree(), 11);
    }
}
