//! Enharmonic equivalence: two spellings that sound the same pitch class.
//!
//! Octaves are ignored, so `B#` matches `C` and `Cb/5` matches `B/2`.

use crate::error::TheoryError;
use crate::note::Note;

/// Compare two note names.
///
/// ```
/// assert!(fretwise::are_equivalent("C#", "Db").unwrap());
/// assert!(!fretwise::are_equivalent("C", "C#").unwrap());
/// ```
pub fn are_equivalent(a: &str, b: &str) -> Result<bool, TheoryError> {
    Ok(are_equivalent_notes(&Note::parse(a)?, &Note::parse(b)?))
}

pub fn are_equivalent_notes(a: &Note, b: &Note) -> bool {
    a.is_enharmonic(b)
}

/// True when every note in `a` pairs off with a distinct equivalent note in
/// `b`. Order does not matter; repeated pitch classes must repeat equally.
pub fn are_equivalent_sets(a: &[Note], b: &[Note]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts = [0i32; 12];
    for note in a {
        counts[note.pitch_class() as usize] += 1;
    }
    for note in b {
        counts[note.pitch_class() as usize] -= 1;
    }
    counts.iter().all(|&count| count == 0)
}

/// Parse both lists and compare them with [`are_equivalent_sets`].
pub fn are_equivalent_names(a: &[&str], b: &[&str]) -> Result<bool, TheoryError> {
    let parse = |names: &[&str]| {
        names
            .iter()
            .map(|name| Note::parse(name))
            .collect::<Result<Vec<_>, _>>()
    };
    Ok(are_equivalent_sets(&parse(a)?, &parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_notes() {
        assert!(are_equivalent("B#", "C").unwrap());
        assert!(are_equivalent("E#", "F").unwrap());
        assert!(are_equivalent("Fb", "E").unwrap());
        assert!(are_equivalent("Cx", "D").unwrap());
        assert!(are_equivalent("Cb/5", "B/2").unwrap());
        assert!(!are_equivalent("E", "F").unwrap());
    }

    #[test]
    fn test_symmetry() {
        let names = ["C", "B#", "Dbb", "C#", "Db", "Bx", "F", "E#", "Gbb"];
        for a in names {
            for b in names {
                assert_eq!(
                    are_equivalent(a, b).unwrap(),
                    are_equivalent(b, a).unwrap(),
                    "{} vs {}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_parse_failure() {
        assert!(matches!(
            are_equivalent("H", "C"),
            Err(TheoryError::ParseError { .. })
        ));
    }

    #[test]
    fn test_sets_ignore_order() {
        assert!(are_equivalent_names(&["C", "E", "G"], &["G", "Fb", "B#"]).unwrap());
        assert!(!are_equivalent_names(&["C", "E", "G"], &["C", "E"]).unwrap());
        assert!(!are_equivalent_names(&["C", "E", "G"], &["C", "Eb", "G"]).unwrap());
    }

    #[test]
    fn test_sets_are_multisets() {
        assert!(!are_equivalent_names(&["C", "C", "E"], &["C", "E", "E"]).unwrap());
        assert!(are_equivalent_names(&["C", "C", "E"], &["B#", "E", "C"]).unwrap());
    }
}
