//! # Scale Catalog
//!
//! Named scale formulas grouped by family, authored in `data/scales.yaml`
//! and embedded in the binary.
//!
//! ## Loading
//! The YAML is deserialized into [`RawScaleEntry`] values and validated into
//! [`ScaleEntry`]. Validation is strict: unknown keys, unknown step tokens,
//! formulas that do not span exactly one octave and duplicate names all fail
//! with [`TheoryError::CatalogError`].
//!
//! ## Example
//! ```rust
//! use fretwise::ScaleCatalog;
//!
//! let catalog = ScaleCatalog::builtin()?;
//! let dorian = catalog.get("dorian")?;
//! assert_eq!(dorian.formula.to_string(), "W H W W W H W");
//! # Ok::<(), fretwise::TheoryError>(())
//! ```

use crate::error::TheoryError;
use crate::note::Note;
use crate::scale::{generate_scale, Scale, ScaleFormula, Step};
use once_cell::sync::OnceCell;
use serde::Deserialize;

const BUILTIN_SCALES: &str = include_str!("data/scales.yaml");

/// Semitones in one octave; every catalog formula must add up to this.
const OCTAVE: i32 = 12;

static BUILTIN: OnceCell<ScaleCatalog> = OnceCell::new();

/// Scale entry as written in YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawScaleEntry {
    pub name: String,
    pub family: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleEntry {
    pub name: String,
    pub family: String,
    pub formula: ScaleFormula,
}

#[derive(Debug, Clone, Default)]
pub struct ScaleCatalog {
    entries: Vec<ScaleEntry>,
}

impl ScaleCatalog {
    /// The embedded catalog, parsed and validated on first use.
    pub fn builtin() -> Result<&'static ScaleCatalog, TheoryError> {
        BUILTIN.get_or_try_init(|| Self::from_yaml(BUILTIN_SCALES))
    }

    pub fn from_yaml(content: &str) -> Result<Self, TheoryError> {
        let raw: Vec<RawScaleEntry> = serde_yaml::from_str(content)
            .map_err(|e| TheoryError::catalog("scales", e.to_string()))?;

        let mut entries: Vec<ScaleEntry> = Vec::with_capacity(raw.len());
        for entry in raw {
            let validated = Self::validate(entry)?;
            if entries
                .iter()
                .any(|e| e.name.eq_ignore_ascii_case(&validated.name))
            {
                return Err(TheoryError::catalog(&validated.name, "duplicate scale name"));
            }
            entries.push(validated);
        }

        log::debug!("loaded {} scales", entries.len());
        Ok(Self { entries })
    }

    fn validate(raw: RawScaleEntry) -> Result<ScaleEntry, TheoryError> {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err(TheoryError::catalog("<unnamed>", "scale name is empty"));
        }

        let steps = raw
            .steps
            .iter()
            .map(|token| {
                Step::from_token(token).ok_or_else(|| {
                    TheoryError::catalog(&name, format!("unknown step token '{}'", token))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let formula = ScaleFormula::new(steps)
            .map_err(|e| TheoryError::catalog(&name, e.to_string()))?;
        if formula.semitones() != OCTAVE {
            return Err(TheoryError::catalog(
                &name,
                format!(
                    "steps span {} semitones instead of {}",
                    formula.semitones(),
                    OCTAVE
                ),
            ));
        }

        Ok(ScaleEntry {
            name,
            family: raw.family.trim().to_string(),
            formula,
        })
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Result<&ScaleEntry, TheoryError> {
        let wanted = name.trim();
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TheoryError::UnknownScale(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScaleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries grouped by family, families in first-appearance order.
    pub fn families(&self) -> Vec<(&str, Vec<&ScaleEntry>)> {
        let mut families: Vec<(&str, Vec<&ScaleEntry>)> = Vec::new();
        for entry in &self.entries {
            match families.iter_mut().find(|(family, _)| *family == entry.family) {
                Some((_, members)) => members.push(entry),
                None => families.push((entry.family.as_str(), vec![entry])),
            }
        }
        families
    }
}

/// Look up `name` in the built-in catalog and spell it from `root`.
pub fn generate_named_scale(root: &Note, name: &str) -> Result<Scale, TheoryError> {
    let entry = ScaleCatalog::builtin()?.get(name)?;
    generate_scale(root, &entry.formula)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_loads() {
        let catalog = ScaleCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 37);
        assert_eq!(
            catalog.get("Ionian").unwrap().formula.to_string(),
            "W W H W W W H"
        );
        assert_eq!(catalog.get("japanese").unwrap().formula.len(), 5);
    }

    #[test]
    fn test_unknown_scale() {
        let catalog = ScaleCatalog::builtin().unwrap();
        assert_eq!(
            catalog.get("Bebop Dominant").unwrap_err(),
            TheoryError::UnknownScale("Bebop Dominant".to_string())
        );
    }

    #[test]
    fn test_families_grouped() {
        let catalog = ScaleCatalog::builtin().unwrap();
        let families = catalog.families();
        let names: Vec<&str> = families.iter().map(|(f, _)| *f).collect();
        assert_eq!(names[0], "Major Modes");
        assert!(names.contains(&"Pentatonic"));
        let major = &families[0].1;
        assert_eq!(major.len(), 7);
        assert_eq!(major[6].name, "Locrian");
    }

    #[test]
    fn test_every_builtin_spans_an_octave() {
        for entry in ScaleCatalog::builtin().unwrap().iter() {
            assert_eq!(entry.formula.semitones(), 12, "{}", entry.name);
        }
    }

    #[test]
    fn test_generate_named_scale() {
        let scale = generate_named_scale(&Note::parse("A").unwrap(), "Harmonic Minor").unwrap();
        assert_eq!(scale.note_names(), vec!["A", "B", "C", "D", "E", "F", "G#", "A"]);
        assert!(matches!(
            generate_named_scale(&Note::parse("A").unwrap(), "nope"),
            Err(TheoryError::UnknownScale(_))
        ));
    }

    #[test]
    fn test_rejects_misnamed_key() {
        let yaml = "- name: Japanese\n  family: Pentatonic\n  intervals: [H, P, W, H, P]\n";
        assert!(matches!(
            ScaleCatalog::from_yaml(yaml),
            Err(TheoryError::CatalogError { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_steps() {
        let unknown = "- name: Odd\n  family: Test\n  steps: [W, W, Q]\n";
        match ScaleCatalog::from_yaml(unknown) {
            Err(TheoryError::CatalogError { entry, message }) => {
                assert_eq!(entry, "Odd");
                assert!(message.contains("'Q'"));
            }
            other => panic!("expected catalog error, got {:?}", other),
        }

        let short = "- name: Short\n  family: Test\n  steps: [W, W, H]\n";
        assert!(ScaleCatalog::from_yaml(short).is_err());
    }

    #[test]
    fn test_rejects_duplicates() {
        let yaml = "- name: A\n  family: T\n  steps: [W, W, W, W, W, W]\n\
                    - name: a\n  family: T\n  steps: [W, W, W, W, W, W]\n";
        assert!(matches!(
            ScaleCatalog::from_yaml(yaml),
            Err(TheoryError::CatalogError { .. })
        ));
    }
}
