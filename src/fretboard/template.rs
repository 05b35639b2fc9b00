//! Chord pattern templates.
//!
//! A template is a movable fingering: one note on the root string at the
//! root fret, the rest placed by fret offset from it. Built-in templates live
//! in `data/patterns.yaml` and are validated on first use.

use crate::error::TheoryError;
use crate::interval::Interval;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::HashSet;

const BUILTIN_PATTERNS: &str = include_str!("../data/patterns.yaml");

static BUILTIN: OnceCell<TemplateCatalog> = OnceCell::new();

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTemplateNote {
    pub string: usize,
    pub fret: i32,
    pub interval: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTemplate {
    pub id: String,
    pub name: String,
    pub root_string: usize,
    pub notes: Vec<RawTemplateNote>,
    #[serde(default)]
    pub open_only: bool,
    #[serde(default)]
    pub fixed_fret: Option<u8>,
    #[serde(default)]
    pub min_fret: Option<u8>,
    #[serde(default)]
    pub max_fret: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNote {
    /// Absolute string index
    pub string: usize,
    /// Fret relative to the root fret
    pub fret_offset: i32,
    pub interval: Interval,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChordPatternTemplate {
    pub id: String,
    pub name: String,
    pub root_string: usize,
    pub notes: Vec<TemplateNote>,
    /// Open voicings only apply with the root at this fret
    pub open_only: bool,
    pub fixed_fret: Option<u8>,
    pub min_fret: u8,
    /// `None` means up to the last fret of the board
    pub max_fret: Option<u8>,
}

impl ChordPatternTemplate {
    /// Whether a root at `fret` is allowed by the open-voicing and range rules.
    pub fn accepts_root_fret(&self, fret: u8) -> bool {
        if self.open_only && self.fixed_fret != Some(fret) {
            return false;
        }
        fret >= self.min_fret && self.max_fret.map_or(true, |max| fret <= max)
    }

    fn validate(raw: RawTemplate) -> Result<Self, TheoryError> {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            return Err(TheoryError::catalog(&raw.name, "template id is empty"));
        }

        let mut strings = HashSet::new();
        let mut notes = Vec::with_capacity(raw.notes.len());
        for note in raw.notes {
            if !strings.insert(note.string) {
                return Err(TheoryError::catalog(
                    &id,
                    format!("string {} is used twice", note.string),
                ));
            }
            let interval = Interval::from_label(note.interval.trim())
                .map_err(|e| TheoryError::catalog(&id, e.to_string()))?;
            notes.push(TemplateNote {
                string: note.string,
                fret_offset: note.fret,
                interval,
                label: note.label.unwrap_or_else(|| interval.label().to_string()),
            });
        }

        let has_root = notes.iter().any(|note| {
            note.string == raw.root_string
                && note.fret_offset == 0
                && note.interval == Interval::PerfectUnison
        });
        if !has_root {
            return Err(TheoryError::catalog(
                &id,
                format!("no root note at offset 0 on string {}", raw.root_string),
            ));
        }

        if raw.open_only && raw.fixed_fret.is_none() {
            return Err(TheoryError::catalog(&id, "open voicing without fixed_fret"));
        }

        let min_fret = raw.min_fret.unwrap_or(0);
        if let Some(max) = raw.max_fret {
            if max < min_fret {
                return Err(TheoryError::catalog(
                    &id,
                    format!("min_fret {} is above max_fret {}", min_fret, max),
                ));
            }
        }

        Ok(Self {
            id,
            name: raw.name,
            root_string: raw.root_string,
            notes,
            open_only: raw.open_only,
            fixed_fret: raw.fixed_fret,
            min_fret,
            max_fret: raw.max_fret,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<ChordPatternTemplate>,
}

impl TemplateCatalog {
    pub fn builtin() -> Result<&'static TemplateCatalog, TheoryError> {
        BUILTIN.get_or_try_init(|| Self::from_yaml(BUILTIN_PATTERNS))
    }

    pub fn from_yaml(content: &str) -> Result<Self, TheoryError> {
        let raw: Vec<RawTemplate> = serde_yaml::from_str(content)
            .map_err(|e| TheoryError::catalog("patterns", e.to_string()))?;

        let mut ids = HashSet::new();
        let mut templates = Vec::with_capacity(raw.len());
        for entry in raw {
            let template = ChordPatternTemplate::validate(entry)?;
            if !ids.insert(template.id.clone()) {
                return Err(TheoryError::catalog(&template.id, "duplicate template id"));
            }
            templates.push(template);
        }

        log::debug!("loaded {} pattern templates", templates.len());
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[ChordPatternTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&ChordPatternTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
