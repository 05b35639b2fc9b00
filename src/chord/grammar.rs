//! Chord symbol grammar
//!
//! Turns chord text into a [`ParsedChordToken`]. This is not a general
//! tokenizer: it is a fixed sequence of extraction passes, and each pass
//! assumes the earlier ones already removed their markup.
//!
//! ```text
//! "Ebm7b5add11/Gb"
//!   root split      Eb | m7b5add11/Gb
//!   1. alterations  flats [5]         -> m7add11/Gb
//!   2. suspensions  -                 -> m7add11/Gb
//!   3. added tones  adds [11]         -> m7/Gb
//!   4. omissions    -                 -> m7/Gb
//!   5. glyphs       -                 -> m7/Gb
//!   6. bass         Gb                -> m7
//!   7. alias        MinorSeventh
//! ```
//!
//! The root letter and its accidentals are split off first so that a root
//! flat is never read as a tension (`Bb7` is B-flat seventh, not B with a
//! flat seventh).

use crate::chord::quality::ChordQuality;
use crate::error::TheoryError;
use crate::note::{accidental_value, Letter, Note};

const ALTERABLE: &[u8] = &[3, 5, 7, 9, 11, 13];
const ADDABLE: &[u8] = &[2, 4, 6, 7, 9, 11, 13];
const OMITTABLE: &[u8] = &[1, 3, 5, 7, 9, 11, 13];

/// Modifier requests collected by the extraction passes, in text order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordModifiers {
    pub suspensions: Vec<u8>,
    pub added: Vec<u8>,
    pub omitted: Vec<u8>,
    pub flats: Vec<u8>,
    pub sharps: Vec<u8>,
}

impl ChordModifiers {
    pub fn is_empty(&self) -> bool {
        self.suspensions.is_empty()
            && self.added.is_empty()
            && self.omitted.is_empty()
            && self.flats.is_empty()
            && self.sharps.is_empty()
    }

    /// A single forced suspension (used by the diatonic identifier's retries)
    pub fn suspended(degree: u8) -> Self {
        Self {
            suspensions: vec![degree],
            ..Self::default()
        }
    }
}

/// Result of parsing chord text, consumed once by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedChordToken {
    pub root: Note,
    pub quality_alias: String,
    pub quality: ChordQuality,
    pub modifiers: ChordModifiers,
    pub bass: Option<Note>,
}

/// Parse a chord symbol such as `C`, `D#m7b5`, `Gsus4add9` or `Am7/G`.
///
/// # Errors
/// - [`TheoryError::ParseError`] for a bad root, a keyword without a valid
///   number (`add`, `no15`, `b2`) or a malformed bass note
/// - [`TheoryError::UnknownChordType`] when the remaining alias is not in the
///   quality table
pub fn parse_chord_symbol(text: &str) -> Result<ParsedChordToken, TheoryError> {
    let trimmed = text.trim();
    let (root, remainder) = split_root(text, trimmed)?;

    let mut modifiers = ChordModifiers::default();
    let remainder = strip_alterations(text, remainder, &mut modifiers)?;
    let remainder = strip_suspensions(&remainder, &mut modifiers);
    let remainder = strip_keyword(text, &remainder, &["add"], ADDABLE, true, &mut modifiers.added)?;
    let remainder = strip_keyword(
        text,
        &remainder,
        &["omit", "no"],
        OMITTABLE,
        false,
        &mut modifiers.omitted,
    )?;
    let remainder = normalize_glyphs(&remainder);
    let (alias, bass) = split_bass(text, &remainder)?;

    let quality =
        ChordQuality::from_alias(&alias).ok_or_else(|| TheoryError::UnknownChordType {
            input: text.to_string(),
            alias: alias.clone(),
        })?;

    log::debug!(
        "parsed chord '{}': root={} alias='{}' quality={:?} modifiers={:?} bass={:?}",
        text,
        root,
        alias,
        quality,
        modifiers,
        bass
    );

    Ok(ParsedChordToken {
        root,
        quality_alias: alias,
        quality,
        modifiers,
        bass,
    })
}

/// Split the leading letter and accidental run from the rest of the symbol
fn split_root<'a>(input: &str, trimmed: &'a str) -> Result<(Note, &'a str), TheoryError> {
    let mut chars = trimmed.char_indices();
    let letter = match chars.next() {
        Some((_, c)) => Letter::from_char(c).ok_or_else(|| {
            TheoryError::parse(input, format!("chord root must be a note letter, found '{}'", c))
        })?,
        None => return Err(TheoryError::parse(input, "empty chord symbol")),
    };

    let mut accidental: i8 = 0;
    let mut rest = &trimmed[1..];
    for (idx, c) in chars {
        // no 'x' double sharp here: "Cx..." reads as an alias
        match accidental_value(c).filter(|_| c != 'x') {
            Some(value) => {
                accidental = accidental
                    .checked_add(value)
                    .ok_or_else(|| TheoryError::parse(input, "accidental run is too long"))?;
                rest = &trimmed[idx + c.len_utf8()..];
            }
            None => break,
        }
    }

    Ok((Note::new(letter, accidental), rest))
}

/// Read a number from the start of `text` that is in `allowed`, preferring
/// two digits. Returns the number and how many bytes it used.
fn take_number(text: &str, allowed: &[u8]) -> Option<(u8, usize)> {
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).take(2).collect();
    if digits.len() == 2 {
        if let Ok(n) = digits.parse::<u8>() {
            if allowed.contains(&n) {
                return Some((n, 2));
            }
        }
    }
    let first = digits.chars().next()?.to_digit(10)? as u8;
    allowed.contains(&first).then_some((first, 1))
}

/// Pass 1: `bN` / `#N` tensions (ASCII or unicode accidentals)
fn strip_alterations(
    input: &str,
    text: &str,
    modifiers: &mut ChordModifiers,
) -> Result<String, TheoryError> {
    let mut out = String::with_capacity(text.len());
    let mut idx = 0;

    while idx < text.len() {
        let rest = &text[idx..];
        let Some(c) = rest.chars().next() else { break };
        let flat = matches!(c, 'b' | '♭');
        let sharp = matches!(c, '#' | '♯');
        let after = &rest[c.len_utf8()..];

        if (flat || sharp) && after.starts_with(|d: char| d.is_ascii_digit()) {
            let (degree, used) = take_number(after, ALTERABLE).ok_or_else(|| {
                TheoryError::parse(input, format!("cannot alter degree in '{}'", rest))
            })?;
            if flat {
                modifiers.flats.push(degree);
            } else {
                modifiers.sharps.push(degree);
            }
            idx += c.len_utf8() + used;
            continue;
        }

        out.push(c);
        idx += c.len_utf8();
    }

    Ok(out)
}

/// Pass 2: `sus`, `sus2`, `sus4`, `sus24`. Bare `sus` means sus4.
fn strip_suspensions(text: &str, modifiers: &mut ChordModifiers) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find("sus") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];

        let digits: String = rest.chars().take_while(|c| *c == '2' || *c == '4').collect();
        if digits.is_empty() {
            modifiers.suspensions.push(4);
        } else {
            for d in digits.chars() {
                modifiers.suspensions.push(if d == '2' { 2 } else { 4 });
            }
        }
        rest = &rest[digits.len()..];
    }

    out.push_str(rest);
    out
}

/// Passes 3 and 4: keyword followed by a degree number.
///
/// With `required`, the keyword without any digits is an error. Otherwise it
/// is left in place, since it may be part of a longer word.
fn strip_keyword(
    input: &str,
    text: &str,
    keywords: &[&str],
    allowed: &[u8],
    required: bool,
    collected: &mut Vec<u8>,
) -> Result<String, TheoryError> {
    let mut current = text.to_string();

    for keyword in keywords {
        let mut out = String::with_capacity(current.len());
        let mut rest = current.as_str();

        while let Some(pos) = rest.find(keyword) {
            let after = &rest[pos + keyword.len()..];
            let has_digits = after.starts_with(|c: char| c.is_ascii_digit());

            if !has_digits {
                if required {
                    return Err(TheoryError::parse(
                        input,
                        format!("'{}' must be followed by a degree number", keyword),
                    ));
                }
                out.push_str(&rest[..pos + keyword.len()]);
                rest = after;
                continue;
            }

            let (degree, used) = take_number(after, allowed).ok_or_else(|| {
                TheoryError::parse(input, format!("unsupported degree in '{}{}'", keyword, after))
            })?;
            collected.push(degree);
            out.push_str(&rest[..pos]);
            rest = &after[used..];
        }

        out.push_str(rest);
        current = out;
    }

    Ok(current)
}

/// Pass 5: unicode chord glyphs to ASCII, decorations dropped
fn normalize_glyphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '♯' => out.push('#'),
            '♭' => out.push('b'),
            '𝄪' => out.push_str("##"),
            '𝄫' => out.push_str("bb"),
            '♮' => {}
            '°' => out.push('o'),
            'Δ' => out.push('D'),
            '(' | ')' | ',' | ' ' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Step 6: `/` followed by a note letter is an explicit bass note. `6/9` is not.
fn split_bass(input: &str, text: &str) -> Result<(String, Option<Note>), TheoryError> {
    if let Some(pos) = text.rfind('/') {
        let bass_text = &text[pos + 1..];
        let starts_with_letter = bass_text
            .chars()
            .next()
            .map(|c| c.is_ascii_uppercase() && Letter::from_char(c).is_some())
            .unwrap_or(false);
        if starts_with_letter {
            let bass = Note::parse(bass_text).map_err(|_| {
                TheoryError::parse(input, format!("invalid bass note '{}'", bass_text))
            })?;
            return Ok((text[..pos].to_string(), Some(bass)));
        }
    }
    Ok((text.to_string(), None))
}
