//! Length filter for the notes list.
//!
//! Bounds come straight from text inputs. Empty or non-numeric text means
//! "no bound", represented as -∞ / +∞ so every comparison is total. Both ends
//! are inclusive and the original order is kept.

use crate::model::NoteRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthRange {
    pub min: f64,
    pub max: f64,
}

impl Default for LengthRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl LengthRange {
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    /// Builds a range from raw input text.
    pub fn parse(min: &str, max: &str) -> Self {
        Self {
            min: parse_bound(min).unwrap_or(f64::NEG_INFINITY),
            max: parse_bound(max).unwrap_or(f64::INFINITY),
        }
    }

    pub fn from_inputs(min: Option<&str>, max: Option<&str>) -> Self {
        Self::parse(min.unwrap_or(""), max.unwrap_or(""))
    }

    pub fn is_unbounded(&self) -> bool {
        self.min == f64::NEG_INFINITY && self.max == f64::INFINITY
    }

    pub fn contains(&self, len: usize) -> bool {
        let len = len as f64;
        len >= self.min && len <= self.max
    }
}

fn parse_bound(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Notes whose content length falls inside `range`, in their original order.
pub fn filter_notes(notes: &[NoteRecord], range: &LengthRange) -> Vec<NoteRecord> {
    if range.is_unbounded() {
        return notes.to_vec();
    }
    notes
        .iter()
        .filter(|note| range.contains(note.len()))
        .cloned()
        .collect()
}
