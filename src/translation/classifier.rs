/*!
 * Per-cell translation decision.
 *
 * `classify` looks at a raw cell value and its role and decides whether the value
 * goes to the backend. It has no side effects and holds no state.
 */

use crate::language_utils::looks_like_target_script;
use crate::workbook::CellValue;

/// Where a cell sits in its sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// Column label in the first row
    Header,
    /// Data cell below the header
    Body,
}

/// Outcome of classifying one cell
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Absent, empty or whitespace-only
    SkipEmpty,
    /// Number or boolean in the body
    SkipNumeric,
    /// Formula, passed through untouched
    SkipFormula,
    /// Already in the target script; holds the trimmed text
    SkipTargetScript(String),
    /// Must be translated; holds the trimmed text
    Translate(String),
}

impl Classification {
    pub fn is_translate(&self) -> bool {
        matches!(self, Self::Translate(_))
    }
}

/// A unit of translation work
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationJob {
    pub text: String,
    pub role: CellRole,
}

impl TranslationJob {
    pub fn new(text: impl Into<String>, role: CellRole) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }
}

/// Decide what to do with a cell value.
///
/// Header numbers and booleans are coerced to text and classified like any other
/// label; in the body they are always skipped.
pub fn classify(value: &CellValue, role: CellRole) -> Classification {
    match value {
        CellValue::Empty => Classification::SkipEmpty,
        CellValue::Formula(_) => Classification::SkipFormula,
        CellValue::Number(_) | CellValue::Bool(_) => match role {
            CellRole::Body => Classification::SkipNumeric,
            CellRole::Header => classify_text(&header_text(value)),
        },
        CellValue::Text(text) => classify_text(text),
    }
}

/// Text form of a header value; numbers print in their shortest decimal form
pub fn header_text(value: &CellValue) -> String {
    value.to_string()
}

fn classify_text(text: &str) -> Classification {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Classification::SkipEmpty
    } else if looks_like_target_script(trimmed) {
        Classification::SkipTargetScript(trimmed.to_string())
    } else {
        Classification::Translate(trimmed.to_string())
    }
}
