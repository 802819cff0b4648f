/*!
 * Per-cell style records.
 *
 * A `StyleRecord` is a plain owned value: copying one into an output sheet never
 * aliases the source. Only the attributes the rewriter must reproduce are modelled;
 * the I/O layer applies them on top of the source package, so anything not listed
 * here survives untouched.
 */

use serde::{Deserialize, Serialize};

use crate::errors::StyleError;

/// Font attributes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FontStyle {
    pub name: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    /// OOXML underline kind ("single", "double", ...), empty for none
    pub underline: String,
    /// ARGB colour, empty when the theme colour applies
    pub color: String,
}

/// Style and colour of one border edge
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BorderEdge {
    /// OOXML border style ("thin", "medium", ...), empty for none
    pub style: String,
    pub color: String,
}

/// The four border edges of a cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BorderStyle {
    pub left: BorderEdge,
    pub right: BorderEdge,
    pub top: BorderEdge,
    pub bottom: BorderEdge,
}

impl BorderStyle {
    pub fn edges(&self) -> [&BorderEdge; 4] {
        [&self.left, &self.right, &self.top, &self.bottom]
    }
}

/// Solid background fill
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FillStyle {
    pub background_color: String,
}

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
}

/// Vertical alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    Top,
    Center,
    #[default]
    Bottom,
    Justify,
    Distributed,
}

/// Text placement inside the cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignmentStyle {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    pub wrap_text: bool,
}

/// Cell protection flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionStyle {
    pub locked: bool,
    pub hidden: bool,
}

impl Default for ProtectionStyle {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

/// Formatting of a single cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleRecord {
    pub font: Option<FontStyle>,
    pub border: Option<BorderStyle>,
    pub fill: Option<FillStyle>,
    pub number_format: Option<String>,
    pub protection: Option<ProtectionStyle>,
    pub alignment: Option<AlignmentStyle>,
}

impl StyleRecord {
    /// Whether no attribute is set
    pub fn is_plain(&self) -> bool {
        self == &Self::default()
    }

    /// Check that the record can be applied to a cell
    pub fn validate(&self) -> Result<(), StyleError> {
        if let Some(font) = &self.font {
            if !font.size.is_finite() || font.size < 0.0 {
                return Err(StyleError::InvalidFontSize(font.size));
            }
            validate_color(&font.color)?;
        }
        if let Some(border) = &self.border {
            for edge in border.edges() {
                validate_color(&edge.color)?;
            }
        }
        if let Some(fill) = &self.fill {
            validate_color(&fill.background_color)?;
        }
        Ok(())
    }

    /// Copy of the record, provided it is valid
    pub fn try_copy(&self) -> Result<StyleRecord, StyleError> {
        self.validate()?;
        Ok(self.clone())
    }
}

/// An empty colour means "inherit"; otherwise 6 (RGB) or 8 (ARGB) hex digits
fn validate_color(color: &str) -> Result<(), StyleError> {
    let valid = color.is_empty()
        || ((color.len() == 6 || color.len() == 8) && color.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(StyleError::InvalidColor(color.to_string()))
    }
}
