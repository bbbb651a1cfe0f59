//! Theme name rules.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Heading shown when no theme is active.
pub const NO_THEME_SELECTED: &str = "No theme selected";

/// Theme name validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeValidationError {
    EmptyName,
}

impl Display for ThemeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "theme name must not be empty"),
        }
    }
}

impl Error for ThemeValidationError {}

/// Trims a user-provided theme name.
///
/// Uniqueness is checked by the notebook, not here.
pub fn normalize_theme_name(raw: &str) -> Result<String, ThemeValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ThemeValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Heading text for a theme: first character upper-cased, rest untouched.
pub fn display_title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
