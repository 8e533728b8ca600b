//! Field validators for the checkout form.
//!
//! Each rule looks at one optional value and returns the error it raises, if
//! any. Rules other than [`required`] let absent and empty values through, so
//! rules compose without reporting the same missing value twice.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,4}$").expect("email pattern")
});
static CARD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("card number pattern"));
static SECURITY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("security code pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum FieldErrorKind {
    Required,
    MinLength { min: usize },
    NotOnlyWhitespace,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Dotted path of the field, e.g. `customer.firstName`.
    pub field: String,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

pub fn required(value: Option<&str>) -> Option<FieldErrorKind> {
    match value {
        None | Some("") => Some(FieldErrorKind::Required),
        Some(_) => None,
    }
}

pub fn min_length(value: Option<&str>, min: usize) -> Option<FieldErrorKind> {
    match value {
        Some(v) if !v.is_empty() && v.chars().count() < min => {
            Some(FieldErrorKind::MinLength { min })
        }
        _ => None,
    }
}

/// A present value that trims down to nothing fails; `None` passes.
pub fn not_only_whitespace(value: Option<&str>) -> Option<FieldErrorKind> {
    match value {
        Some(v) if v.trim().is_empty() => Some(FieldErrorKind::NotOnlyWhitespace),
        _ => None,
    }
}

pub fn pattern(value: Option<&str>, re: &Regex) -> Option<FieldErrorKind> {
    match value {
        Some(v) if !v.is_empty() && !re.is_match(v) => Some(FieldErrorKind::Pattern),
        _ => None,
    }
}

pub fn email(value: Option<&str>) -> Option<FieldErrorKind> {
    pattern(value, &EMAIL)
}

pub fn card_number(value: Option<&str>) -> Option<FieldErrorKind> {
    pattern(value, &CARD_NUMBER)
}

pub fn security_code(value: Option<&str>) -> Option<FieldErrorKind> {
    pattern(value, &SECURITY_CODE)
}

/// Required, at least two characters, not only whitespace.
pub fn text_field(value: Option<&str>) -> Vec<FieldErrorKind> {
    [
        required(value),
        min_length(value, 2),
        not_only_whitespace(value),
    ]
    .into_iter()
    .flatten()
    .collect()
}
