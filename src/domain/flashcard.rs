//! Flashcard domain model and operations.
//!
//! This module defines the [`Flashcard`] record exchanged with the backend and edited
//! in the form, together with the client-side validation gate and display helpers for
//! the backend-assigned creation timestamp.

use super::error::{FlashdeckError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Write as _;

/// Maximum number of characters accepted for a question or an answer.
pub const MAX_TEXT_CHARS: usize = 1000;

/// Maximum number of characters accepted for a category label.
pub const MAX_CATEGORY_CHARS: usize = 100;

/// A question/answer pair with a category label.
///
/// Cards with `id == None` are transient: they only exist inside the form until the
/// backend accepts them and assigns an identifier. `created_at` is backend-assigned
/// and display-only.
///
/// Field names on the wire are `id`, `question`, `answer`, `category` and `createdAt`.
/// Decoding also accepts the older `pergunta`, `resposta`, `categoria` and
/// `dataCriacao` names, and a category sent as an object with a `name` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, alias = "pergunta")]
    pub question: String,

    #[serde(default, alias = "resposta")]
    pub answer: String,

    #[serde(default, alias = "categoria", deserialize_with = "deserialize_category")]
    pub category: String,

    #[serde(default, alias = "dataCriacao", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Category payloads seen from the backend: a bare label or a category object.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Label(String),
    Object { name: String },
}

fn deserialize_category<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<CategoryRepr>::deserialize(deserializer)?;
    Ok(match repr {
        Some(CategoryRepr::Label(label) | CategoryRepr::Object { name: label }) => label,
        None => String::new(),
    })
}

/// Editable fields of a flashcard, in form order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Question,
    Answer,
    Category,
}

impl Field {
    /// All fields in the order the form shows them.
    pub const ALL: [Self; 3] = [Self::Question, Self::Answer, Self::Category];

    /// Returns the next field, wrapping from `Category` back to `Question`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Question => Self::Answer,
            Self::Answer => Self::Category,
            Self::Category => Self::Question,
        }
    }

    /// Returns the previous field, wrapping from `Question` to `Category`.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Question => Self::Category,
            Self::Answer => Self::Question,
            Self::Category => Self::Answer,
        }
    }

    /// Human-readable label used by the form and validation messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Question => "Question",
            Self::Answer => "Answer",
            Self::Category => "Category",
        }
    }

    const fn max_chars(self) -> usize {
        match self {
            Self::Question | Self::Answer => MAX_TEXT_CHARS,
            Self::Category => MAX_CATEGORY_CHARS,
        }
    }
}

impl Flashcard {
    /// Creates a transient card from its three text fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use flashdeck::Flashcard;
    ///
    /// let card = Flashcard::new("2+2?", "4", "math");
    /// assert!(card.id.is_none());
    /// assert!(card.validate().is_ok());
    /// ```
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            question: question.into(),
            answer: answer.into(),
            category: category.into(),
            created_at: None,
        }
    }

    /// Returns the blank card the form starts from.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the text of one editable field.
    #[must_use]
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Question => &self.question,
            Field::Answer => &self.answer,
            Field::Category => &self.category,
        }
    }

    /// Returns a mutable handle to one editable field.
    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Question => &mut self.question,
            Field::Answer => &mut self.answer,
            Field::Category => &mut self.category,
        }
    }

    /// Checks the card against the form's submission rules.
    ///
    /// Every field must contain something other than whitespace. Questions and
    /// answers are capped at [`MAX_TEXT_CHARS`] characters, categories at
    /// [`MAX_CATEGORY_CHARS`].
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`] describing the first field that fails,
    /// in form order.
    pub fn validate(&self) -> Result<()> {
        for field in Field::ALL {
            let value = self.field(field);
            if value.trim().is_empty() {
                return Err(FlashdeckError::Validation(format!("{} is required", field.label())));
            }
            if value.chars().count() > field.max_chars() {
                return Err(FlashdeckError::Validation(format!(
                    "{} cannot exceed {} characters",
                    field.label(),
                    field.max_chars()
                )));
            }
        }
        Ok(())
    }

    /// Formats the creation timestamp for display.
    ///
    /// Accepts naive ISO-8601 date-times (as produced by the backend), RFC 3339
    /// timestamps and bare dates. Values that do not parse, or that the format
    /// string cannot render, are returned unchanged.
    ///
    /// # Returns
    ///
    /// - `None` if the card has no timestamp
    /// - `Some(formatted)` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use flashdeck::Flashcard;
    ///
    /// let mut card = Flashcard::new("q", "a", "c");
    /// card.created_at = Some("2024-03-09T14:05:00.123".to_string());
    /// assert_eq!(card.created_display("%d/%m/%Y").as_deref(), Some("09/03/2024"));
    /// ```
    #[must_use]
    pub fn created_display(&self, format: &str) -> Option<String> {
        let raw = self.created_at.as_deref()?;

        let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            });

        let Some(datetime) = parsed else {
            tracing::trace!(created_at = %raw, "unrecognized timestamp, showing raw value");
            return Some(raw.to_string());
        };

        let mut out = String::new();
        if write!(out, "{}", datetime.format(format)).is_err() {
            return Some(raw.to_string());
        }
        Some(out)
    }
}
