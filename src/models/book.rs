//! Book data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An inventory record as held by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Server-assigned unique identifier
    pub id: u64,

    /// Book title
    pub title: String,

    /// Book author
    pub author: String,

    /// Unit price
    pub price: f64,

    /// Copies in stock
    pub qty: u32,
}

impl Book {
    /// Draft carrying this book's current field values.
    ///
    /// Used to pre-fill an update payload before overlaying edits.
    pub fn to_draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.clone(),
            author: self.author.clone(),
            price: self.price,
            qty: self.qty,
        }
    }
}

/// A book's field values prior to server assignment of an `id`.
///
/// The payload for create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub price: f64,
    pub qty: u32,
}

impl BookDraft {
    /// Check every field rule independently.
    ///
    /// The quantity rules (whole number, ≥ 0) are enforced by the `u32`
    /// type and have no runtime check here.
    pub fn validate(&self) -> std::result::Result<(), DraftErrors> {
        let errors = DraftErrors {
            title: validate_text("Title", &self.title),
            author: validate_text("Author", &self.author),
            price: validate_price(self.price),
        };

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn validate_text(label: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        Some(format!("{label} is required"))
    } else if value.chars().count() < 2 {
        Some(format!("{label} must be at least 2 characters"))
    } else {
        None
    }
}

fn validate_price(price: f64) -> Option<String> {
    if !price.is_finite() {
        Some("Price must be a finite number".to_string())
    } else if price < 0.0 {
        Some("Price must be 0 or greater".to_string())
    } else {
        None
    }
}

/// Per-field validation failures for a draft.
///
/// A draft is submittable only when every field passes; partial validity
/// never allows submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftErrors {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<String>,
}

impl DraftErrors {
    /// True when every field passed.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.price.is_none()
    }

    /// All failure messages, in field order.
    pub fn messages(&self) -> Vec<&str> {
        [&self.title, &self.author, &self.price]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect()
    }
}

impl fmt::Display for DraftErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft() -> BookDraft {
        BookDraft {
            title: "The Rust Programming Language".to_string(),
            author: "Steve Klabnik".to_string(),
            price: 39.95,
            qty: 12,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(sample_draft().validate().is_ok());
    }

    #[test]
    fn zero_price_and_zero_qty_are_valid() {
        let mut draft = sample_draft();
        draft.price = 0.0;
        draft.qty = 0;
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn empty_title_is_required() {
        let mut draft = sample_draft();
        draft.title = String::new();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.title.as_deref(), Some("Title is required"));
        assert!(errors.author.is_none());
    }

    #[test]
    fn length_counts_raw_characters_including_whitespace() {
        // Length is measured on the value as entered; padding counts.
        let mut draft = sample_draft();
        draft.title = " A ".to_string();
        assert!(draft.validate().is_ok());

        draft.title = "  ".to_string();
        assert!(draft.validate().is_ok());

        // A single character misses the length rule, whitespace or not.
        draft.title = " ".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.title.as_deref(),
            Some("Title must be at least 2 characters")
        );
    }

    #[test]
    fn short_author_fails_length_rule() {
        let mut draft = sample_draft();
        draft.author = "K".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.author.as_deref(),
            Some("Author must be at least 2 characters")
        );
    }

    #[test]
    fn negative_price_fails() {
        let mut draft = sample_draft();
        draft.price = -1.0;
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.price.as_deref(), Some("Price must be 0 or greater"));
    }

    #[test]
    fn nan_price_fails() {
        let mut draft = sample_draft();
        draft.price = f64::NAN;
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.price.as_deref(),
            Some("Price must be a finite number")
        );
    }

    #[test]
    fn messages_join_in_field_order() {
        let draft = BookDraft {
            title: String::new(),
            author: "B".to_string(),
            price: -0.5,
            qty: 0,
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Title is required; Author must be at least 2 characters; Price must be 0 or greater"
        );
    }

    #[test]
    fn book_round_trips_through_draft() {
        let book = Book {
            id: 7,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            price: 10.5,
            qty: 3,
        };
        let draft = book.to_draft();
        assert_eq!(draft.title, book.title);
        assert_eq!(draft.qty, book.qty);
    }
}
