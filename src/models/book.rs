//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::borrow::{format_due_date, Borrow};

/// Full book model from database.
///
/// `total_copies` is immutable once the catalog row is seeded;
/// `available_copies` is the only field the lending core mutates and is
/// kept within `0..=total_copies` by the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub page_count: Option<i32>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-caller availability status shown in listings.
///
/// "borrowed" covers both "held by the caller" and "no copies left";
/// only `dueDate` (and `isUserBorrowed` on the detail view) tells them
/// apart. This matches the observed system behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
}

/// Short book representation for listings
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub status: BookStatus,
    /// Present only when the caller holds an active loan on this title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl BookSummary {
    /// Build the listing entry for one book as seen by the caller.
    /// `user_borrow` is the caller's active loan on this title, if any.
    pub fn from_book(book: &Book, user_borrow: Option<&Borrow>) -> Self {
        let status = if user_borrow.is_some() {
            BookStatus::Borrowed
        } else if book.available_copies > 0 {
            BookStatus::Available
        } else {
            BookStatus::Borrowed
        };

        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            cover_url: book.cover_url.clone(),
            status,
            due_date: user_borrow.map(|b| format_due_date(b.due_date)),
        }
    }
}

/// Full book view for the detail endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub status: BookStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i32>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub available_copies: i32,
    pub total_copies: i32,
    pub is_user_borrowed: bool,
}

impl BookDetail {
    pub fn from_book(book: &Book, user_borrow: Option<&Borrow>) -> Self {
        let summary = BookSummary::from_book(book, user_borrow);
        Self {
            id: summary.id,
            title: summary.title,
            author: summary.author,
            cover_url: summary.cover_url,
            status: summary.status,
            due_date: summary.due_date,
            description: book.description.clone(),
            publisher: book.publisher.clone(),
            publication_year: book.publication_year,
            page_count: book.page_count,
            categories: book.categories.clone(),
            tags: book.tags.clone(),
            available_copies: book.available_copies,
            total_copies: book.total_copies,
            is_user_borrowed: user_borrow.is_some(),
        }
    }
}

/// Book listing query parameters.
///
/// `page` and `limit` tolerate malformed input: query values that do not
/// parse as integers read as absent and fall back to the defaults, they
/// never reject the request.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Page number (default 1; invalid or non-positive values fall back)
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    /// Page size (default 12; invalid or non-positive values fall back)
    #[serde(default, deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
    /// Case-insensitive substring match against title or author
    pub search: Option<String>,
    /// "available" restricts to titles with copies left; anything else means all
    pub tab: Option<String>,
}

/// Query-string values arrive as strings; anything unparseable is None
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// Pagination envelope for listings
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

/// Response body for the book listing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct BookListResponse {
    pub data: Vec<BookSummary>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn book(available: i32, total: i32) -> Book {
        Book {
            id: Uuid::new_v4(),
            title: "The Rust Programming Language".to_string(),
            author: "Steve Klabnik".to_string(),
            cover_url: None,
            description: None,
            publisher: None,
            publication_year: Some(2019),
            page_count: Some(560),
            categories: vec!["programming".to_string()],
            tags: vec![],
            total_copies: total,
            available_copies: available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn active_borrow(book_id: Uuid) -> Borrow {
        let borrowed_at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        Borrow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            book_id,
            borrowed_at,
            due_date: borrowed_at + Duration::days(14),
            returned_at: None,
        }
    }

    #[test]
    fn copies_left_and_not_held_is_available() {
        let b = book(2, 3);
        let summary = BookSummary::from_book(&b, None);
        assert_eq!(summary.status, BookStatus::Available);
        assert!(summary.due_date.is_none());
    }

    #[test]
    fn held_by_caller_is_borrowed_with_due_date() {
        let b = book(2, 3);
        let borrow = active_borrow(b.id);
        let summary = BookSummary::from_book(&b, Some(&borrow));
        assert_eq!(summary.status, BookStatus::Borrowed);
        assert_eq!(summary.due_date.as_deref(), Some("15/03/2025"));
    }

    #[test]
    fn exhausted_but_not_held_is_reported_as_borrowed() {
        // Zero copies left reads the same as "held by me" in the summary;
        // the due date is the only distinguishing field.
        let b = book(0, 3);
        let summary = BookSummary::from_book(&b, None);
        assert_eq!(summary.status, BookStatus::Borrowed);
        assert!(summary.due_date.is_none());
    }

    #[test]
    fn malformed_page_and_limit_read_as_absent() {
        let query: BookQuery = serde_json::from_value(serde_json::json!({
            "page": "abc",
            "limit": "12"
        }))
        .unwrap();
        assert_eq!(query.page, None);
        assert_eq!(query.limit, Some(12));

        let query: BookQuery = serde_json::from_value(serde_json::json!({
            "page": "2abc"
        }))
        .unwrap();
        assert_eq!(query.page, None);
        assert_eq!(query.limit, None);
    }

    #[test]
    fn detail_carries_explicit_user_borrow_flag() {
        let b = book(0, 3);
        let detail = BookDetail::from_book(&b, None);
        assert_eq!(detail.status, BookStatus::Borrowed);
        assert!(!detail.is_user_borrowed);
        assert_eq!(detail.available_copies, 0);
        assert_eq!(detail.total_copies, 3);

        let borrow = active_borrow(b.id);
        let detail = BookDetail::from_book(&b, Some(&borrow));
        assert!(detail.is_user_borrowed);
        assert!(detail.due_date.is_some());
    }
}
