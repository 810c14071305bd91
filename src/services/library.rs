//! Lending service: book listings, detail views, borrow and return.
//!
//! Correctness under concurrent borrows lives in the repository
//! transactions; this layer resolves the caller, shapes queries, and
//! assembles per-user views.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetail, BookListResponse, BookQuery, BookSummary, Pagination},
        borrow::{format_due_date, Borrow, BorrowReceipt, ReturnReceipt},
    },
    repository::Repository,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 12;
const BORROW_DAYS: i64 = 14;

/// Positive integer or the fallback; invalid and missing values read the same
fn positive_or(value: Option<i64>, fallback: i64) -> i64 {
    match value {
        Some(v) if v > 0 => v,
        _ => fallback,
    }
}

/// 1-based page to row offset; saturate so an absurd page number reads as
/// an empty tail page instead of overflowing into a negative OFFSET
fn page_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

#[derive(Clone)]
pub struct LibraryService {
    repository: Repository,
}

impl LibraryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// The core treats user ids as already-validated foreign keys; a token
    /// whose subject no longer resolves is indistinguishable from no token.
    async fn ensure_user(&self, user_id: Uuid) -> AppResult<()> {
        self.repository
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Unknown user".to_string()))?;
        Ok(())
    }

    /// Paginated catalog listing with the caller's loan state per title
    pub async fn list_books(&self, user_id: Uuid, query: &BookQuery) -> AppResult<BookListResponse> {
        self.ensure_user(user_id).await?;

        let page = positive_or(query.page, DEFAULT_PAGE);
        let limit = positive_or(query.limit, DEFAULT_LIMIT);
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let only_available = query.tab.as_deref() == Some("available");

        let (books, total) = self
            .repository
            .books
            .search(search, only_available, limit, page_offset(page, limit))
            .await?;

        let borrow_map = self.active_borrows_by_book(user_id, &books).await?;

        let data = books
            .iter()
            .map(|book| BookSummary::from_book(book, borrow_map.get(&book.id)))
            .collect();

        Ok(BookListResponse {
            data,
            pagination: Pagination {
                total,
                page,
                total_pages: total_pages(total, limit),
            },
        })
    }

    /// Full book view including the caller's explicit borrow flag
    pub async fn get_book_detail(&self, user_id: Uuid, book_id: Uuid) -> AppResult<BookDetail> {
        self.ensure_user(user_id).await?;

        let book = self
            .repository
            .books
            .get_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let user_borrow = self.repository.borrows.find_active(user_id, book_id).await?;

        Ok(BookDetail::from_book(&book, user_borrow.as_ref()))
    }

    /// Borrow one copy of a title for the caller
    pub async fn borrow_book(&self, user_id: Uuid, book_id: Uuid) -> AppResult<BorrowReceipt> {
        self.ensure_user(user_id).await?;

        self.repository
            .books
            .get_by_id(book_id)
            .await?
            .ok_or(AppError::UnknownBook)?;

        let due_date = Utc::now() + Duration::days(BORROW_DAYS);
        let borrow = self.repository.borrows.borrow(user_id, book_id, due_date).await?;

        tracing::info!(user_id = %user_id, book_id = %book_id, "book borrowed");

        Ok(BorrowReceipt {
            success: true,
            due_date: format_due_date(borrow.due_date),
            message: "Borrow succeeded".to_string(),
        })
    }

    /// Return the caller's active borrow of a title
    pub async fn return_book(&self, user_id: Uuid, book_id: Uuid) -> AppResult<ReturnReceipt> {
        self.ensure_user(user_id).await?;

        self.repository
            .books
            .get_by_id(book_id)
            .await?
            .ok_or(AppError::UnknownBook)?;

        let borrow = self.repository.borrows.return_book(user_id, book_id).await?;

        tracing::info!(user_id = %user_id, book_id = %book_id, "book returned");

        Ok(ReturnReceipt {
            success: true,
            returned_at: borrow.returned_at.unwrap_or_else(Utc::now),
            message: "Return succeeded".to_string(),
        })
    }

    async fn active_borrows_by_book(
        &self,
        user_id: Uuid,
        books: &[Book],
    ) -> AppResult<HashMap<Uuid, Borrow>> {
        let book_ids: Vec<Uuid> = books.iter().map(|b| b.id).collect();
        if book_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let borrows = self
            .repository
            .borrows
            .find_active_for_books(user_id, &book_ids)
            .await?;

        Ok(borrows.into_iter().map(|b| (b.book_id, b)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_and_limit_fall_back_on_invalid_input() {
        assert_eq!(positive_or(None, DEFAULT_PAGE), 1);
        assert_eq!(positive_or(Some(0), DEFAULT_PAGE), 1);
        assert_eq!(positive_or(Some(-3), DEFAULT_LIMIT), 12);
        assert_eq!(positive_or(Some(5), DEFAULT_LIMIT), 5);
    }

    #[test]
    fn page_offset_saturates_instead_of_overflowing() {
        assert_eq!(page_offset(1, 12), 0);
        assert_eq!(page_offset(3, 12), 24);
        assert_eq!(page_offset(i64::MAX, 12), i64::MAX);
        assert_eq!(page_offset(i64::MAX, i64::MAX), i64::MAX);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 12), 3);
        assert_eq!(total_pages(24, 12), 2);
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(1, 12), 1);
    }

    #[test]
    fn total_pages_is_zero_without_a_limit() {
        assert_eq!(total_pages(25, 0), 0);
        assert_eq!(total_pages(25, -1), 0);
    }
}
