//! Borrows repository: the loan ledger and the atomic lending transactions.
//!
//! All writes to `books.available_copies` and all borrow-row creation
//! funnel through this type. The borrow and return operations each run as
//! one Postgres transaction so partial mutations never become visible.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::borrow::Borrow,
};

/// Partial unique index guarding "one active borrow per (user, book)".
const ACTIVE_BORROW_INDEX: &str = "borrows_one_active_per_user_book";

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get the caller's active borrow on a title, if any
    pub async fn find_active(&self, user_id: Uuid, book_id: Uuid) -> AppResult<Option<Borrow>> {
        let borrow = sqlx::query_as::<_, Borrow>(
            "SELECT * FROM borrows WHERE user_id = $1 AND book_id = $2 AND returned_at IS NULL",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(borrow)
    }

    /// Get the caller's active borrows across a page of titles
    pub async fn find_active_for_books(
        &self,
        user_id: Uuid,
        book_ids: &[Uuid],
    ) -> AppResult<Vec<Borrow>> {
        let borrows = sqlx::query_as::<_, Borrow>(
            "SELECT * FROM borrows WHERE user_id = $1 AND book_id = ANY($2) AND returned_at IS NULL",
        )
        .bind(user_id)
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(borrows)
    }

    /// Borrow one copy of a title: the conditional decrement plus the
    /// borrow-row insert, committed atomically.
    ///
    /// The guarded UPDATE takes the row lock on the book; a racing borrower
    /// of the last copy re-evaluates `available_copies > 0` after the lock
    /// and affects zero rows. Two racing requests from the same user pass
    /// the EXISTS check together; the second insert then violates the
    /// active-borrow index and the decrement rolls back with it.
    pub async fn borrow(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        due_date: DateTime<Utc>,
    ) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let already_borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrows WHERE user_id = $1 AND book_id = $2 AND returned_at IS NULL)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_borrowed {
            return Err(AppError::AlreadyBorrowed);
        }

        let updated = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1, updated_at = NOW() \
             WHERE id = $1 AND available_copies > 0",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::Unavailable);
        }

        let borrow = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (id, user_id, book_id, borrowed_at, due_date, returned_at)
            VALUES ($1, $2, $3, NOW(), $4, NULL)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(book_id)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.constraint() == Some(ACTIVE_BORROW_INDEX) => {
                AppError::AlreadyBorrowed
            }
            _ => AppError::from(e),
        })?;

        tx.commit().await?;

        Ok(borrow)
    }

    /// Return a borrowed title: close the active borrow and restore the
    /// copy, committed atomically.
    pub async fn return_book(&self, user_id: Uuid, book_id: Uuid) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let borrow = sqlx::query_as::<_, Borrow>(
            r#"
            UPDATE borrows SET returned_at = NOW()
            WHERE user_id = $1 AND book_id = $2 AND returned_at IS NULL
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotBorrowed)?;

        // An active borrow implies available_copies < total_copies; zero
        // affected rows here means the counter drifted, so abort loudly.
        let updated = sqlx::query(
            "UPDATE books SET available_copies = available_copies + 1, updated_at = NOW() \
             WHERE id = $1 AND available_copies < total_copies",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::Internal(format!(
                "copy count out of sync for book {}",
                book_id
            )));
        }

        tx.commit().await?;

        Ok(borrow)
    }
}
