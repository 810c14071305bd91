//! Books repository for catalog reads

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::book::Book};

/// Search terms are literal substrings; LIKE wildcards in user input
/// must not widen the match.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Search the catalog with pagination.
    ///
    /// `search` matches title or author case-insensitively as a substring;
    /// `only_available` restricts to titles with copies left. Results are
    /// ordered by title ascending. Returns the page plus the total match
    /// count.
    pub async fn search(
        &self,
        search: Option<&str>,
        only_available: bool,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Book>, i64)> {
        let pattern = search.map(escape_like);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM books
            WHERE ($1::text IS NULL
                   OR title ILIKE '%' || $1 || '%' ESCAPE '\'
                   OR author ILIKE '%' || $1 || '%' ESCAPE '\')
              AND (NOT $2 OR available_copies > 0)
            "#,
        )
        .bind(&pattern)
        .bind(only_available)
        .fetch_one(&self.pool)
        .await?;

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT *
            FROM books
            WHERE ($1::text IS NULL
                   OR title ILIKE '%' || $1 || '%' ESCAPE '\'
                   OR author ILIKE '%' || $1 || '%' ESCAPE '\')
              AND (NOT $2 OR available_copies > 0)
            ORDER BY title ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&pattern)
        .bind(only_available)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((books, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped_literally() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("C_programming"), "C\\_programming");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain words"), "plain words");
    }
}
