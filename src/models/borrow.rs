//! Borrow (loan) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Borrow model from database.
///
/// A borrow is active while `returned_at` is null. For a given
/// (user_id, book_id) pair at most one active borrow exists; the store
/// enforces this with a partial unique index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Borrow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub borrowed_at: DateTime<Utc>,
    /// Computed at creation, never mutated afterwards
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

/// Due dates cross the wire as dd/mm/yyyy.
pub fn format_due_date(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Response body for a successful borrow
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowReceipt {
    pub success: bool,
    pub due_date: String,
    pub message: String,
}

/// Response body for a successful return
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReceipt {
    pub success: bool,
    pub returned_at: DateTime<Utc>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn due_date_wire_format_is_day_month_year() {
        let date = Utc.with_ymd_and_hms(2025, 1, 5, 23, 59, 0).unwrap();
        assert_eq!(format_due_date(date), "05/01/2025");
    }
}
