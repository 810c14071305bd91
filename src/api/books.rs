//! Lending endpoints: catalog listing, detail, borrow, return

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{BookDetail, BookListResponse, BookQuery},
        borrow::{BorrowReceipt, ReturnReceipt},
    },
};

use super::AuthenticatedUser;

/// List books with search, availability filter and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Paginated book listing", body = BookListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookListResponse>> {
    let user_id = claims.user_id()?;

    let listing = state.services.library.list_books(user_id, &query).await?;
    Ok(Json(listing))
}

/// Get book details, including whether the caller holds it
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_detail(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<Uuid>,
) -> AppResult<Json<BookDetail>> {
    let user_id = claims.user_id()?;

    let detail = state.services.library.get_book_detail(user_id, book_id).await?;
    Ok(Json(detail))
}

/// Borrow one copy of a book
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Borrow succeeded", body = BorrowReceipt),
        (status = 400, description = "Already borrowed, unavailable, or unknown book"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<Uuid>,
) -> AppResult<Json<BorrowReceipt>> {
    let user_id = claims.user_id()?;

    let receipt = state.services.library.borrow_book(user_id, book_id).await?;
    Ok(Json(receipt))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Return succeeded", body = ReturnReceipt),
        (status = 400, description = "No active borrow or unknown book"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<Uuid>,
) -> AppResult<Json<ReturnReceipt>> {
    let user_id = claims.user_id()?;

    let receipt = state.services.library.return_book(user_id, book_id).await?;
    Ok(Json(receipt))
}
