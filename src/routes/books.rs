use actix_web::{web, HttpResponse};

use crate::books::{BookRequest, BookService};
use crate::error::AppError;
use crate::response::ok;

/// GET /api/v1/books
pub async fn list_books(books: web::Data<BookService>) -> Result<HttpResponse, AppError> {
    Ok(ok(books.list().await?))
}

/// POST /api/v1/books
pub async fn create_book(
    form: web::Json<BookRequest>,
    books: web::Data<BookService>,
) -> Result<HttpResponse, AppError> {
    let book = books.create(form.into_inner()).await?;
    Ok(ok(book))
}
