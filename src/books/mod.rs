/// Book catalog: model, storage and service.

mod model;
mod store;

use std::sync::Arc;

use crate::error::AppError;

pub use model::{Book, BookRequest, NewBook};
pub use store::{BookStore, InMemoryBookStore, PgBookStore};

pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Book>, AppError> {
        self.store.list_all().await
    }

    pub async fn create(&self, request: BookRequest) -> Result<Book, AppError> {
        let book = self.store.create(request.validate()?).await?;
        tracing::info!(book_id = book.id, "Book created");
        Ok(book)
    }
}
