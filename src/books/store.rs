use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::books::model::{Book, NewBook};
use crate::error::AppError;

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every book, in insertion order.
    async fn list_all(&self) -> Result<Vec<Book>, AppError>;

    async fn create(&self, book: NewBook) -> Result<Book, AppError>;
}

pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list_all(&self) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>("SELECT id, title, author FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn create(&self, book: NewBook) -> Result<Book, AppError> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author)
            VALUES ($1, $2)
            RETURNING id, title, author
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}

#[derive(Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn list_all(&self) -> Result<Vec<Book>, AppError> {
        Ok(self.books.read().await.clone())
    }

    async fn create(&self, book: NewBook) -> Result<Book, AppError> {
        let mut books = self.books.write().await;
        let created = Book {
            id: books.len() as i64 + 1,
            title: book.title,
            author: book.author,
        };
        books.push(created.clone());

        Ok(created)
    }
}
