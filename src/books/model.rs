use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validators::is_valid_text;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

/// Validated insert payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

impl BookRequest {
    pub fn validate(&self) -> Result<NewBook, ValidationError> {
        Ok(NewBook {
            title: is_valid_text("title", &self.title)?,
            author: is_valid_text("author", &self.author)?,
        })
    }
}
