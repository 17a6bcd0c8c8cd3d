mod auth;
mod books;
mod health_check;
mod users;

pub use auth::{get_current_user, login, refresh};
pub use books::{create_book, list_books};
pub use health_check::health_check;
pub use users::{create_user, delete_user, get_user, list_users, update_user};
