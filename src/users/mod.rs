/// User records, their storage and the management service.

mod model;
mod service;
mod store;

pub use model::{
    CreateUserRequest, NewUser, UpdateUserRequest, UserRecord, UserResponse, UserStatus,
    UserUpdate, DEFAULT_ROLE,
};
pub use service::UserService;
pub use store::{InMemoryUserStore, PgUserStore, UserStore};
