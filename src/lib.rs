pub mod auth;
pub mod books;
pub mod configuration;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod users;
pub mod validators;
