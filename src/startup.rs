use actix_web::dev::Server;
use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    middleware::Logger,
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{
    AccessTokenVerifier, AuthService, BcryptHasher, InMemoryRefreshTokenStore, KeyProvider,
    PasswordHasher, PgRefreshTokenStore, RefreshTokenStore,
};
use crate::books::{BookService, BookStore, InMemoryBookStore, PgBookStore};
use crate::configuration::{AuthSettings, DatabaseSettings};
use crate::error::{AppError, ValidationError};
use crate::logger::TransactionIdMiddleware;
use crate::middleware::JwtMiddleware;
use crate::response::{ApiResponse, NOT_FOUND_MSG};
use crate::routes::{
    create_book, create_user, delete_user, get_current_user, get_user, health_check, list_books,
    list_users, login, refresh, update_user,
};
use crate::users::{InMemoryUserStore, PgUserStore, UserService, UserStore};

/// Storage backends behind the services.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
    pub books: Arc<dyn BookStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            refresh_tokens: Arc::new(PgRefreshTokenStore::new(pool.clone())),
            books: Arc::new(PgBookStore::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            refresh_tokens: Arc::new(InMemoryRefreshTokenStore::new()),
            books: Arc::new(InMemoryBookStore::new()),
        }
    }
}

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: web::Data<AuthService>,
    pub users: web::Data<UserService>,
    pub books: web::Data<BookService>,
    pub token_verifier: Arc<AccessTokenVerifier>,
}

impl AppState {
    pub fn new(
        settings: AuthSettings,
        stores: Stores,
        keys: Arc<dyn KeyProvider>,
        token_verifier: AccessTokenVerifier,
    ) -> Self {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(settings.bcrypt_cost));

        let auth = AuthService::new(
            stores.users.clone(),
            stores.refresh_tokens,
            hasher.clone(),
            keys,
            settings,
        );

        Self {
            auth: web::Data::new(auth),
            users: web::Data::new(UserService::new(stores.users, hasher)),
            books: web::Data::new(BookService::new(stores.books)),
            token_verifier: Arc::new(token_verifier),
        }
    }
}

/// Lazily connected pool; the first query opens a connection.
pub fn get_connection_pool(configuration: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(configuration.max_connections)
        .acquire_timeout(Duration::from_secs(configuration.acquire_timeout_secs))
        .connect_lazy(&configuration.connection_string())
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationError::MalformedRequest(err.to_string())).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationError::MalformedRequest(err.to_string())).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationError::MalformedRequest(err.to_string())).into()
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error(NOT_FOUND_MSG))
}

pub fn run(
    listener: TcpListener,
    state: AppState,
    request_timeout: Duration,
) -> Result<Server, std::io::Error> {
    let server = HttpServer::new(move || {
        App::new()
            // Last wrap runs first, so the access log lands inside the transaction span
            .wrap(Logger::default())
            .wrap(TransactionIdMiddleware)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(state.auth.clone())
            .app_data(state.users.clone())
            .app_data(state.books.clone())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api/v1")
                    .route("/login", web::post().to(login))
                    .route("/refresh-token", web::post().to(refresh))
                    .service(
                        web::resource("/me")
                            .wrap(JwtMiddleware::new(state.token_verifier.clone()))
                            .route(web::get().to(get_current_user)),
                    )
                    .service(
                        web::resource("/books")
                            .route(web::get().to(list_books))
                            .route(web::post().to(create_book)),
                    )
                    .service(
                        web::resource("/users")
                            .route(web::get().to(list_users))
                            .route(web::post().to(create_user)),
                    )
                    .service(
                        web::resource("/users/{id}")
                            .route(web::get().to(get_user))
                            .route(web::put().to(update_user))
                            .route(web::delete().to(delete_user)),
                    ),
            )
            .default_service(web::route().to(not_found))
    })
    .client_request_timeout(request_timeout)
    .listen(listener)?
    .run();

    Ok(server)
}
