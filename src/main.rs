use bookshelf::auth::Rs256Keys;
use bookshelf::configuration::get_configuration;
use bookshelf::startup::{get_connection_pool, run, AppState, Stores};
use bookshelf::telemetry::init_telemetry;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

fn startup_error(kind: std::io::ErrorKind, message: &str) -> std::io::Error {
    std::io::Error::new(kind, message.to_string())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(startup_error(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    if let Err(e) = configuration.auth.validate() {
        tracing::error!("Invalid auth configuration: {}", e);
        return Err(startup_error(
            std::io::ErrorKind::InvalidInput,
            "Configuration error",
        ));
    }

    // Signing keys are loaded once; a broken key aborts startup
    let keys = Rs256Keys::from_files(
        &configuration.auth.private_key_path,
        &configuration.auth.public_key_path,
    )
    .map_err(|e| {
        tracing::error!("Failed to load signing keys: {}", e);
        startup_error(std::io::ErrorKind::InvalidData, "Signing key error")
    })?;
    let verifier = keys.verifier(&configuration.auth.issuer);
    tracing::info!(keys = ?keys, "Signing keys loaded");

    let pool = get_connection_pool(&configuration.database).map_err(|e| {
        tracing::error!("Failed to create connection pool: {}", e);
        startup_error(
            std::io::ErrorKind::ConnectionRefused,
            "Database connection error",
        )
    })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            startup_error(std::io::ErrorKind::Other, "Database migration error")
        })?;
    tracing::info!("Database migrations applied");

    let state = AppState::new(
        configuration.auth.clone(),
        Stores::postgres(pool),
        Arc::new(keys),
        verifier,
    );

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(
        listener,
        state,
        Duration::from_secs(configuration.application.request_timeout_secs),
    )?;
    tracing::info!("Server started successfully");

    server.await
}
