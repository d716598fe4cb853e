use campus_library::{
    adapters::memory::InMemoryLibrary,
    adapters::postgres::{
        PostgresBookRepository, PostgresBorrowStore, PostgresReaderRepository, run_migrations,
    },
    api::{handlers::AppState, router::create_router},
    application::borrowing::ServiceDependencies,
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_library=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let service_deps = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            ServiceDependencies {
                reader_repository: Arc::new(PostgresReaderRepository::new(pool.clone())),
                book_repository: Arc::new(PostgresBookRepository::new(pool.clone())),
                borrow_store: Arc::new(PostgresBorrowStore::new(pool)),
            }
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using in-memory store");
            let library = Arc::new(InMemoryLibrary::new());
            ServiceDependencies {
                reader_repository: library.clone(),
                book_repository: library.clone(),
                borrow_store: library,
            }
        }
    };

    let app_state = Arc::new(AppState { service_deps });
    let app = create_router(app_state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
