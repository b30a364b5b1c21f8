use std::{process, sync::Arc};

use bibliotek::{
    application::{
        auth::AuthService,
        authors::AuthorService,
        books::BookService,
        error::AppError,
        repos::{AuthorsRepo, BooksRepo, TokensRepo, UsersRepo},
        users::UserService,
    },
    cache::BookCacheStore,
    config,
    infra::{
        error::InfraError,
        http::{self, AppState},
        images::PngScaler,
        memory::MemoryStore,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let state = build_state(&settings);
    serve_http(&settings, state).await
}

fn build_state(settings: &config::Settings) -> AppState {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(BookCacheStore::default());

    let books_repo: Arc<dyn BooksRepo> = store.clone();
    let authors_repo: Arc<dyn AuthorsRepo> = store.clone();
    let users_repo: Arc<dyn UsersRepo> = store.clone();
    let tokens_repo: Arc<dyn TokensRepo> = store.clone();

    let auth = AuthService::new(users_repo.clone(), tokens_repo);
    let books = BookService::new(books_repo.clone(), authors_repo.clone(), cache);
    let authors = AuthorService::new(authors_repo, books_repo);
    let users = UserService::new(users_repo, auth.clone());

    AppState {
        books,
        authors,
        users,
        auth,
        images: Arc::new(PngScaler::new()),
        max_image_bytes: settings.uploads.max_image_bytes,
    }
}

async fn serve_http(settings: &config::Settings, state: AppState) -> Result<(), AppError> {
    let router = http::router(state);

    let addr = (settings.server.host.as_str(), settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    let local_addr = listener
        .local_addr()
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(addr = %local_addr, "catalog server listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
