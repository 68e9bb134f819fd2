//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{Clock, PasswordService, SystemClock};
use blogicum_core::service::{AccountService, BlogService, CatalogService, Repositories};
use blogicum_infra::{Argon2PasswordService, DatabaseConnections, InMemoryStore};

#[cfg(feature = "postgres")]
use blogicum_infra::database::repositories;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub accounts: Arc<AccountService>,
    pub catalog: Arc<CatalogService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (db, repos) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let repos = repositories(connections.main.clone());
                    (Some(Arc::new(connections)), repos)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory store.",
                        e
                    );
                    (None, in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, repos) = {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory store");
            (None, in_memory())
        };

        tracing::info!(page_size = config.page_size, "Application state initialized");

        Self::with_repositories(repos, config.page_size, db)
    }

    /// Wire the services over the given store.
    pub fn with_repositories(
        repos: Repositories,
        page_size: u64,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            blog: Arc::new(BlogService::new(repos.clone(), clock.clone(), page_size)),
            accounts: Arc::new(AccountService::new(repos.clone(), passwords, clock.clone())),
            catalog: Arc::new(CatalogService::new(repos, clock)),
            db,
        }
    }
}

fn in_memory() -> Repositories {
    Arc::new(InMemoryStore::new()).repositories()
}
