use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, storage, web};

use auth::jwt::JwtService;
use repositories::{post::PostRepository, user::UserRepository};
use shared_repos::SharedRepositories;
use storage::{ImageStorage, LocalDiskStorage};
use use_cases::{auth::AuthHandler, posts::PostHandler};

pub struct AppState {
    pub post_handler: AppPostHandler,
    pub auth_handler: AppAuthHandler,
    pub max_upload_bytes: usize,
}

pub type AppPostHandler = PostHandler<Arc<dyn PostRepository>, Arc<dyn ImageStorage>>;
pub type AppAuthHandler = AuthHandler<Arc<dyn UserRepository>, JwtService>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let repos = SharedRepositories::new(pool);
        let storage = Arc::new(LocalDiskStorage::new(config.storage_root.clone()));

        Self::from_parts(config, repos, storage)
    }

    /// Wires handlers from already-built collaborators.
    pub fn from_parts(
        config: &settings::AppConfig,
        repos: SharedRepositories,
        storage: Arc<dyn ImageStorage>,
    ) -> Self {
        let jwt_service = JwtService::new(config);

        AppState {
            post_handler: PostHandler::new(repos.post_repo, storage),
            auth_handler: AuthHandler::new(repos.user_repo, jwt_service),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
