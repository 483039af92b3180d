use std::sync::Arc;

use crate::repositories::{
    post::PostRepository,
    sqlx_repo::{SqlxPostRepo, SqlxUserRepo},
    user::UserRepository,
};

/// Repositories backed by one Postgres pool.
#[derive(Clone)]
pub struct SharedRepositories {
    pub post_repo: Arc<dyn PostRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        let post_repo = SqlxPostRepo::new(pool.clone());
        let user_repo = SqlxUserRepo::new(pool);

        SharedRepositories {
            post_repo: Arc::new(post_repo),
            user_repo: Arc::new(user_repo),
        }
    }
}
