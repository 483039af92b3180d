use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{self, PgPool};

use crate::{
    entities::post::{Post, PostInsert, PostUpdate},
    errors::AppError,
    repositories::sqlx_repo::SqlxPostRepo,
};

const POST_COLUMNS: &str = "id, title, description, image_url, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError>;
    async fn get_post_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;
    async fn get_all_posts(&self) -> Result<Vec<Post>, AppError>;
    async fn update_post(&self, id: i64, changes: &PostUpdate) -> Result<Post, AppError>;
    async fn delete_post(&self, id: i64) -> Result<(), AppError>;
    async fn count_posts(&self) -> Result<i64, AppError>;
}

#[async_trait]
impl<T> PostRepository for Arc<T>
where
    T: PostRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError> {
        (**self).create_post(post).await
    }

    async fn get_post_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        (**self).get_post_by_id(id).await
    }

    async fn get_all_posts(&self) -> Result<Vec<Post>, AppError> {
        (**self).get_all_posts().await
    }

    async fn update_post(&self, id: i64, changes: &PostUpdate) -> Result<Post, AppError> {
        (**self).update_post(id, changes).await
    }

    async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        (**self).delete_post(id).await
    }

    async fn count_posts(&self) -> Result<i64, AppError> {
        (**self).count_posts().await
    }
}

impl SqlxPostRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxPostRepo { pool }
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError> {
        let created = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (title, description, image_url)
            VALUES ($1, $2, $3)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.image_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_post_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn get_all_posts(&self) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn update_post(&self, id: i64, changes: &PostUpdate) -> Result<Post, AppError> {
        // COALESCE keeps columns the request did not supply
        let updated = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                image_url = COALESCE($3, image_url),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.image_url.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| AppError::post_not_found(id))
    }

    async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::post_not_found(id));
        }

        Ok(())
    }

    async fn count_posts(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
