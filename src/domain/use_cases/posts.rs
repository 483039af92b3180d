use tracing::{info, instrument};
use validator::Validate;

use crate::{
    constants::IMAGES_DIR,
    entities::{
        post::{Post, StorePostRequest, UpdatePostRequest},
        upload::UploadedFile,
    },
    errors::AppError,
    repositories::post::PostRepository,
    storage::ImageStorage,
};

pub struct PostHandler<R, S>
where
    R: PostRepository,
    S: ImageStorage,
{
    pub post_repo: R,
    pub storage: S,
}

impl<R, S> PostHandler<R, S>
where
    R: PostRepository,
    S: ImageStorage,
{
    pub fn new(post_repo: R, storage: S) -> Self {
        PostHandler { post_repo, storage }
    }

    /// Validates the request, stores the image if any, then inserts the row.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn store_post(&self, request: StorePostRequest) -> Result<Post, AppError> {
        request.validate()?;

        let (mut insert, image) = request.into_parts();
        insert.image_url = self.store_image(image.as_ref()).await?;

        let post = self.post_repo.create_post(&insert).await?;
        info!(post_id = post.id, has_image = post.image_url.is_some(), "Post created");

        Ok(post)
    }

    /// Applies the supplied fields to an existing post.
    /// A missing image keeps the current one.
    #[instrument(skip(self, request))]
    pub async fn update_post(&self, id: i64, request: UpdatePostRequest) -> Result<Post, AppError> {
        self.find_post(id).await?;
        request.validate()?;

        let (mut update, image) = request.into_parts();
        update.image_url = self.store_image(image.as_ref()).await?;

        let post = self.post_repo.update_post(id, &update).await?;
        info!(post_id = post.id, "Post updated");

        Ok(post)
    }

    pub async fn find_post(&self, id: i64) -> Result<Post, AppError> {
        self.post_repo
            .get_post_by_id(id)
            .await?
            .ok_or_else(|| AppError::post_not_found(id))
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        self.post_repo.get_all_posts().await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        self.post_repo.delete_post(id).await?;
        info!(post_id = id, "Post deleted");
        Ok(())
    }

    pub async fn count_posts(&self) -> Result<i64, AppError> {
        self.post_repo.count_posts().await
    }

    pub async fn check_connection(&self) -> Result<(), AppError> {
        self.post_repo.check_connection().await
    }

    async fn store_image(&self, image: Option<&UploadedFile>) -> Result<Option<String>, AppError> {
        match image {
            Some(file) => {
                let path = self.storage.put(IMAGES_DIR, file).await?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}
