use super::prelude::*;

#[derive(Default)]
pub struct PostMutations;

#[Object]
impl PostMutations {
    /// Create a post
    async fn create_post(&self, ctx: &Context<'_>, dto: CreatePostInput) -> Result<Post> {
        let db = ctx.data_unchecked::<Database>();
        let record = db.posts().create(dto.into()).await.upstream()?;
        tracing::info!(post_id = %record.id, "Post created");
        Ok(Post::from(record))
    }

    /// Update a post
    async fn change_post(&self, ctx: &Context<'_>, id: Uuid, dto: ChangePostInput) -> Result<Post> {
        let db = ctx.data_unchecked::<Database>();
        let record = db.posts().update(id.as_str(), dto.into()).await.upstream()?;
        Ok(Post::from(record))
    }

    /// Delete a post
    async fn delete_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let db = ctx.data_unchecked::<Database>();
        db.posts().delete(id.as_str()).await.upstream()?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(true)
    }
}
