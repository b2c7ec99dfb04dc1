use super::prelude::*;

#[derive(Default)]
pub struct PostQueries;

#[Object]
impl PostQueries {
    /// All posts
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db.posts().list().await.upstream()?;
        Ok(records.into_iter().map(Post::from).collect())
    }

    /// Get a post by ID
    async fn post(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Post>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db.posts().get_by_id(id.as_str()).await.upstream()?;
        Ok(record.map(Post::from))
    }
}
