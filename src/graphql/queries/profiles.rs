use super::prelude::*;

#[derive(Default)]
pub struct ProfileQueries;

#[Object]
impl ProfileQueries {
    /// All profiles
    async fn profiles(&self, ctx: &Context<'_>) -> Result<Vec<Profile>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db.profiles().list().await.upstream()?;
        Ok(records.into_iter().map(Profile::from).collect())
    }

    /// Get a profile by ID
    async fn profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Profile>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db.profiles().get_by_id(id.as_str()).await.upstream()?;
        Ok(record.map(Profile::from))
    }
}
