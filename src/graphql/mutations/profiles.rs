use super::prelude::*;

#[derive(Default)]
pub struct ProfileMutations;

#[Object]
impl ProfileMutations {
    /// Create a profile for a user
    async fn create_profile(&self, ctx: &Context<'_>, dto: CreateProfileInput) -> Result<Profile> {
        let db = ctx.data_unchecked::<Database>();
        let record = db.profiles().create(dto.into()).await.upstream()?;
        tracing::info!(profile_id = %record.id, user_id = %record.user_id, "Profile created");
        Ok(Profile::from(record))
    }

    /// Update a profile
    async fn change_profile(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeProfileInput,
    ) -> Result<Profile> {
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .profiles()
            .update(id.as_str(), dto.into())
            .await
            .upstream()?;
        Ok(Profile::from(record))
    }

    /// Delete a profile
    async fn delete_profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let db = ctx.data_unchecked::<Database>();
        db.profiles().delete(id.as_str()).await.upstream()?;
        tracing::info!(profile_id = %id, "Profile deleted");
        Ok(true)
    }
}
