use super::prelude::*;

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    /// Create a user
    async fn create_user(&self, ctx: &Context<'_>, dto: CreateUserInput) -> Result<User> {
        let db = ctx.data_unchecked::<Database>();
        let record = db.users().create(dto.into()).await.upstream()?;
        tracing::info!(user_id = %record.id, "User created");
        Ok(User::from(record))
    }

    /// Update a user
    async fn change_user(&self, ctx: &Context<'_>, id: Uuid, dto: ChangeUserInput) -> Result<User> {
        let db = ctx.data_unchecked::<Database>();
        let record = db.users().update(id.as_str(), dto.into()).await.upstream()?;
        Ok(User::from(record))
    }

    /// Delete a user along with their profile, posts and subscriptions
    async fn delete_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let db = ctx.data_unchecked::<Database>();
        db.users().delete(id.as_str()).await.upstream()?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(true)
    }

    /// Subscribe `user_id` to `author_id` and return the subscriber
    async fn subscribe_to(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<User>> {
        let db = ctx.data_unchecked::<Database>();
        db.subscriptions()
            .create(user_id.as_str(), author_id.as_str())
            .await
            .upstream()?;
        tracing::info!(subscriber_id = %user_id, author_id = %author_id, "Subscription created");

        let record = db.users().get_by_id(user_id.as_str()).await.upstream()?;
        Ok(record.map(User::from))
    }

    /// Remove the subscription of `user_id` to `author_id`
    async fn unsubscribe_from(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool> {
        let db = ctx.data_unchecked::<Database>();
        db.subscriptions()
            .delete(user_id.as_str(), author_id.as_str())
            .await
            .upstream()?;
        tracing::info!(subscriber_id = %user_id, author_id = %author_id, "Subscription removed");
        Ok(true)
    }
}
