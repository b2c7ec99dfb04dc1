use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// All users.
    ///
    /// Goes through the request's batched loader cache: every resolution of
    /// this field with the same sub-selection shares one database fetch, and
    /// subscription edges are only loaded when they were selected.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let request = ctx.request_context()?;
        let field = ctx.field();
        let fields = RequestFieldSet::from_selection(field);
        let selection = SelectionKey::for_field(field);

        let db = ctx.data_unchecked::<Database>().clone();
        let page = request
            .user_lists()
            .load(&selection, &fields, move |fields| {
                let include = UserInclude::from(fields);
                async move {
                    let entries = db.users().list(include).await?;
                    Ok::<_, anyhow::Error>(Arc::new(UserPage::new(entries)))
                }
            })
            .await
            .upstream()?;

        request.record_user_fields(&fields);
        Ok(UserPage::users(&page))
    }

    /// Get a user by ID
    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<User>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db.users().get_by_id(id.as_str()).await.upstream()?;
        Ok(record.map(User::from))
    }
}
