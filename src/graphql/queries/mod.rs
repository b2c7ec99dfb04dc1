pub mod member_types;
pub mod posts;
pub mod profiles;
pub mod users;

pub use member_types::MemberTypeQueries;
pub use posts::PostQueries;
pub use profiles::ProfileQueries;
pub use users::UserQueries;

pub(crate) mod prelude {
    pub(crate) use std::sync::Arc;

    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::db::*;
    pub(crate) use crate::graphql::context::RequestContextExt;
    pub(crate) use crate::graphql::errors::UpstreamExt;
    pub(crate) use crate::graphql::loader_cache::{RequestFieldSet, SelectionKey};
    pub(crate) use crate::graphql::scalars::{MemberTypeId, Uuid};
    pub(crate) use crate::graphql::types::*;
}
