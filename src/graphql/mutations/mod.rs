pub mod posts;
pub mod profiles;
pub mod users;

pub use posts::PostMutations;
pub use profiles::ProfileMutations;
pub use users::UserMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::db::*;
    pub(crate) use crate::graphql::errors::UpstreamExt;
    pub(crate) use crate::graphql::scalars::Uuid;
    pub(crate) use crate::graphql::types::*;
}
