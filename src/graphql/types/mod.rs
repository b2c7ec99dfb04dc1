//! GraphQL object and input types

mod inputs;
mod member_type;
mod post;
mod profile;
mod user;

pub use inputs::{
    ChangePostInput, ChangeProfileInput, ChangeUserInput, CreatePostInput, CreateProfileInput,
    CreateUserInput,
};
pub use member_type::MemberType;
pub use post::Post;
pub use profile::Profile;
pub use user::{User, UserPage};
