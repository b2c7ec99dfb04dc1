//! Mutation payloads
//!
//! Each input converts straight into the repository's create/update struct.
//! Identifier fields are typed with the custom scalars so malformed values are
//! rejected before they reach the database.

use async_graphql::InputObject;

use crate::db::{CreatePost, CreateProfile, CreateUser, UpdatePost, UpdateProfile, UpdateUser};
use crate::graphql::scalars::{MemberTypeId, Uuid};

#[derive(Debug, InputObject)]
pub struct CreateUserInput {
    pub name: String,
    pub balance: f64,
}

#[derive(Debug, InputObject)]
pub struct ChangeUserInput {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

#[derive(Debug, InputObject)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

#[derive(Debug, InputObject)]
pub struct ChangePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, InputObject)]
pub struct CreateProfileInput {
    pub is_male: bool,
    pub year_of_birth: i32,
    pub user_id: Uuid,
    pub member_type_id: MemberTypeId,
}

#[derive(Debug, InputObject)]
pub struct ChangeProfileInput {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<MemberTypeId>,
}

impl From<CreateUserInput> for CreateUser {
    fn from(input: CreateUserInput) -> Self {
        CreateUser {
            name: input.name,
            balance: input.balance,
        }
    }
}

impl From<ChangeUserInput> for UpdateUser {
    fn from(input: ChangeUserInput) -> Self {
        UpdateUser {
            name: input.name,
            balance: input.balance,
        }
    }
}

impl From<CreatePostInput> for CreatePost {
    fn from(input: CreatePostInput) -> Self {
        CreatePost {
            title: input.title,
            content: input.content,
            author_id: input.author_id.into_inner(),
        }
    }
}

impl From<ChangePostInput> for UpdatePost {
    fn from(input: ChangePostInput) -> Self {
        UpdatePost {
            title: input.title,
            content: input.content,
        }
    }
}

impl From<CreateProfileInput> for CreateProfile {
    fn from(input: CreateProfileInput) -> Self {
        CreateProfile {
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            user_id: input.user_id.into_inner(),
            member_type_id: input.member_type_id.as_str().to_string(),
        }
    }
}

impl From<ChangeProfileInput> for UpdateProfile {
    fn from(input: ChangeProfileInput) -> Self {
        UpdateProfile {
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            member_type_id: input.member_type_id.map(|id| id.as_str().to_string()),
        }
    }
}
