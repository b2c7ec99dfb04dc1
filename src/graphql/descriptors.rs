//! Static field descriptors for the four entity kinds
//!
//! These tables name every selectable field and its kind. They are plain data
//! evaluated once; resolvers consult them to decide which relations a list
//! fetch must include.

use crate::db::UserInclude;

use super::loader_cache::RequestFieldSet;

/// Kind of a selectable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Leaf value of the named scalar type
    Scalar(&'static str),
    /// Single related entity (nullable)
    Object(&'static str),
    /// List of related entities
    List(&'static str),
}

impl FieldKind {
    pub fn is_relation(&self) -> bool {
        !matches!(self, FieldKind::Scalar(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Shape of one entity kind and the root fields that expose it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub type_name: &'static str,
    /// Root query field returning the list form
    pub list_field: &'static str,
    /// Root query field returning a single entity by id
    pub item_field: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relations(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.kind.is_relation())
    }
}

const fn scalar(name: &'static str, ty: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        kind: FieldKind::Scalar(ty),
    }
}

const fn object(name: &'static str, ty: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        kind: FieldKind::Object(ty),
    }
}

const fn list(name: &'static str, ty: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        kind: FieldKind::List(ty),
    }
}

/// Subscribers of a user
pub const SUBSCRIBED_TO_USER: &str = "subscribedToUser";
/// Authors a user follows
pub const USER_SUBSCRIBED_TO: &str = "userSubscribedTo";

pub static MEMBER_TYPE: EntityDescriptor = EntityDescriptor {
    type_name: "MemberType",
    list_field: "memberTypes",
    item_field: "memberType",
    fields: &[
        scalar("id", "MemberTypeId"),
        scalar("discount", "Float"),
        scalar("postsLimitPerMonth", "Int"),
        list("profiles", "Profile"),
    ],
};

pub static POST: EntityDescriptor = EntityDescriptor {
    type_name: "Post",
    list_field: "posts",
    item_field: "post",
    fields: &[
        scalar("id", "UUID"),
        scalar("title", "String"),
        scalar("content", "String"),
        scalar("authorId", "UUID"),
        object("author", "User"),
    ],
};

pub static PROFILE: EntityDescriptor = EntityDescriptor {
    type_name: "Profile",
    list_field: "profiles",
    item_field: "profile",
    fields: &[
        scalar("id", "UUID"),
        scalar("isMale", "Boolean"),
        scalar("yearOfBirth", "Int"),
        scalar("userId", "UUID"),
        scalar("memberTypeId", "MemberTypeId"),
        object("user", "User"),
        object("memberType", "MemberType"),
    ],
};

pub static USER: EntityDescriptor = EntityDescriptor {
    type_name: "User",
    list_field: "users",
    item_field: "user",
    fields: &[
        scalar("id", "UUID"),
        scalar("name", "String"),
        scalar("balance", "Float"),
        object("profile", "Profile"),
        list("posts", "Post"),
        list(USER_SUBSCRIBED_TO, "User"),
        list(SUBSCRIBED_TO_USER, "User"),
    ],
};

pub static ENTITIES: [&EntityDescriptor; 4] = [&MEMBER_TYPE, &POST, &PROFILE, &USER];

impl From<&RequestFieldSet> for UserInclude {
    /// Include a subscription edge list only when its field was requested
    fn from(fields: &RequestFieldSet) -> Self {
        UserInclude {
            subscribed_to_user: fields.contains(SUBSCRIBED_TO_USER),
            user_subscribed_to: fields.contains(USER_SUBSCRIBED_TO),
        }
    }
}
