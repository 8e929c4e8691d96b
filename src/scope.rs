use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Permission strings accepted by the authorize endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Scope {
    Basic,
    Likes,
    Comments,
    Relationships,
    PublicContent,
    FollowerList,
}

/// Relationship modification verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Follow,
    Unfollow,
    Block,
    Unblock,
    Approve,
    Deny,
}
