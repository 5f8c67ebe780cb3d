use super::user;
use sea_orm::entity::prelude::*;
use std::fmt;

/// An account record: a display name plus the opaque `hoge_id` integer.
/// Corresponds to Django's `AccountsModel`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// At most `USER_NAME_MAX_LENGTH` characters, never empty.
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub user_name: String,
    pub hoge_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// At most one user is linked to an account.
    #[sea_orm(has_one = "super::user::Entity")]
    User,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Accounts are labelled by their user name wherever they are listed.
impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_name)
    }
}
