//! SeaORM entities for the accounts admin.
//! Both tables mirror the Django `accounts` app: `AccountsModel` plus the
//! user record linked to it one-to-one.

pub mod account;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::user::Entity as User;
}
