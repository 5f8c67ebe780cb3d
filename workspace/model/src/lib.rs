pub mod entities;

/// Maximum number of characters stored in a `user_name` column.
pub const USER_NAME_MAX_LENGTH: usize = 20;
