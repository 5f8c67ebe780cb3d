use model::entities::{account, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::{clean_user_name, validate_user_name, Result, StoreError};

const ENTITY: &str = "User";

/// Fields of a new user
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    /// Display name, 1 to 20 characters
    #[validate(custom(function = "validate_user_name"))]
    #[schema(example = "taro", max_length = 20)]
    pub user_name: String,
    /// Opaque integer attribute
    #[schema(example = 1)]
    pub hoge_id: i32,
    /// Account this user is linked to; no other user may reference it
    #[schema(example = 1)]
    pub account_id: i32,
}

/// Partial update of a user; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[validate(custom(function = "validate_user_name"))]
    #[schema(max_length = 20)]
    pub user_name: Option<String>,
    pub hoge_id: Option<i32>,
    pub account_id: Option<i32>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none() && self.hoge_id.is_none() && self.account_id.is_none()
    }
}

fn account_taken(account_id: i32) -> StoreError {
    StoreError::validation(
        "accountId",
        format!("User with this account (ID {account_id}) already exists."),
    )
}

/// Translate constraint violations raised by the database into store errors.
fn map_write_error(err: DbErr, account_id: i32) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => account_taken(account_id),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => StoreError::NotFound {
            entity: "Account",
            id: account_id,
        },
        _ => StoreError::Database(err),
    }
}

/// Check that `account_id` exists and is not linked to a user other than `except`.
async fn ensure_account_available<C>(db: &C, account_id: i32, except: Option<i32>) -> Result<()>
where
    C: ConnectionTrait,
{
    trace!("Checking availability of account ID: {}", account_id);
    if account::Entity::find_by_id(account_id).one(db).await?.is_none() {
        warn!("Referenced account with ID {} does not exist", account_id);
        return Err(StoreError::NotFound {
            entity: "Account",
            id: account_id,
        });
    }

    let mut holders = user::Entity::find().filter(user::Column::AccountId.eq(account_id));
    if let Some(user_id) = except {
        holders = holders.filter(user::Column::Id.ne(user_id));
    }
    if let Some(holder) = holders.one(db).await? {
        warn!("Account ID {} is already linked to user ID {}", account_id, holder.id);
        return Err(account_taken(account_id));
    }
    Ok(())
}

/// CRUD operations over `users`.
pub struct UserStore<'a, C> {
    db: &'a C,
}

impl<'a, C> UserStore<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All users in insertion order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<user::Model>> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db)
            .await?;
        debug!("Retrieved {} users from database", users.len());
        Ok(users)
    }

    /// One page (1-based) of users with their accounts, plus the total count.
    #[instrument(skip(self))]
    pub async fn list_page_with_accounts(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<(user::Model, Option<account::Model>)>, u64)> {
        let paginator = user::Entity::find()
            .find_also_related(account::Entity)
            .order_by_asc(user::Column::Id)
            .paginate(self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        debug!("Fetched page {} with {} of {} users", page, rows.len(), total);
        Ok((rows, total))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(user::Entity::find().count(self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<user::Model> {
        trace!("Looking up user with ID: {}", id);
        user::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })
    }

    #[instrument(skip(self))]
    pub async fn create(&self, form: UserForm) -> Result<user::Model> {
        form.validate()?;

        let txn = self.db.begin().await?;
        ensure_account_available(&txn, form.account_id, None).await?;

        let account_id = form.account_id;
        let created = user::ActiveModel {
            user_name: Set(clean_user_name(form.user_name)),
            hoge_id: Set(form.hoge_id),
            account_id: Set(account_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| map_write_error(e, account_id))?;
        txn.commit().await?;

        info!(
            "User created with ID: {}, user_name: {}, account_id: {}",
            created.id, created.user_name, created.account_id
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: UserChanges) -> Result<user::Model> {
        changes.validate()?;

        let txn = self.db.begin().await?;
        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })?;
        if changes.is_empty() {
            debug!("No fields to update for user ID: {}", id);
            return Ok(existing);
        }

        let account_id = changes.account_id.unwrap_or(existing.account_id);
        if account_id != existing.account_id {
            ensure_account_available(&txn, account_id, Some(id)).await?;
        }

        let mut active: user::ActiveModel = existing.into();
        if let Some(user_name) = changes.user_name {
            active.user_name = Set(clean_user_name(user_name));
        }
        if let Some(hoge_id) = changes.hoge_id {
            active.hoge_id = Set(hoge_id);
        }
        if changes.account_id.is_some() {
            active.account_id = Set(account_id);
        }

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| map_write_error(e, account_id))?;
        txn.commit().await?;

        info!("User with ID {} updated", id);
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<user::Model> {
        let existing = self.get(id).await?;
        user::Entity::delete_by_id(id).exec(self.db).await?;
        info!("User with ID {} deleted", id);
        Ok(existing)
    }
}
