use model::entities::{account, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use super::{clean_user_name, validate_user_name, Result, StoreError};

const ENTITY: &str = "Account";

/// Fields of a new account (the admin "add" form)
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountForm {
    /// Display name, 1 to 20 characters
    #[validate(custom(function = "validate_user_name"))]
    #[schema(example = "taro", max_length = 20)]
    pub user_name: String,
    /// Opaque integer attribute
    #[schema(example = 1)]
    pub hoge_id: i32,
}

/// Partial update of an account; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountChanges {
    #[validate(custom(function = "validate_user_name"))]
    #[schema(max_length = 20)]
    pub user_name: Option<String>,
    pub hoge_id: Option<i32>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none() && self.hoge_id.is_none()
    }
}

/// Result of deleting an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDeletion {
    pub account: account::Model,
    /// Number of users removed along with the account
    pub cascaded_users: u64,
}

/// Whether a save with an explicit primary key created or overwrote a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// CRUD operations over `accounts`.
pub struct AccountStore<'a, C> {
    db: &'a C,
}

impl<'a, C> AccountStore<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All accounts in insertion order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<account::Model>> {
        let accounts = account::Entity::find()
            .order_by_asc(account::Column::Id)
            .all(self.db)
            .await?;
        debug!("Retrieved {} accounts from database", accounts.len());
        Ok(accounts)
    }

    /// One page (1-based) of accounts in insertion order, plus the total count.
    #[instrument(skip(self))]
    pub async fn list_page(&self, page: u64, per_page: u64) -> Result<(Vec<account::Model>, u64)> {
        let paginator = account::Entity::find()
            .order_by_asc(account::Column::Id)
            .paginate(self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let accounts = paginator.fetch_page(page.saturating_sub(1)).await?;
        debug!("Fetched page {} with {} of {} accounts", page, accounts.len(), total);
        Ok((accounts, total))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(account::Entity::find().count(self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<account::Model> {
        trace!("Looking up account with ID: {}", id);
        account::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })
    }

    #[instrument(skip(self))]
    pub async fn create(&self, form: AccountForm) -> Result<account::Model> {
        form.validate()?;

        let created = account::ActiveModel {
            user_name: Set(clean_user_name(form.user_name)),
            hoge_id: Set(form.hoge_id),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        info!("Account created with ID: {}, user_name: {}", created.id, created);
        Ok(created)
    }

    /// Apply `changes` to the account; the stored row is untouched when validation fails.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: AccountChanges) -> Result<account::Model> {
        changes.validate()?;

        let existing = self.get(id).await?;
        if changes.is_empty() {
            debug!("No fields to update for account ID: {}", id);
            return Ok(existing);
        }

        let mut active: account::ActiveModel = existing.into();
        if let Some(user_name) = changes.user_name {
            active.user_name = Set(clean_user_name(user_name));
        }
        if let Some(hoge_id) = changes.hoge_id {
            active.hoge_id = Set(hoge_id);
        }

        let updated = active.update(self.db).await?;
        info!("Account with ID {} updated", id);
        Ok(updated)
    }

    /// Delete the account together with the user linked to it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<AccountDeletion> {
        let txn = self.db.begin().await?;

        let account = account::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })?;

        // The foreign key cascades as well; deleting here keeps backends
        // without enforced foreign keys consistent.
        let cascaded = user::Entity::delete_many()
            .filter(user::Column::AccountId.eq(id))
            .exec(&txn)
            .await?;
        account.clone().delete(&txn).await?;
        txn.commit().await?;

        info!(
            "Account with ID {} deleted along with {} linked user(s)",
            id, cascaded.rows_affected
        );
        Ok(AccountDeletion {
            account,
            cascaded_users: cascaded.rows_affected,
        })
    }

    /// Insert or overwrite the account with a caller-chosen primary key.
    #[instrument(skip(self))]
    pub async fn save_with_id(&self, id: i32, form: AccountForm) -> Result<SaveOutcome> {
        form.validate()?;

        match account::Entity::find_by_id(id).one(self.db).await? {
            Some(existing) => {
                let mut active: account::ActiveModel = existing.into();
                active.user_name = Set(clean_user_name(form.user_name));
                active.hoge_id = Set(form.hoge_id);
                active.update(self.db).await?;
                debug!("Overwrote account with ID {}", id);
                Ok(SaveOutcome::Updated)
            }
            None => {
                account::ActiveModel {
                    id: Set(id),
                    user_name: Set(clean_user_name(form.user_name)),
                    hoge_id: Set(form.hoge_id),
                }
                .insert(self.db)
                .await?;
                debug!("Inserted account with ID {}", id);
                Ok(SaveOutcome::Created)
            }
        }
    }
}
