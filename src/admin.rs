//! Admin registrations: which models are exposed and which columns their
//! change lists display.

use model::entities::{account, user};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

/// One column of a change list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListColumn {
    /// Field name as it appears in API payloads
    pub field: &'static str,
    /// Column header
    pub label: &'static str,
}

/// A model registered with the admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelAdmin {
    pub name: &'static str,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    /// Columns shown by the change list
    pub list_display: &'static [ListColumn],
    /// JSON CRUD collection backing the add/change/delete forms
    pub api_path: &'static str,
}

pub const ACCOUNTS_ADMIN: ModelAdmin = ModelAdmin {
    name: "accounts",
    verbose_name: "accounts model",
    verbose_name_plural: "accounts models",
    list_display: &[
        ListColumn {
            field: "userName",
            label: "UserName",
        },
        ListColumn {
            field: "hogeId",
            label: "hoge id",
        },
    ],
    api_path: "/api/v1/accounts",
};

pub const USERS_ADMIN: ModelAdmin = ModelAdmin {
    name: "users",
    verbose_name: "user",
    verbose_name_plural: "users",
    list_display: &[
        ListColumn {
            field: "userName",
            label: "UserName",
        },
        ListColumn {
            field: "hogeId",
            label: "hoge id",
        },
        ListColumn {
            field: "account",
            label: "account",
        },
    ],
    api_path: "/api/v1/users",
};

impl ModelAdmin {
    pub fn changelist_path(&self) -> String {
        format!("/admin/{}", self.name)
    }

    fn columns(&self) -> Vec<AdminColumn> {
        self.list_display
            .iter()
            .map(|c| AdminColumn {
                field: c.field.to_string(),
                label: c.label.to_string(),
            })
            .collect()
    }

    /// Assemble a change list page from already-built rows.
    pub fn table(&self, rows: Vec<AdminRow>, page: u64, per_page: u64, total: u64) -> AdminTable {
        AdminTable {
            model: self.name.to_string(),
            verbose_name_plural: self.verbose_name_plural.to_string(),
            columns: self.columns(),
            rows,
            page,
            per_page,
            total,
        }
    }
}

/// Column header of an admin table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AdminColumn {
    pub field: String,
    pub label: String,
}

/// One row of an admin table; `cells` line up with the table's columns
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AdminRow {
    pub id: i32,
    /// Human-readable label of the record
    pub label: String,
    #[schema(value_type = Vec<Object>)]
    pub cells: Vec<Value>,
}

/// A page of a change list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminTable {
    pub model: String,
    pub verbose_name_plural: String,
    pub columns: Vec<AdminColumn>,
    pub rows: Vec<AdminRow>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// Entry of the admin index
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminModelEntry {
    pub name: String,
    pub verbose_name: String,
    pub verbose_name_plural: String,
    pub changelist_url: String,
    pub api_url: String,
    pub count: u64,
}

/// Models registered with the admin
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AdminIndex {
    pub models: Vec<AdminModelEntry>,
}

impl AdminModelEntry {
    pub fn new(admin: &ModelAdmin, count: u64) -> Self {
        Self {
            name: admin.name.to_string(),
            verbose_name: admin.verbose_name.to_string(),
            verbose_name_plural: admin.verbose_name_plural.to_string(),
            changelist_url: admin.changelist_path(),
            api_url: admin.api_path.to_string(),
            count,
        }
    }
}

pub fn account_row(account: &account::Model) -> AdminRow {
    AdminRow {
        id: account.id,
        label: account.to_string(),
        cells: vec![json!(account.user_name), json!(account.hoge_id)],
    }
}

/// Users are labelled by their own name; the account column shows the account's label.
pub fn user_row(user: &user::Model, account: Option<&account::Model>) -> AdminRow {
    let account_label = account
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("#{}", user.account_id));
    AdminRow {
        id: user.id,
        label: user.user_name.clone(),
        cells: vec![json!(user.user_name), json!(user.hoge_id), json!(account_label)],
    }
}
