use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, TransactionTrait};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, trace, warn};

use crate::config::connect;
use crate::store::{AccountForm, AccountStore, SaveOutcome, StoreError};

/// Django model label of the account records
pub const ACCOUNTS_MODEL: &str = "accounts.accountsmodel";

/// One entry of a Django `dumpdata` file
#[derive(Debug, Deserialize)]
pub struct DjangoRecord {
    pub model: String,
    pub pk: serde_json::Value,
    pub fields: serde_json::Value,
}

/// Django `AccountsModel` fields
#[derive(Debug, Deserialize)]
struct DjangoAccount {
    #[serde(rename = "userName")]
    user_name: String,
    hoge_id: i64,
}

/// Counts reported after an import
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

fn record_pk(record: &DjangoRecord) -> Result<i32, StoreError> {
    record
        .pk
        .as_i64()
        .and_then(|pk| i32::try_from(pk).ok())
        .ok_or_else(|| StoreError::validation("pk", format!("Invalid primary key {}", record.pk)))
}

fn account_form(record: &DjangoRecord) -> Result<AccountForm, StoreError> {
    let fields: DjangoAccount = serde_json::from_value(record.fields.clone())
        .map_err(|e| StoreError::validation(crate::store::NON_FIELD_ERRORS, e.to_string()))?;
    let hoge_id = i32::try_from(fields.hoge_id).map_err(|_| {
        StoreError::validation("hogeId", format!("{} is out of range", fields.hoge_id))
    })?;
    Ok(AccountForm {
        user_name: fields.user_name,
        hoge_id,
    })
}

/// Write the account records of a dump in one transaction.
///
/// Any invalid account record aborts the whole import.
pub async fn import_records<C>(db: &C, records: &[DjangoRecord]) -> Result<ImportSummary>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let store = AccountStore::new(&txn);
    let mut summary = ImportSummary::default();

    for record in records {
        if record.model != ACCOUNTS_MODEL {
            trace!("Skipping {} record", record.model);
            summary.skipped += 1;
            continue;
        }

        let pk = record_pk(record)?;
        let form = account_form(record).with_context(|| format!("Invalid account record {}", pk))?;
        match store
            .save_with_id(pk, form)
            .await
            .with_context(|| format!("Failed to save account {}", pk))?
        {
            SaveOutcome::Created => summary.created += 1,
            SaveOutcome::Updated => summary.updated += 1,
        }
        debug!("Imported account {}", pk);
    }

    txn.commit().await?;
    Ok(summary)
}

pub async fn import_django(json_path: &str, database_url: &str) -> Result<()> {
    trace!("Entering import_django function");
    info!("Starting Django data import");
    debug!("JSON path: {}", json_path);

    let db = connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let file = File::open(Path::new(json_path))
        .with_context(|| format!("Failed to open file: {}", json_path))?;
    let records: Vec<DjangoRecord> =
        serde_json::from_reader(file).context("Failed to parse JSON")?;
    info!("Loaded {} records from Django dump", records.len());

    let summary = import_records(&db, &records).await?;
    if summary.skipped > 0 {
        warn!("Skipped {} records of other models", summary.skipped);
    }

    info!("Django data import completed successfully!");
    info!("  - Accounts created: {}", summary.created);
    info!("  - Accounts updated: {}", summary.updated);

    Ok(())
}
