//! # Utilink Store
//!
//! DuckDB-backed local cache of record for customer data fetched through
//! the gateway. Consumed by callers as a typed get/put interface; all SQL
//! is parameterized, and every write lands an entry in the `record_log`
//! audit table.

pub mod duckdb;
pub mod migrations;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::ToSql;
use thiserror::Error;
use uuid::Uuid;

use utilink_core::{AccountId, PhoneKind, StructuredAddress, ValidationError};

pub use duckdb::{DuckDbConnectionManager, PooledConnection};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A stored row failed domain validation on the way out.
    #[error("corrupt record for account {account_id}: {source}")]
    CorruptRecord {
        account_id: String,
        source: ValidationError,
    },
}

/// Configuration for the store database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for utilink data.
    pub utilink_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of connections in the pool.
    pub max_pool_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let utilink_home = resolve_utilink_home();
        let db_path = utilink_home.join("cache").join("records.duckdb");
        Self {
            utilink_home,
            db_path,
            max_pool_size: 4,
        }
    }
}

/// Contact details cached for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRecord {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_kind: Option<PhoneKind>,
}

/// The typed get/put interface over the columnar cache of record.
#[derive(Clone)]
pub struct RecordStore {
    manager: DuckDbConnectionManager,
}

impl RecordStore {
    /// Open a store with default configuration.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(StoreConfig::default())
    }

    /// Open a store with the specified configuration.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = DuckDbConnectionManager::new(config.db_path.clone(), config.max_pool_size);
        let store = Self { manager };
        store.initialize()?;
        Ok(store)
    }

    /// Apply schema migrations.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let connection = self.manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        self.manager.db_path()
    }

    /// Store an account's mailing address, replacing any previous entry.
    pub fn put_address(
        &self,
        account: &AccountId,
        address_id: &str,
        address: &StructuredAddress,
    ) -> Result<(), StoreError> {
        let connection = self.manager.acquire()?;
        let params: [&dyn ToSql; 8] = [
            &account.as_str(),
            &address_id,
            &address.line1,
            &address.line2,
            &address.city,
            &address.region,
            &address.postal_code,
            &address.country,
        ];
        connection.execute(
            "INSERT OR REPLACE INTO addresses \
             (account_id, address_id, line1, line2, city, region, postal_code, country, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)",
            params.as_slice(),
        )?;

        self.log_action(&connection, account, "addresses", "put")?;
        Ok(())
    }

    /// Fetch an account's cached mailing address, if any.
    pub fn get_address(
        &self,
        account: &AccountId,
    ) -> Result<Option<StructuredAddress>, StoreError> {
        let connection = self.manager.acquire()?;
        let row = match connection.query_row(
            "SELECT line1, line2, city, region, postal_code, country \
             FROM addresses WHERE account_id = ?",
            [account.as_str()],
            |row| {
                Ok(StructuredAddress {
                    line1: row.get(0)?,
                    line2: row.get(1)?,
                    city: row.get(2)?,
                    region: row.get(3)?,
                    postal_code: row.get(4)?,
                    country: row.get(5)?,
                })
            },
        ) {
            Ok(address) => Some(address),
            Err(::duckdb::Error::QueryReturnedNoRows) => None,
            Err(error) => return Err(error.into()),
        };

        match row {
            Some(address) => {
                address
                    .validate()
                    .map_err(|source| StoreError::CorruptRecord {
                        account_id: account.as_str().to_owned(),
                        source,
                    })?;
                Ok(Some(address))
            }
            None => Ok(None),
        }
    }

    /// Store an account's contact details, replacing any previous entry.
    pub fn put_contact(
        &self,
        account: &AccountId,
        contact: &ContactRecord,
    ) -> Result<(), StoreError> {
        let connection = self.manager.acquire()?;
        let phone_kind = contact.phone_kind.map(|kind| kind.as_key());
        let params: [&dyn ToSql; 4] = [
            &account.as_str(),
            &contact.email,
            &contact.phone,
            &phone_kind,
        ];
        connection.execute(
            "INSERT OR REPLACE INTO contacts \
             (account_id, email, phone, phone_kind, updated_at) \
             VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)",
            params.as_slice(),
        )?;

        self.log_action(&connection, account, "contacts", "put")?;
        Ok(())
    }

    /// Fetch an account's cached contact details, if any.
    pub fn get_contact(&self, account: &AccountId) -> Result<Option<ContactRecord>, StoreError> {
        let connection = self.manager.acquire()?;
        let row = match connection.query_row(
            "SELECT email, phone, phone_kind FROM contacts WHERE account_id = ?",
            [account.as_str()],
            |row| {
                let email: Option<String> = row.get(0)?;
                let phone: Option<String> = row.get(1)?;
                let phone_kind: Option<String> = row.get(2)?;
                Ok((email, phone, phone_kind))
            },
        ) {
            Ok(row) => Some(row),
            Err(::duckdb::Error::QueryReturnedNoRows) => None,
            Err(error) => return Err(error.into()),
        };

        let Some((email, phone, phone_kind)) = row else {
            return Ok(None);
        };

        let phone_kind = match phone_kind {
            Some(key) => Some(PhoneKind::from_key(&key).map_err(|source| {
                StoreError::CorruptRecord {
                    account_id: account.as_str().to_owned(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Some(ContactRecord {
            email,
            phone,
            phone_kind,
        }))
    }

    fn log_action(
        &self,
        connection: &PooledConnection,
        account: &AccountId,
        dataset: &str,
        action: &str,
    ) -> Result<(), StoreError> {
        let request_id = Uuid::new_v4().to_string();
        let params: [&dyn ToSql; 4] = [&request_id, &account.as_str(), &dataset, &action];
        connection.execute(
            "INSERT INTO record_log (request_id, account_id, dataset, action, timestamp) \
             VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)",
            params.as_slice(),
        )?;
        Ok(())
    }
}

/// Resolve the utilink home directory from environment or default.
fn resolve_utilink_home() -> PathBuf {
    if let Some(path) = env::var_os("UTILINK_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".utilink");
    }

    PathBuf::from(".utilink")
}
