//! Agent wallet pool lookup.
//!
//! Agents are pre-provisioned wallets whose keys live in the `wallet_pool`
//! table. The gateway only ever reads from it; provisioning is owned by
//! another service. Addresses are matched case-insensitively.

use crate::error::{VenueError, VenueResult};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use tracing::{debug, info};

diesel::table! {
    wallet_pool (address) {
        address -> Text,
        private_key -> Text,
    }
}

/// Lookup of agent private keys by wallet address.
#[async_trait]
pub trait WalletPool: Send + Sync {
    /// Private key for the agent address, `None` when the address is not
    /// in the pool.
    async fn agent_key(&self, address: &str) -> VenueResult<Option<String>>;
}

type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Database-backed wallet pool.
pub struct DbWalletPool {
    pool: DbPool,
}

impl DbWalletPool {
    /// Connect a pooled wallet-pool reader to `database_url`.
    pub fn connect(database_url: &str) -> VenueResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(5)
            .build(manager)
            .map_err(|e| VenueError::WalletPool(e.to_string()))?;
        info!("Wallet pool database connected");
        Ok(Self { pool })
    }
}

#[async_trait]
impl WalletPool for DbWalletPool {
    async fn agent_key(&self, address: &str) -> VenueResult<Option<String>> {
        let pool = self.pool.clone();
        let needle = address.trim().to_lowercase();

        // diesel is synchronous; keep the query off the async workers.
        let key = tokio::task::spawn_blocking(move || -> VenueResult<Option<String>> {
            use self::wallet_pool::dsl;

            let mut conn = pool
                .get()
                .map_err(|e| VenueError::WalletPool(e.to_string()))?;

            dsl::wallet_pool
                .filter(lower(dsl::address).eq(&needle))
                .select(dsl::private_key)
                .first::<String>(&mut conn)
                .optional()
                .map_err(|e| VenueError::WalletPool(e.to_string()))
        })
        .await
        .map_err(|e| VenueError::WalletPool(format!("lookup task failed: {e}")))??;

        debug!(found = key.is_some(), "Wallet pool lookup");
        Ok(key)
    }
}

diesel::define_sql_function! {
    /// SQL lower(), for case-insensitive address matching.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_pool() -> DbWalletPool {
        // max_size 1: every pooled connection to ":memory:" would otherwise
        // open its own empty database.
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = DbWalletPool {
            pool: Pool::builder().max_size(1).build(manager).unwrap(),
        };
        let mut conn = pool.pool.get().unwrap();
        diesel::sql_query(
            "CREATE TABLE wallet_pool (address TEXT PRIMARY KEY, private_key TEXT NOT NULL)",
        )
        .execute(&mut conn)
        .unwrap();
        diesel::sql_query(
            "INSERT INTO wallet_pool VALUES ('0xAbCd00000000000000000000000000000000Ef01', '0xkey')",
        )
        .execute(&mut conn)
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let pool = seeded_pool();
        let key = pool
            .agent_key("0xABCD00000000000000000000000000000000EF01")
            .await
            .unwrap();
        assert_eq!(key.as_deref(), Some("0xkey"));
    }

    #[tokio::test]
    async fn test_lookup_miss_is_none() {
        let pool = seeded_pool();
        let key = pool
            .agent_key("0x0000000000000000000000000000000000000000")
            .await
            .unwrap();
        assert!(key.is_none());
    }
}
