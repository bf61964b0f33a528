use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod analytics;
mod budgets;
mod categories;
mod resource;
mod transactions;

pub use resource::Resource;
pub use transactions::{Page, PageRequest, TransactionListFilter};

/// Runs `$body` with `$tx` bound to a fresh DB transaction. `Ok` commits;
/// an early return or `Err` drops the transaction, which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point for every ledger operation.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// The connection to use; migrations must already be applied.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Fails when the connection is unusable (including when none was given).
    pub async fn build(self) -> ResultEngine<Engine> {
        self.database.ping().await?;
        Ok(Engine {
            database: self.database,
        })
    }
}
