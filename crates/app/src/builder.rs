use std::sync::Arc;

use acctsvc_core::command::{self, AccountCommandRepository};
use acctsvc_core::query::{self, AccountQueryRepository};
use acctsvc_storage::Database;

/// Composition root for the account module.
///
/// Hands sqlx-backed adapters to the handler constructors, which only
/// ever see the port traits. No runtime behavior of its own.
pub struct AppBuilder {
    database: Database,
}

impl AppBuilder {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

impl command::Builder for AppBuilder {
    fn build_account_command_repo(&self) -> Arc<dyn AccountCommandRepository> {
        Arc::new(self.database.account_commands())
    }
}

impl query::Builder for AppBuilder {
    fn build_account_query_repo(&self) -> Arc<dyn AccountQueryRepository> {
        Arc::new(self.database.account_queries())
    }
}
