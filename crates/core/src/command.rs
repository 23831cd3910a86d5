use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::{Account, AccountStatus};
use crate::error::AppError;
use crate::id;

/// Persistence port for the command side.
///
/// The only seam between the command handlers and storage. Implementations
/// must be substitutable without touching any handler.
#[async_trait]
pub trait AccountCommandRepository: Send + Sync {
    /// Persists a freshly constructed account.
    async fn create(&self, account: &Account) -> Result<(), RepositoryError>;
}

/// Error reported by a repository implementation.
///
/// The backend error is carried as an opaque boxed source so the port
/// stays independent of any storage driver.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }
}

/// Factory seam used by the composition root to hand concrete command
/// repositories to the handler constructors.
pub trait Builder {
    fn build_account_command_repo(&self) -> Arc<dyn AccountCommandRepository>;
}

/// Command handler set for the account module.
#[derive(Clone)]
pub struct Commands {
    pub create_account: CreateAccountHandler,
}

/// Wires the command handlers through the builder seam.
pub fn commands_with_builder(builder: &dyn Builder) -> Commands {
    Commands {
        create_account: CreateAccountHandler::new(builder.build_account_command_repo()),
    }
}

/// Request payload bound from the HTTP body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Response payload carrying the generated identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub id: String,
}

/// Creates accounts: generate an id, build the entity, persist it.
#[derive(Clone)]
pub struct CreateAccountHandler {
    repo: Arc<dyn AccountCommandRepository>,
}

impl CreateAccountHandler {
    pub fn new(repo: Arc<dyn AccountCommandRepository>) -> Self {
        Self { repo }
    }

    /// Handles a create-account command.
    ///
    /// New accounts start activated with no creation timestamp. There is
    /// no idempotency: identical requests create distinct accounts. On
    /// persistence failure the caller gets a generic internal error; the
    /// real cause travels only as the non-serialized wrapped source.
    pub async fn handle(
        &self,
        request: CreateAccountRequest,
    ) -> Result<CreateAccountResponse, AppError> {
        let account_id = id::generate().to_string();
        let account = Account::new(
            account_id.clone(),
            request.name,
            request.email,
            request.password,
            AccountStatus::Activated,
            None,
        );

        if let Err(err) = self.repo.create(&account).await {
            return Err(AppError::internal_server(
                "cannot create new account",
                "cannot insert account into storage",
            )
            .with_inner(err));
        }

        Ok(CreateAccountResponse { id: account_id })
    }
}
