use std::sync::Arc;

/// Read-side persistence port.
///
/// Deliberately empty: the query side has no operations yet. A future
/// read-model component adds methods here (get account by id, list
/// accounts by status) without touching the command side.
pub trait AccountQueryRepository: Send + Sync {}

/// Factory seam for query repositories, mirroring the command builder.
pub trait Builder {
    fn build_account_query_repo(&self) -> Arc<dyn AccountQueryRepository>;
}

/// Query handler set for the account module. Empty until a read model
/// exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct Queries;

/// Wires the query handlers through the builder seam. The builder is
/// unused while the handler set is empty.
pub fn queries_with_builder(_builder: &dyn Builder) -> Queries {
    Queries
}
