//! SQLite storage implementation for transaction routes.

mod model;
mod repository;

pub use model::{RouteLinkDB, TransactionRouteChangesetDB, TransactionRouteDB};
pub use repository::TransactionRouteRepository;
