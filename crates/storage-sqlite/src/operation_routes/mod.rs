//! SQLite storage implementation for operation routes.

mod model;
mod repository;

pub use model::{OperationRouteChangesetDB, OperationRouteDB};
pub use repository::OperationRouteRepository;
