// ==========================================
// Repository layer
// ==========================================
// Concrete repositories over a shared SQLite connection. The importer
// and the API talk to these; nothing above this layer writes SQL.
// ==========================================

pub mod balance_repo;
pub mod entity_repo;
pub mod error;
pub mod event_repo;

pub use balance_repo::{BalanceRepository, BalanceView, DebitOutcome, TransferDebitOutcome};
pub use entity_repo::{EntityRepository, Resolved};
pub use error::{RepositoryError, RepositoryResult};
pub use event_repo::EventRepository;
