//! PostgreSQL Repository Implementations

mod persona_repository;
mod work_queue;

pub use persona_repository::PgPersonaRepository;
pub use work_queue::{PgWorkQueue, WorkQueueConfig};
