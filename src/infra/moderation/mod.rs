// Infraction store implementations.

pub mod in_memory;
pub mod sqlite_infraction_store;

pub use in_memory::InMemoryInfractionStore;
pub use sqlite_infraction_store::SqliteInfractionStore;
