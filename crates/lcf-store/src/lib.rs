pub mod error;
pub mod kv;
pub mod models;
pub mod repositories;
pub mod samples;
pub mod store;

use std::{path::Path, sync::Arc};

pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use models::{Card, CardFilter, Difficulty, NewCard};
pub use repositories::card::CardRepository;
pub use store::{CardStore, STORAGE_KEY};

/// Open the card repository backed by JSON documents in `data_dir`.
///
/// Creates the directory if needed and loads whatever collection is already
/// stored there.
pub fn open_file_repository(data_dir: impl AsRef<Path>) -> Result<CardRepository, StoreError> {
    let backend = FileStore::open(data_dir)?;
    CardRepository::open(CardStore::new(Arc::new(backend)))
}

/// Open a card repository that lives only in memory.
pub fn open_memory_repository() -> Result<CardRepository, StoreError> {
    CardRepository::open(CardStore::new(Arc::new(MemoryStore::new())))
}
