use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use lcf_store::{CardRepository, StoreError};

use crate::{
    ApiConfig,
    clock::{Clock, SystemClock},
    config::Environment,
    error::ApiError,
    metrics,
};

#[derive(Clone, Debug)]
pub struct ApiState {
    pub repository: CardRepository,
    pub clock: Arc<dyn Clock>,
    pub environment: Environment,
}

impl ApiState {
    /// Open the card collection in `config.data_dir`, seeding it on first run.
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let repository = lcf_store::open_file_repository(&config.data_dir)?;
        let state = Self::with_clock(repository, Arc::new(SystemClock), config.env);

        if config.seed_sample_cards {
            let seeded = state.repository.seed_if_empty(state.now_utc())?;
            if seeded > 0 {
                tracing::info!(count = seeded, "Inserted sample cards into empty collection");
            }
        }

        tracing::info!(
            data_dir = %config.data_dir.display(),
            cards = state.repository.len()?,
            "Card repository ready"
        );

        Ok(state)
    }

    pub fn with_clock(
        repository: CardRepository,
        clock: Arc<dyn Clock>,
        environment: Environment,
    ) -> Self {
        Self {
            repository,
            clock,
            environment,
        }
    }

    /// Reference instant for the current request
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    /// Run a repository write on the blocking pool, timed under `operation`.
    ///
    /// Writes hold the collection lock across file I/O, so they stay off the
    /// async worker threads.
    pub async fn write<T, F>(&self, operation: &'static str, write: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&CardRepository) -> Result<T, StoreError> + Send + 'static,
    {
        let repository = self.repository.clone();
        let result = tokio::task::spawn_blocking(move || {
            metrics::timed_store_write(operation, || write(&repository))
        })
        .await?;

        Ok(result?)
    }
}
