//! Application state wiring all services together.
//!
//! Services are generic over repository and clock traits; AppState pins them
//! to the SQLite repositories and the system clock.

use std::path::PathBuf;
use std::sync::Arc;

use batepapo_core::clock::SystemClock;
use batepapo_core::service::message::MessageService;
use batepapo_core::service::presence::PresenceService;
use batepapo_core::sweeper::SweepSchedule;
use batepapo_infra::config::load_chat_config;
use batepapo_infra::filesystem::ensure_data_dir;
use batepapo_infra::sqlite::message::SqliteMessageRepository;
use batepapo_infra::sqlite::participant::SqliteParticipantRepository;
use batepapo_infra::sqlite::pool::{DatabasePool, database_url};
use batepapo_types::config::ChatConfig;
use batepapo_types::error::ConfigError;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcretePresenceService =
    PresenceService<SqliteParticipantRepository, SystemClock>;

pub type ConcreteMessageService =
    MessageService<SqliteParticipantRepository, SqliteMessageRepository, SystemClock>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub presence_service: Arc<ConcretePresenceService>,
    pub message_service: Arc<ConcreteMessageService>,
    pub config: ChatConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: resolve the data dir, load config,
    /// connect to the DB and wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = ensure_data_dir().await?;
        let config = load_chat_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        Ok(Self::from_parts(db_pool, config, data_dir))
    }

    /// Wire services over an already opened pool.
    pub fn from_parts(db_pool: DatabasePool, config: ChatConfig, data_dir: PathBuf) -> Self {
        let presence_service = PresenceService::new(
            SqliteParticipantRepository::new(db_pool.clone()),
            SystemClock,
        );
        let message_service = MessageService::new(
            SqliteParticipantRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            SystemClock,
        );

        Self {
            presence_service: Arc::new(presence_service),
            message_service: Arc::new(message_service),
            config,
            data_dir,
            db_pool,
        }
    }

    /// Sweep cadence and inactivity timeout from the loaded config.
    pub fn sweep_schedule(&self) -> Result<SweepSchedule, ConfigError> {
        Ok(SweepSchedule {
            interval: self.config.sweep_interval(),
            timeout: self.config.inactivity_timeout()?,
        })
    }
}
