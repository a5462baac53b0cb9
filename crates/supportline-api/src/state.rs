//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI commands
//! and REST API handlers. Services are generic over repository traits, but
//! AppState pins them to the concrete SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;

use supportline_core::chat::service::ChatService;
use supportline_core::feedback::service::FeedbackService;
use supportline_infra::config::{load_app_config, resolve_data_dir};
use supportline_infra::llm::build_provider_registry;
use supportline_infra::prompt::load_prompt_library;
use supportline_infra::sqlite::chat::SqliteChatRepository;
use supportline_infra::sqlite::feedback::SqliteFeedbackRepository;
use supportline_infra::sqlite::pool::DatabasePool;
use supportline_infra::sqlite::user::SqliteUserRepository;
use supportline_types::config::AiConfigurations;

/// Concrete type aliases for the service generics pinned to the SQLite
/// implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository>;

pub type ConcreteFeedbackService =
    FeedbackService<SqliteChatRepository, SqliteFeedbackRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub feedback_service: Arc<ConcreteFeedbackService>,
    pub user_repo: Arc<SqliteUserRepository>,
    pub configurations: Arc<AiConfigurations>,
    pub server_addr: (String, u16),
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to the
    /// database, build the provider registry, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_app_config(&data_dir).await;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("supportline.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Static registries: configuration profiles, prompt templates,
        // and LLM providers. All read-only after this point.
        let configurations = Arc::new(config.profiles.clone());
        let prompts = Arc::new(load_prompt_library(&data_dir.join("prompts")).await);
        let providers = Arc::new(build_provider_registry(&config));

        if configurations.default_profile().is_none() {
            tracing::warn!(
                "No 'default' configuration profile is defined; chat dispatch will fail until one is added"
            );
        }

        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            configurations.clone(),
            prompts,
            providers,
        );

        let feedback_service = FeedbackService::new(
            SqliteChatRepository::new(db_pool.clone()),
            SqliteFeedbackRepository::new(db_pool.clone()),
        );

        let user_repo = SqliteUserRepository::new(db_pool.clone());

        Ok(Self {
            chat_service: Arc::new(chat_service),
            feedback_service: Arc::new(feedback_service),
            user_repo: Arc::new(user_repo),
            configurations,
            server_addr: (config.server.host.clone(), config.server.port),
            data_dir,
            db_pool,
        })
    }
}
