//! Core application

use std::sync::Arc;

use anyhow::Result;

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::DatasetService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub dataset: Arc<DatasetService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Check) => {
                return Self::check_dataset(&cli_config);
            }
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config)?;
        Self::start_server(app).await
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        // Fail fast: refusing to start beats serving an empty dataset
        let dataset = Arc::new(DatasetService::init(config.dataset.clone()).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load dataset from {}: {}",
                config.dataset.dir.display(),
                e
            )
        })?);

        let shutdown = ShutdownService::new();

        Ok(Self {
            shutdown,
            config,
            dataset,
        })
    }

    /// `check` subcommand: load the dataset once, report, and exit
    fn check_dataset(cli: &CliConfig) -> Result<()> {
        let config = AppConfig::load(cli)?;
        let dataset = DatasetService::init(config.dataset.clone()).map_err(|e| {
            anyhow::anyhow!(
                "Dataset check failed for {}: {}",
                config.dataset.dir.display(),
                e
            )
        })?;

        let snapshot = dataset.snapshot();
        println!(
            "Dataset OK: {} joined records from {}",
            snapshot.len(),
            config.dataset.dir.display()
        );
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            &app.config.dataset.dir.display().to_string(),
            app.dataset.snapshot().len(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        if let Some(handle) = self.dataset.start_reload_task(self.shutdown.subscribe()) {
            self.shutdown.register(handle).await;
        }

        tracing::debug!("Background tasks started");
    }
}
