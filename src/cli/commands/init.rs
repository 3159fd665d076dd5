//! Implementation of the `padel-scheduler init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::CONFIG_FILE;

const DATA_DIR: &str = ".padel";

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub directories_created: Vec<String>,
    pub config_written: bool,
    pub database_path: Option<PathBuf>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if !self.directories_created.is_empty() {
            lines.push("\nCreated directories:".to_string());
            for dir in &self.directories_created {
                lines.push(format!("  - {dir}"));
            }
        }
        if self.config_written {
            lines.push(format!("\nWrote default configuration to {CONFIG_FILE}"));
        }
        if let Some(ref db) = self.database_path {
            lines.push(format!("\nDatabase initialized at {}", db.display()));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let output_data = run(&args).await?;
    output(&output_data, json_mode);
    Ok(())
}

async fn run(args: &InitArgs) -> Result<InitOutput> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir().context("Failed to get current directory")?.join(&args.path)
    };

    let data_dir = target_path.join(DATA_DIR);

    // Check if already initialized
    if data_dir.exists() && !args.force {
        return Ok(InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            directories_created: vec![],
            config_written: false,
            database_path: None,
        });
    }

    // If forcing, remove existing
    if args.force && data_dir.exists() {
        fs::remove_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to remove existing {DATA_DIR} directory"))?;
    }

    let mut directories_created = vec![];
    for dir in [data_dir.clone(), data_dir.join("logs")] {
        if !dir.exists() {
            fs::create_dir_all(&dir).await.with_context(|| format!("Failed to create {}", dir.display()))?;
            let relative = dir.strip_prefix(&target_path).unwrap_or(&dir).to_string_lossy().to_string();
            directories_created.push(relative);
        }
    }

    let config_written = write_default_config(&target_path, args.force).await?;

    let db_path = data_dir.join("padel.db");
    let db_url = format!("sqlite:{}", db_path.display());
    let pool = initialize_database(&db_url, None).await.context("Failed to initialize database")?;
    pool.close().await;

    Ok(InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        directories_created,
        config_written,
        database_path: Some(db_path),
    })
}

/// Write `padel.yaml` with every default spelled out. An existing file is
/// kept unless `force` is set.
async fn write_default_config(target_path: &Path, force: bool) -> Result<bool> {
    let config_path = target_path.join(CONFIG_FILE);
    if config_path.exists() && !force {
        return Ok(false);
    }

    let mut config = Config::default();
    config.logging.log_dir = Some(format!("{DATA_DIR}/logs"));
    let content = serde_yaml::to_string(&config).context("Failed to serialize default config")?;
    fs::write(&config_path, content)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(true)
}
