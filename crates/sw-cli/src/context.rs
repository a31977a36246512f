//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use sw_core::Config;
use sw_db::DuckDbBackend;
use sw_runner::{Runner, RunnerOptions};

use crate::cli::GlobalArgs;

const IN_MEMORY: &str = ":memory:";

/// Runtime context containing loaded config and database connection
pub(crate) struct RuntimeContext {
    /// The loaded configuration
    pub config: Config,

    /// Database connection
    pub db: DuckDbBackend,

    /// Settings handed to the runner
    pub options: RunnerOptions,
}

impl RuntimeContext {
    /// Load `stepwise.yml`, resolve the target, and open the database.
    pub fn new(global: &GlobalArgs) -> Result<Self> {
        let project_dir = &global.project_dir;
        let config = load_config(project_dir)?;

        let target = Config::resolve_target(global.target.as_deref());
        let db_config = config
            .get_database_config(target.as_deref())
            .context("Failed to resolve database target")?;

        let db_path = global
            .database
            .clone()
            .unwrap_or_else(|| resolve_db_path(project_dir, &db_config.path));
        log::debug!(
            "Opening {} database {db_path} (target: {})",
            db_config.db_type,
            target.as_deref().unwrap_or("default")
        );
        let db = DuckDbBackend::new(&db_path)
            .with_context(|| format!("Failed to connect to database \"{db_path}\""))?;

        let options = RunnerOptions {
            migrations_dir: config.migrations_path_absolute(project_dir),
            changelog_table: config.changelog_table.clone(),
            verbose: global.verbose,
        };

        Ok(Self {
            config,
            db,
            options,
        })
    }

    /// Runner bound to this context's connection
    pub fn runner(&self) -> Runner<'_> {
        Runner::new(&self.db, self.options.clone())
    }
}

/// Load project configuration from `project_dir`
pub(crate) fn load_config(project_dir: &Path) -> Result<Config> {
    Config::load_from_dir(project_dir).context("Failed to load project configuration")
}

/// Relative database paths are taken relative to the project directory.
fn resolve_db_path(project_dir: &Path, path: &str) -> String {
    if path == IN_MEMORY || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        PathBuf::from(project_dir).join(path).display().to_string()
    }
}
