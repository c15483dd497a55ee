// # recipesd - recipe catalog query tool
//
// Thin integration layer over recipes-core: reads configuration from
// environment variables, wires up the store, the remote source and the
// caching provider, runs one filtered catalog query and prints the
// results. All caching, freshness and sync logic lives in recipes-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Remote source
// - `RECIPES_REMOTE_URL`: URL of the full-catalog JSON document (required)
// - `RECIPES_REMOTE_TIMEOUT`: request timeout in seconds (default 10)
//
// ### Catalog store
// - `RECIPES_STORE_TYPE`: store type (memory, file; default memory)
// - `RECIPES_STORE_PATH`: path to the catalog file (for file store)
//
// ### Cache
// - `RECIPES_TTL_SECS`: cache validity in seconds (default 3600)
//
// ### Query
// - `RECIPES_TITLE`: case-insensitive title prefix (default: match all)
// - `RECIPES_DIFFICULTY`: rookie, intermediate, advanced, any (default any)
// - `RECIPES_DURATION`: quick, medium, slow, any (default any)
//
// ### Logging
// - `RECIPES_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export RECIPES_REMOTE_URL=https://example.com/recipes.json
// export RECIPES_STORE_TYPE=file
// export RECIPES_STORE_PATH=/var/lib/recipes/catalog.json
// export RECIPES_DIFFICULTY=rookie
// export RECIPES_DURATION=quick
//
// recipesd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use recipes_core::config::{CacheConfig, RemoteConfig, StoreConfig};
use recipes_core::model::{DifficultyBucket, DurationBucket, FilterQuery};
use recipes_core::traits::CatalogStore;
use recipes_core::{CachingProvider, FileCatalogStore, MemoryCatalogStore};
use recipes_remote_http::HttpRemoteSource;

/// How long to wait for an in-flight refresh before serving stale data
const REFRESH_WAIT_SECS: u64 = 60;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum RecipesExitCode {
    /// Query completed (possibly on stale data)
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<RecipesExitCode> for ExitCode {
    fn from(code: RecipesExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    remote_url: String,
    remote_timeout_secs: u64,
    store_type: String,
    store_path: Option<String>,
    ttl_secs: u64,
    title_prefix: String,
    difficulty: String,
    duration: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            remote_url: env::var("RECIPES_REMOTE_URL").map_err(|_| {
                anyhow::anyhow!(
                    "RECIPES_REMOTE_URL is required. \
                    Set it via: export RECIPES_REMOTE_URL=https://example.com/recipes.json"
                )
            })?,
            remote_timeout_secs: parse_env_u64("RECIPES_REMOTE_TIMEOUT", 10)?,
            store_type: env::var("RECIPES_STORE_TYPE").unwrap_or_else(|_| "memory".to_string()),
            store_path: env::var("RECIPES_STORE_PATH").ok(),
            ttl_secs: parse_env_u64("RECIPES_TTL_SECS", 3600)?,
            title_prefix: env::var("RECIPES_TITLE").unwrap_or_default(),
            difficulty: env::var("RECIPES_DIFFICULTY").unwrap_or_else(|_| "any".to_string()),
            duration: env::var("RECIPES_DURATION").unwrap_or_else(|_| "any".to_string()),
            log_level: env::var("RECIPES_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if !self.remote_url.starts_with("https://") && !self.remote_url.starts_with("http://") {
            anyhow::bail!(
                "RECIPES_REMOTE_URL must use HTTP or HTTPS scheme. Got: {}",
                self.remote_url
            );
        }

        match self.store_type.as_str() {
            "memory" => {}
            "file" => {
                if self.store_path.as_ref().is_none_or(|p| p.is_empty()) {
                    anyhow::bail!(
                        "RECIPES_STORE_PATH is required when RECIPES_STORE_TYPE=file. \
                        Set it via: export RECIPES_STORE_PATH=/var/lib/recipes/catalog.json"
                    );
                }
            }
            other => anyhow::bail!(
                "RECIPES_STORE_TYPE '{}' is not supported. Supported types: memory, file",
                other
            ),
        }

        if self.remote_timeout_secs == 0 || self.remote_timeout_secs > 300 {
            anyhow::bail!(
                "RECIPES_REMOTE_TIMEOUT must be between 1 and 300 seconds. Got: {}",
                self.remote_timeout_secs
            );
        }

        self.difficulty
            .parse::<DifficultyBucket>()
            .map_err(|e| anyhow::anyhow!("RECIPES_DIFFICULTY: {}", e))?;
        self.duration
            .parse::<DurationBucket>()
            .map_err(|e| anyhow::anyhow!("RECIPES_DURATION: {}", e))?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "RECIPES_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn filter(&self) -> FilterQuery {
        FilterQuery {
            title_prefix: self.title_prefix.clone(),
            // validate() already checked both parses
            difficulty: self.difficulty.parse().unwrap_or_default(),
            duration: self.duration.parse().unwrap_or_default(),
        }
    }
}

/// Read a numeric env var, rejecting malformed values instead of
/// silently falling back to the default
fn parse_env_u64(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            anyhow::anyhow!(
                "{} must be an integer number of seconds. Got: {}",
                name,
                raw
            )
        }),
        Err(_) => Ok(default),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return RecipesExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return RecipesExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RecipesExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RecipesExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_query(config).await {
            error!("Query error: {}", e);
            RecipesExitCode::RuntimeError
        } else {
            RecipesExitCode::Success
        }
    })
    .into()
}

/// Wire up the components and run one filtered query
async fn run_query(config: Config) -> Result<()> {
    let cache_config = CacheConfig {
        ttl_secs: config.ttl_secs,
        remote: RemoteConfig::Http {
            url: config.remote_url.clone(),
            timeout_secs: config.remote_timeout_secs,
        },
        store: match config.store_type.as_str() {
            "file" => StoreConfig::File {
                path: config.store_path.clone().unwrap_or_default(),
            },
            _ => StoreConfig::Memory,
        },
    };
    cache_config.validate()?;

    let store: Arc<dyn CatalogStore> = match &cache_config.store {
        StoreConfig::File { path } => {
            info!("Using file catalog store: {}", path);
            Arc::new(FileCatalogStore::new(path).await?)
        }
        StoreConfig::Memory => {
            info!("Using in-memory catalog store");
            Arc::new(MemoryCatalogStore::new())
        }
    };

    let remote = Arc::new(HttpRemoteSource::from_config(&cache_config.remote)?);

    let provider = CachingProvider::new(store, remote, cache_config.ttl_secs);
    let filter = config.filter();

    let mut loading = provider.is_loading();
    let cached = provider.fetch(&filter).await?;
    info!("Serving {} cached recipe(s)", cached.len());

    // If the fetch kicked off a refresh, wait for it to settle so the
    // final listing reflects the freshest available catalog
    if *loading.borrow_and_update() {
        info!("Catalog refresh in flight, waiting up to {}s", REFRESH_WAIT_SECS);
        let settled = tokio::time::timeout(Duration::from_secs(REFRESH_WAIT_SECS), async {
            while loading.changed().await.is_ok() {
                if !*loading.borrow() {
                    break;
                }
            }
        })
        .await;

        if settled.is_err() {
            warn!("Timed out waiting for refresh, serving cached data");
        }

        let last_error = provider.last_error().borrow().clone();
        if let Some(err) = last_error {
            warn!("Refresh failed ({}), serving cached data", err);
        }
    }

    let results = provider.fetch(&filter).await?;
    for recipe in &results {
        info!(
            id = %recipe.id,
            minutes = recipe.total_minutes(),
            score = format!("{:.2}", recipe.difficulty_score),
            "{}",
            recipe.title
        );
    }
    info!("Query complete: {} recipe(s) matched", results.len());

    Ok(())
}
