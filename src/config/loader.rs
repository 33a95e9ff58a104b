//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::TenderflowConfig;
use crate::config::secret_string;
use crate::domain::errors::TenderflowError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TenderflowConfig
/// 4. Applies environment variable overrides (TENDERFLOW_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use tenderflow::config::loader::load_config;
///
/// let config = load_config("tenderflow.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TenderflowConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TenderflowError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TenderflowError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration from TOML text
pub fn parse_config(contents: &str) -> Result<TenderflowConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: TenderflowConfig = toml::from_str(&contents)
        .map_err(|e| TenderflowError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        TenderflowError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are passed through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| TenderflowError::Configuration(format!("Invalid substitution pattern: {}", e)))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(TenderflowError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Reads and parses an override variable
///
/// Unparsable values are an error rather than silently ignored.
fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            TenderflowError::Configuration(format!("Invalid value '{}' for {}", val, name))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using TENDERFLOW_* prefix
///
/// Environment variables follow the pattern: TENDERFLOW_<SECTION>_<KEY>
/// For example: TENDERFLOW_FEED_ENDPOINT, TENDERFLOW_SYNC_WINDOW_DAYS
fn apply_env_overrides(config: &mut TenderflowConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("TENDERFLOW_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Feed overrides
    if let Ok(val) = std::env::var("TENDERFLOW_FEED_ENDPOINT") {
        config.feed.endpoint = val;
    }
    if let Some(size) = env_parse("TENDERFLOW_FEED_PAGE_SIZE")? {
        config.feed.page_size = size;
    }
    if let Ok(val) = std::env::var("TENDERFLOW_FEED_REPORTING_CURRENCY") {
        config.feed.reporting_currency = val;
    }
    if let Some(secs) = env_parse("TENDERFLOW_FEED_TIMEOUT_SECONDS")? {
        config.feed.timeout_seconds = secs;
    }
    if let Some(ms) = env_parse("TENDERFLOW_FEED_PAGE_DELAY_MS")? {
        config.feed.page_delay_ms = ms;
    }
    if let Some(attempts) = env_parse("TENDERFLOW_FEED_RATE_LIMIT_MAX_ATTEMPTS")? {
        config.feed.rate_limit.max_attempts = attempts;
    }
    if let Some(secs) = env_parse("TENDERFLOW_FEED_RATE_LIMIT_MAX_TOTAL_BACKOFF_SECS")? {
        config.feed.rate_limit.max_total_backoff_secs = secs;
    }

    // Sync overrides
    if let Some(days) = env_parse("TENDERFLOW_SYNC_WINDOW_DAYS")? {
        config.sync.window_days = days;
    }
    if let Some(full) = env_parse("TENDERFLOW_SYNC_FULL_RESYNC")? {
        config.sync.full_resync = full;
    }
    if let Some(limit) = env_parse("TENDERFLOW_SYNC_LIMIT")? {
        config.sync.limit = Some(limit);
    }
    if let Some(lock) = env_parse("TENDERFLOW_SYNC_RUN_LOCK")? {
        config.sync.run_lock = lock;
    }
    if let Some(secs) = env_parse("TENDERFLOW_SYNC_MAX_RUN_SECONDS")? {
        config.sync.max_run_seconds = Some(secs);
    }
    if let Some(dry_run) = env_parse("TENDERFLOW_SYNC_DRY_RUN")? {
        config.sync.dry_run = dry_run;
    }

    // Database overrides
    if let Ok(val) = std::env::var("TENDERFLOW_DATABASE_CONNECTION_STRING") {
        config.database.connection_string = secret_string(val);
    }
    if let Some(max) = env_parse("TENDERFLOW_DATABASE_MAX_CONNECTIONS")? {
        config.database.max_connections = max;
    }
    if let Ok(val) = std::env::var("TENDERFLOW_DATABASE_SSL_MODE") {
        config.database.ssl_mode = val;
    }

    // Logging overrides
    if let Some(enabled) = env_parse("TENDERFLOW_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("TENDERFLOW_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
