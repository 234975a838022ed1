//! Chat configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.batepapo/` in production)
//! and deserializes it into [`ChatConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use batepapo_types::config::ChatConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`ChatConfig::default()`].
/// - Unreadable, unparsable or out-of-range file: logs a warning and returns the default.
/// - Otherwise the parsed config, with absent keys defaulted.
pub async fn load_chat_config(data_dir: &Path) -> ChatConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ChatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ChatConfig::default();
        }
    };

    match toml::from_str::<ChatConfig>(&content) {
        Ok(config) => match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!("Invalid {}: {err}, using defaults", config_path.display());
                ChatConfig::default()
            }
        },
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ChatConfig::default()
        }
    }
}
