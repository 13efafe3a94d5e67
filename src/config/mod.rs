use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Transcript generation defaults
    pub transcript: TranscriptConfig,

    /// Output settings
    pub output: OutputConfig,

    /// HTTP server settings
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Default caption language code
    pub default_language: String,

    /// Restore punctuation by default
    pub punctuate: bool,

    /// Punctuation model inference endpoint
    pub punctuation_endpoint: String,

    /// Optional model id passed to the endpoint
    pub punctuation_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory transcripts are written to
    pub directory: PathBuf,

    /// Open the written file with the platform default application
    pub auto_open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for `tubescript serve`
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transcript: TranscriptConfig {
                default_language: "en".to_string(),
                punctuate: false,
                punctuation_endpoint: "http://127.0.0.1:8085/punctuate".to_string(),
                punctuation_model: None,
            },
            output: OutputConfig {
                directory: PathBuf::from("."),
                auto_open: false,
            },
            server: ServerConfig {
                bind: "127.0.0.1:3000".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create the default one.
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("tubescript").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.transcript.default_language.is_empty() {
            anyhow::bail!("Default language must not be empty");
        }

        self.server
            .bind
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("Invalid server bind address: {}", self.server.bind))?;

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Default Language: {}", self.transcript.default_language);
        println!("  Punctuate: {}", self.transcript.punctuate);
        println!("  Punctuation Endpoint: {}", self.transcript.punctuation_endpoint);
        if let Some(model) = &self.transcript.punctuation_model {
            println!("  Punctuation Model: {}", model);
        }
        println!("  Output Directory: {}", self.output.directory.display());
        println!("  Auto-open: {}", self.output.auto_open);
        println!("  Server Bind: {}", self.server.bind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_bind() {
        let mut config = Config::default();
        config.server.bind = "not an address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.transcript.default_language, "en");
        assert_eq!(parsed.server.bind, "127.0.0.1:3000");
    }
}
