use anyhow::{anyhow, Result};
use serenity::all::UserId;
use std::{path::PathBuf, time::Duration};
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/licensebot/config.toml";
const TOKEN_ENV_VAR: &str = "DISCORD_TOKEN";

/// Bot configuration
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub general: General,
    pub inference: Inference,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct General {
    /// Fallback when `DISCORD_TOKEN` is not set in the environment.
    #[serde(default)]
    pub discord_token: Option<String>,
    /// The only user allowed to issue licenses.
    pub owner_id: u64,
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct Inference {
    pub completion_url: String,
    pub model_name: String,
    pub max_new_tokens: usize,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut file = tokio::fs::File::open(&path).await.map_err(|e| {
            anyhow!(
                "Could not open configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        Self::parse(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        if config.general.owner_id == 0 {
            return Err(anyhow!("general.owner_id must be a Discord user id"));
        }
        Ok(config)
    }

    /// The environment takes precedence over the configuration file.
    pub fn discord_token(&self) -> Result<String> {
        Self::resolve_token(std::env::var(TOKEN_ENV_VAR).ok(), &self.general)
    }

    fn resolve_token(from_env: Option<String>, general: &General) -> Result<String> {
        let present = |token: &String| !token.trim().is_empty();
        from_env
            .filter(present)
            .or_else(|| general.discord_token.clone().filter(present))
            .ok_or(anyhow!(
                "No Discord token: set {} or general.discord_token",
                TOKEN_ENV_VAR
            ))
    }

    pub fn owner(&self) -> UserId {
        UserId::new(self.general.owner_id)
    }
}

impl Inference {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [general]
        owner_id = 1254402109563076722

        [inference]
        completion_url = "http://localhost:11434/api/generate"
        model_name = "dolphin-mistral:7b-v2.8"
        max_new_tokens = 200
        temperature = 0.7
        timeout_seconds = 120
    "#;

    #[test]
    fn parses_sample() {
        let cfg = Config::parse(SAMPLE).unwrap();
        assert_eq!(cfg.owner(), UserId::new(1254402109563076722));
        assert_eq!(cfg.general.discord_token, None);
        assert_eq!(cfg.inference.max_new_tokens, 200);
        assert_eq!(cfg.inference.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn rejects_zero_owner() {
        let contents = SAMPLE.replace("1254402109563076722", "0");
        assert!(Config::parse(&contents).is_err());
    }

    #[test]
    fn token_prefers_environment() {
        let general = General {
            discord_token: Some("from-file".to_owned()),
            owner_id: 1,
        };
        let token = Config::resolve_token(Some("from-env".to_owned()), &general).unwrap();
        assert_eq!(token, "from-env");

        let token = Config::resolve_token(Some("  ".to_owned()), &general).unwrap();
        assert_eq!(token, "from-file");

        let general = General {
            discord_token: None,
            owner_id: 1,
        };
        assert!(Config::resolve_token(None, &general).is_err());
    }

    #[test]
    fn blank_file_token_is_missing() {
        let general = General {
            discord_token: Some("   ".to_owned()),
            owner_id: 1,
        };
        assert!(Config::resolve_token(None, &general).is_err());
        assert!(Config::resolve_token(Some(String::new()), &general).is_err());
    }
}
