use std::{
    io::{self, IsTerminal},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use platform_api::ClientConfig;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Values given on the command line. Each one replaces its environment
/// variable, which is then not read at all.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub api_url: Option<Url>,
    pub color: Option<ColorChoice>,
}

#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    pub api_url: Url,
    pub timeout: Option<Duration>,
    pub color: ColorChoice,
}

impl ConsoleConfig {
    /// Read settings from the environment, after loading `.env` if present.
    pub fn load(overrides: Overrides) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    fn from_lookup(
        overrides: Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_url = match overrides.api_url {
            Some(url) => url,
            None => {
                let raw_url = lookup("STAFFDESK_API_URL")
                    .filter(|val| !val.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_API_URL.into());
                Url::parse(raw_url.trim())
                    .with_context(|| format!("invalid STAFFDESK_API_URL `{raw_url}`"))?
            }
        };

        let timeout = match lookup("STAFFDESK_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid STAFFDESK_TIMEOUT_SECS `{raw}`"))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            _ => None,
        };

        let color = match (overrides.color, lookup("STAFFDESK_COLOR")) {
            (Some(color), _) => color,
            (None, Some(raw)) if !raw.trim().is_empty() => {
                <ColorChoice as ValueEnum>::from_str(raw.trim(), true)
                    .map_err(|_| anyhow!("STAFFDESK_COLOR must be auto, always or never"))?
            }
            _ => ColorChoice::default(),
        };

        Ok(Self {
            api_url,
            timeout,
            color,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(overrides: Overrides, vars: &[(&str, &str)]) -> Result<ConsoleConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConsoleConfig::from_lookup(overrides, |key| vars.get(key).cloned())
    }

    fn config(vars: &[(&str, &str)]) -> Result<ConsoleConfig> {
        config_with(Overrides::default(), vars)
    }

    #[test]
    fn defaults_point_at_localhost() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.timeout, None);
        assert_eq!(config.color, ColorChoice::Auto);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("STAFFDESK_API_URL", "https://hr.example.com/api/"),
            ("STAFFDESK_TIMEOUT_SECS", "15"),
            ("STAFFDESK_COLOR", "Never"),
        ])
        .unwrap();
        assert_eq!(config.api_url.path(), "/api/");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.color, ColorChoice::Never);
    }

    #[test]
    fn zero_timeout_means_none() {
        let config = config(&[("STAFFDESK_TIMEOUT_SECS", "0")]).unwrap();
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("STAFFDESK_API_URL", "not a url")]).is_err());
        assert!(config(&[("STAFFDESK_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("STAFFDESK_COLOR", "rainbow")]).is_err());
    }

    #[test]
    fn flags_win_over_bad_environment_values() {
        let config = config_with(
            Overrides {
                api_url: Some(Url::parse("http://hr.internal:8080").unwrap()),
                color: Some(ColorChoice::Always),
            },
            &[("STAFFDESK_API_URL", "not a url"), ("STAFFDESK_COLOR", "rainbow")],
        )
        .unwrap();
        assert_eq!(config.api_url.as_str(), "http://hr.internal:8080/");
        assert_eq!(config.color, ColorChoice::Always);
    }
}
