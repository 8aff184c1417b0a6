//! Worker configuration.
//!
//! Process settings come from the environment (see [`WorkerConfig::from_env`]);
//! the guild layout comes from a JSON file whose path is itself an
//! environment variable. Both are read once at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use warbot_core::error::CoreError;
use warbot_core::roles::{MilitaryUnitRoles, SkillRoles};
use warbot_core::types::{snowflake, ChannelId, GuildId, RoleId};

const DEFAULT_CONFIG_PATH: &str = "config.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;
const DAY_SECS: u64 = 24 * 60 * 60;
const DEFAULT_TAKEOVER_INTERVAL_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("{name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

// ---------------------------------------------------------------------------
// Guild configuration (JSON file)
// ---------------------------------------------------------------------------

/// Static guild layout, loaded once per run from the JSON config file.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildConfig {
    #[serde(with = "snowflake")]
    pub guild: GuildId,
    pub roles: RolesConfig,
    #[serde(default)]
    pub military_units: Vec<MilitaryUnitConfig>,
    pub channels: ChannelsConfig,
    /// Countries (by name or id) excluded from the takeover report.
    #[serde(default)]
    pub active_countries: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    #[serde(with = "snowflake")]
    pub citizen: RoleId,
    #[serde(with = "snowflake")]
    pub economy: RoleId,
    #[serde(with = "snowflake")]
    pub fight: RoleId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilitaryUnitConfig {
    /// In-game military unit id.
    pub id: String,
    #[serde(with = "snowflake")]
    pub role_id: RoleId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelsConfig {
    #[serde(with = "snowflake")]
    pub reports: ChannelId,
}

impl GuildConfig {
    /// Parse and validate a config document.
    pub fn from_json(path: &Path, json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.military_unit_roles()?;
        Ok(config)
    }

    /// Read, parse and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &json)
    }

    pub fn skill_roles(&self) -> SkillRoles {
        SkillRoles {
            economy: self.roles.economy,
            fight: self.roles.fight,
        }
    }

    pub fn military_unit_roles(&self) -> Result<MilitaryUnitRoles, CoreError> {
        MilitaryUnitRoles::new(
            self.military_units
                .iter()
                .map(|unit| (unit.id.clone(), unit.role_id)),
        )
    }
}

// ---------------------------------------------------------------------------
// Process configuration (environment)
// ---------------------------------------------------------------------------

/// Tick period of each job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobIntervals {
    pub skill_roles: Duration,
    pub military_unit_roles: Duration,
    pub unidentified_members: Duration,
    pub takeover_countries: Duration,
}

impl Default for JobIntervals {
    fn default() -> Self {
        Self {
            skill_roles: Duration::from_secs(DAY_SECS),
            military_unit_roles: Duration::from_secs(DAY_SECS),
            unidentified_members: Duration::from_secs(DAY_SECS),
            takeover_countries: Duration::from_secs(DEFAULT_TAKEOVER_INTERVAL_SECS),
        }
    }
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub discord_token: String,
    pub discord_api_url: String,
    pub warera_api_url: String,
    /// Timeout applied to every outgoing HTTP request.
    pub request_timeout: Duration,
    /// How long shutdown waits for each job to stop.
    pub shutdown_timeout: Duration,
    pub intervals: JobIntervals,
    pub config_path: PathBuf,
    pub guild: GuildConfig,
}

impl WorkerConfig {
    /// Load configuration from the process environment and the guild
    /// config file it points to.
    ///
    /// | Env Var                              | Default                        |
    /// |--------------------------------------|--------------------------------|
    /// | `DISCORD_TOKEN`                      | required                       |
    /// | `WARBOT_CONFIG`                      | `config.json`                  |
    /// | `WARERA_API_URL`                     | `https://api2.warera.io/trpc`  |
    /// | `DISCORD_API_URL`                    | `https://discord.com/api/v10`  |
    /// | `REQUEST_TIMEOUT_SECS`               | `10`                           |
    /// | `SHUTDOWN_TIMEOUT_SECS`              | `10`                           |
    /// | `SKILL_ROLES_INTERVAL_SECS`          | `86400`                        |
    /// | `MILITARY_UNIT_ROLES_INTERVAL_SECS`  | `86400`                        |
    /// | `UNIDENTIFIED_MEMBERS_INTERVAL_SECS` | `86400`                        |
    /// | `TAKEOVER_COUNTRIES_INTERVAL_SECS`   | `60`                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvSource(var);

        let discord_token = env
            .get("DISCORD_TOKEN")
            .ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?;

        let config_path: PathBuf = env
            .get("WARBOT_CONFIG")
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into())
            .into();

        let defaults = JobIntervals::default();
        let intervals = JobIntervals {
            skill_roles: env.secs("SKILL_ROLES_INTERVAL_SECS", defaults.skill_roles)?,
            military_unit_roles: env
                .secs("MILITARY_UNIT_ROLES_INTERVAL_SECS", defaults.military_unit_roles)?,
            unidentified_members: env
                .secs("UNIDENTIFIED_MEMBERS_INTERVAL_SECS", defaults.unidentified_members)?,
            takeover_countries: env
                .secs("TAKEOVER_COUNTRIES_INTERVAL_SECS", defaults.takeover_countries)?,
        };

        let guild = GuildConfig::load(&config_path)?;

        Ok(Self {
            discord_token,
            discord_api_url: env
                .get("DISCORD_API_URL")
                .unwrap_or_else(|| warbot_guild::discord::DEFAULT_API_URL.into()),
            warera_api_url: env
                .get("WARERA_API_URL")
                .unwrap_or_else(|| warbot_gameapi::api::DEFAULT_API_URL.into()),
            request_timeout: env.secs(
                "REQUEST_TIMEOUT_SECS",
                Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            )?,
            shutdown_timeout: env.secs(
                "SHUTDOWN_TIMEOUT_SECS",
                Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            )?,
            intervals,
            config_path,
            guild,
        })
    }
}

struct EnvSource<F>(F);

impl<F: Fn(&str) -> Option<String>> EnvSource<F> {
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    /// A positive number of seconds, or `default` when unset.
    fn secs(&self, name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        let Some(raw) = self.get(name) else {
            return Ok(default);
        };
        match raw.trim().parse::<u64>() {
            Ok(0) => Err(ConfigError::InvalidVar {
                name,
                reason: "must be greater than zero".into(),
            }),
            Ok(secs) => Ok(Duration::from_secs(secs)),
            Err(e) => Err(ConfigError::InvalidVar {
                name,
                reason: e.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn vars_from_pairs<'a, I>(pairs: I) -> impl Fn(&str) -> Option<String>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const SAMPLE: &str = r#"{
        "guild": 1000,
        "roles": {"citizen": 1, "economy": "2", "fight": 3},
        "military_units": [
            {"id": "mu-a", "roleId": 11},
            {"id": "mu-b", "roleId": "12"}
        ],
        "channels": {"reports": 500},
        "active_countries": ["Atlantis"]
    }"#;

    fn write_sample(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("warbot-{}-{name}.json", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn parses_guild_config() {
        let config = GuildConfig::from_json(Path::new("inline"), SAMPLE).unwrap();
        assert_eq!(config.guild, 1000);
        assert_eq!(config.roles.economy, 2);
        assert_eq!(config.channels.reports, 500);
        assert_eq!(config.active_countries, vec!["Atlantis"]);

        let units = config.military_unit_roles().unwrap();
        assert_eq!(units.role_for("mu-b"), Some(12));
        assert_eq!(config.skill_roles().fight, 3);
    }

    #[test]
    fn optional_sections_default_to_empty() {
        let json = r#"{"guild": 1, "roles": {"citizen": 1, "economy": 2, "fight": 3},
            "channels": {"reports": 4}}"#;
        let config = GuildConfig::from_json(Path::new("inline"), json).unwrap();
        assert!(config.military_units.is_empty());
        assert!(config.active_countries.is_empty());
    }

    #[test]
    fn duplicate_unit_role_is_invalid() {
        let json = r#"{"guild": 1, "roles": {"citizen": 1, "economy": 2, "fight": 3},
            "military_units": [{"id": "a", "roleId": 9}, {"id": "b", "roleId": 9}],
            "channels": {"reports": 4}}"#;
        let err = GuildConfig::from_json(Path::new("inline"), json).unwrap_err();
        assert_matches!(err, ConfigError::Invalid(_));
    }

    #[test]
    fn missing_roles_is_parse_error() {
        let err = GuildConfig::from_json(Path::new("inline"), r#"{"guild": 1}"#).unwrap_err();
        assert_matches!(err, ConfigError::Parse { .. });
    }

    #[test]
    fn from_vars_applies_defaults() {
        let path = write_sample("defaults", SAMPLE);
        let path_str = path.to_string_lossy().to_string();
        let config = WorkerConfig::from_vars(vars_from_pairs([
            ("DISCORD_TOKEN", "secret"),
            ("WARBOT_CONFIG", path_str.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.discord_token, "secret");
        assert_eq!(config.warera_api_url, "https://api2.warera.io/trpc");
        assert_eq!(config.discord_api_url, "https://discord.com/api/v10");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.intervals, JobIntervals::default());
        assert_eq!(config.intervals.takeover_countries, Duration::from_secs(60));
        assert_eq!(config.guild.guild, 1000);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn from_vars_overrides_intervals() {
        let path = write_sample("intervals", SAMPLE);
        let path_str = path.to_string_lossy().to_string();
        let config = WorkerConfig::from_vars(vars_from_pairs([
            ("DISCORD_TOKEN", "secret"),
            ("WARBOT_CONFIG", path_str.as_str()),
            ("SKILL_ROLES_INTERVAL_SECS", "3600"),
            ("TAKEOVER_COUNTRIES_INTERVAL_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.intervals.skill_roles, Duration::from_secs(3600));
        assert_eq!(config.intervals.takeover_countries, Duration::from_secs(30));
        assert_eq!(config.intervals.military_unit_roles, Duration::from_secs(DAY_SECS));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_token_is_error() {
        let err = WorkerConfig::from_vars(vars_from_pairs([])).unwrap_err();
        assert_matches!(err, ConfigError::MissingVar("DISCORD_TOKEN"));
    }

    #[test]
    fn zero_interval_is_invalid() {
        let err = WorkerConfig::from_vars(vars_from_pairs([
            ("DISCORD_TOKEN", "secret"),
            ("SKILL_ROLES_INTERVAL_SECS", "0"),
        ]))
        .unwrap_err();
        assert_matches!(
            err,
            ConfigError::InvalidVar {
                name: "SKILL_ROLES_INTERVAL_SECS",
                ..
            }
        );
    }

    #[test]
    fn missing_config_file_is_read_error() {
        let err = WorkerConfig::from_vars(vars_from_pairs([
            ("DISCORD_TOKEN", "secret"),
            ("WARBOT_CONFIG", "/nonexistent/warbot.json"),
        ]))
        .unwrap_err();
        assert_matches!(err, ConfigError::Read { .. });
    }
}
