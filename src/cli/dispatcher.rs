use crate::api::auth::{login, logout};
use crate::api::client::ApiClient;
use crate::api::config::ConfigId;
use crate::cli::main_types::{AuthCommands, Commands, ConfigCommands, SettingsCommands};
use crate::core::auth::LoginInput;
use crate::core::config_queries::{
    UpdateConfigArgs, use_create_config, use_delete_config, use_fetch_config, use_update_config,
};
use crate::core::query::QueryClient;
use crate::display::{OutputFormat, render};
use crate::error::{AppError, CliError, ConfigError, StorageError};
use crate::storage::config::Config;
use crate::storage::settings::{DEFAULT_PROFILE, Settings};
use crate::utils::validation::{validate_timeout_secs, validate_url};
use serde_json::Value;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    profile: Option<String>,
    base_url_override: Option<String>,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        profile: Option<String>,
        base_url_override: Option<String>,
    ) -> Self {
        Self {
            config,
            config_path,
            profile,
            base_url_override,
        }
    }

    pub async fn dispatch(&mut self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Auth { command } => self.handle_auth_command(command).await,
            Commands::Config { command } => self.handle_config_command(command).await,
            Commands::Settings { command } => self.handle_settings_command(command),
        }
    }

    fn profile_name(&self) -> &str {
        self.profile
            .as_deref()
            .or(self.config.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE)
    }

    /// Resolve settings once and build the clients every remote command shares.
    fn connect(&self) -> Result<(ApiClient, QueryClient), AppError> {
        let settings = Settings::resolve(
            &self.config,
            self.profile.as_deref(),
            self.base_url_override.as_deref(),
        )?;
        tracing::debug!(base_url = %settings.base_url, "connecting");

        let api = ApiClient::new(&settings)?;
        Ok((api, QueryClient::from_settings(&settings)))
    }

    async fn handle_auth_command(&self, command: AuthCommands) -> Result<(), AppError> {
        match command {
            AuthCommands::Login {
                username,
                credentials,
            } => {
                tracing::debug!("auth login");
                let credentials = match credentials {
                    Some(raw) => parse_json("--credentials", &raw)?,
                    None => {
                        let input = LoginInput::collect(username.as_deref())?;
                        input.validate()?;
                        input.into_credentials()
                    }
                };

                let (api, _) = self.connect()?;
                let response: Value = login(&api, &credentials).await?;
                print_value(&response, OutputFormat::Json)
            }
            AuthCommands::Logout => {
                tracing::debug!("auth logout");
                let (api, _) = self.connect()?;
                let response: Value = logout(&api).await?;
                print_value(&response, OutputFormat::Json)
            }
        }
    }

    async fn handle_config_command(&self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show { format } => {
                tracing::debug!(%format, "config show");
                let (api, queries) = self.connect()?;
                let config = use_fetch_config(&queries, &api).fetch().await?;
                print_value(&config, format)
            }
            ConfigCommands::Create { data } => {
                let data = parse_json("--data", &data)?;
                tracing::debug!("config create");
                let (api, queries) = self.connect()?;
                let created = use_create_config(&queries, &api).mutate(data).await?;
                print_value(&created, OutputFormat::Json)
            }
            ConfigCommands::Update { id, data } => {
                let id = parse_id(&id)?;
                let data = parse_json("--data", &data)?;
                tracing::debug!(%id, "config update");
                let (api, queries) = self.connect()?;
                let updated = use_update_config(&queries, &api)
                    .mutate(UpdateConfigArgs { id, data })
                    .await?;
                print_value(&updated, OutputFormat::Json)
            }
            ConfigCommands::Delete { id } => {
                let id = parse_id(&id)?;
                tracing::debug!(%id, "config delete");
                let (api, queries) = self.connect()?;
                let confirmation = use_delete_config(&queries, &api).mutate(id).await?;
                print_value(&confirmation, OutputFormat::Json)
            }
        }
    }

    fn handle_settings_command(&mut self, command: SettingsCommands) -> Result<(), AppError> {
        match command {
            SettingsCommands::Show => {
                println!("Settings:");
                println!("=========");
                if let Some(path) = &self.config_path {
                    println!("File: {}", path.display());
                }
                match &self.config.default_profile {
                    Some(name) => println!("Default Profile: {}", name),
                    None => println!("Default Profile: (not set)"),
                }
                if let Some(url) = &self.base_url_override {
                    println!("Base URL override: {}", url);
                }

                println!("\nProfiles:");
                if self.config.profiles.is_empty() {
                    println!("  No profiles configured");
                }
                let mut names: Vec<_> = self.config.profiles.keys().collect();
                names.sort();
                for name in names {
                    let profile = &self.config.profiles[name];
                    println!("  [{}]", name);
                    println!(
                        "    Base URL: {}",
                        profile.base_url.as_deref().unwrap_or("(not set)")
                    );
                    if let Some(timeout) = profile.timeout_seconds {
                        println!("    Timeout: {} seconds", timeout);
                    }
                    if let Some(stale) = profile.stale_time_seconds {
                        println!("    Stale time: {} seconds", stale);
                    }
                }
                Ok(())
            }
            SettingsCommands::Set { key, value } => {
                let profile_name = self.profile_name().to_string();
                self.set_profile_field(&profile_name, &key, &value)?;
                if self.config.default_profile.is_none() {
                    self.config.default_profile = Some(profile_name.clone());
                }

                let path = self
                    .config_path
                    .clone()
                    .ok_or(StorageError::ConfigDirNotFound)?;
                self.config.save(Some(path))?;
                println!("Set {} for profile '{}'", key, profile_name);
                Ok(())
            }
        }
    }

    fn set_profile_field(&mut self, profile: &str, field: &str, value: &str) -> Result<(), AppError> {
        let entry = self.config.profile_mut(profile);
        match field {
            "url" => {
                validate_url(value).map_err(|reason| ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason,
                })?;
                entry.base_url = Some(value.to_string());
            }
            "timeout" => {
                let secs = parse_seconds(field, value)?;
                validate_timeout_secs(secs).map_err(|reason| ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason,
                })?;
                entry.timeout_seconds = Some(secs);
            }
            "stale-time" => entry.stale_time_seconds = Some(parse_seconds(field, value)?),
            _ => {
                return Err(CliError::InvalidArguments(format!(
                    "Unknown field: {}. Use 'url', 'timeout' or 'stale-time'",
                    field
                ))
                .into());
            }
        }
        Ok(())
    }
}

fn parse_json(argument: &str, raw: &str) -> Result<Value, AppError> {
    serde_json::from_str(raw).map_err(|e| {
        CliError::InvalidJson {
            argument: argument.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn parse_id(raw: &str) -> Result<ConfigId, AppError> {
    ConfigId::new(raw).map_err(|reason| CliError::InvalidArguments(reason).into())
}

fn parse_seconds(field: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: "expected a whole number of seconds".to_string(),
    })
}

fn print_value(value: &Value, format: OutputFormat) -> Result<(), AppError> {
    println!("{}", render(value, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::config::Profile;
    use tempfile::tempdir;

    fn create_test_dispatcher(config_path: Option<PathBuf>) -> Dispatcher {
        let mut config = Config::default();
        config.default_profile = Some("test".to_string());
        config.set_profile(
            "test".to_string(),
            Profile {
                base_url: Some("http://example.test/api/".to_string()),
                ..Default::default()
            },
        );
        Dispatcher::new(config, config_path, None, None)
    }

    #[test]
    fn test_profile_name_resolution() {
        let dispatcher = create_test_dispatcher(None);
        assert_eq!(dispatcher.profile_name(), "test");

        let dispatcher = Dispatcher::new(Config::default(), None, None, None);
        assert_eq!(dispatcher.profile_name(), DEFAULT_PROFILE);

        let dispatcher = Dispatcher::new(Config::default(), None, Some("ops".to_string()), None);
        assert_eq!(dispatcher.profile_name(), "ops");
    }

    #[test]
    fn test_connect_uses_profile_settings() {
        let dispatcher = create_test_dispatcher(None);
        let (api, _) = dispatcher.connect().expect("connect");
        assert_eq!(api.base_url(), "http://example.test/api");
    }

    #[test]
    fn test_connect_without_base_url_fails() {
        let dispatcher = Dispatcher::new(Config::default(), None, None, None);
        assert!(matches!(
            dispatcher.connect(),
            Err(AppError::Config(ConfigError::MissingField { .. }))
        ));
    }

    #[test]
    fn test_settings_set_persists() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        let mut dispatcher = Dispatcher::new(Config::default(), Some(path.clone()), None, None);

        dispatcher
            .handle_settings_command(SettingsCommands::Set {
                key: "url".to_string(),
                value: "http://localhost:5000/api/".to_string(),
            })
            .expect("set url");
        dispatcher
            .handle_settings_command(SettingsCommands::Set {
                key: "timeout".to_string(),
                value: "20".to_string(),
            })
            .expect("set timeout");

        let saved = Config::load(Some(path)).expect("load");
        assert_eq!(saved.default_profile.as_deref(), Some(DEFAULT_PROFILE));
        let profile = saved.get_profile(DEFAULT_PROFILE).expect("profile saved");
        assert_eq!(profile.base_url.as_deref(), Some("http://localhost:5000/api/"));
        assert_eq!(profile.timeout_seconds, Some(20));
    }

    #[test]
    fn test_set_profile_field_rejects_bad_input() {
        let mut dispatcher = create_test_dispatcher(None);

        let result = dispatcher.set_profile_field("test", "host", "http://x.test");
        assert!(format!("{:?}", result).contains("Unknown field: host"));

        assert!(dispatcher.set_profile_field("test", "url", "x.test").is_err());
        assert!(dispatcher.set_profile_field("test", "timeout", "soon").is_err());
        assert!(matches!(
            dispatcher.set_profile_field("test", "timeout", "0"),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert_eq!(dispatcher.config.get_profile("test").unwrap().timeout_seconds, None);
        assert!(dispatcher.set_profile_field("test", "timeout", "15").is_ok());
        assert!(dispatcher.set_profile_field("test", "stale-time", "0").is_ok());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_json("--data", r#"{"a":1}"#).unwrap(), serde_json::json!({"a": 1}));
        assert!(matches!(
            parse_json("--data", "{a:1}"),
            Err(AppError::Cli(CliError::InvalidJson { .. }))
        ));
        assert_eq!(parse_id("42").unwrap().as_str(), "42");
        assert!(matches!(
            parse_id("a/b"),
            Err(AppError::Cli(CliError::InvalidArguments(_)))
        ));
    }
}
