use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging defaults, TOML, environment variables, and JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads configuration using `path` as the primary TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::base()
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"))
            .join(Json::file("config/Config.json"))
            .extract()?;

        Ok(config)
    }

    /// Loads `path`, then the profile file `Config.{profile}.toml` from the
    /// same directory on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(path: &str, profile: &str) -> Result<AppConfig> {
        let profile_path = Path::new(path)
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(format!("Config.{profile}.toml"));

        let config: AppConfig = Self::base()
            .merge(Toml::file(path))
            .merge(Toml::file(profile_path))
            .merge(Env::prefixed("APP_").split("__"))
            .join(Json::file("config/Config.json"))
            .extract()?;

        Ok(config)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
    }
}
