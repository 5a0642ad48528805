use config::{Config, ConfigError, File};
use encuesta_core::DescribeOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub survey: Option<SurveyConfig>,
    pub uploads: Option<UploadsConfig>,
    pub cors: Option<CorsConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SurveyConfig {
    /// Label prefixing free-text "other" answers in exports.
    pub other_label: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadsConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                path: get_default_db_path(),
            },
            survey: None,
            uploads: None,
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
        }
    }
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        Self::load_from(None)
    }

    pub fn load_from(path: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = format!(
                r#"
[server]
host = "127.0.0.1"
port = 8080

[database]
path = "{}"

[survey]
other_label = "Otro"

[uploads]
dir = "{}"

[cors]
allowed_origins = ["http://localhost:3000"]
"#,
                get_default_db_path().display(),
                get_default_uploads_dir().display()
            );
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;

        config.database.path = expand_tilde(config.database.path);
        if let Some(uploads) = &mut config.uploads {
            uploads.dir = expand_tilde(uploads.dir.clone());
        }

        Ok((config, config_path))
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads
            .as_ref()
            .map(|u| u.dir.clone())
            .unwrap_or_else(get_default_uploads_dir)
    }

    pub fn describe_options(&self) -> DescribeOptions {
        match &self.survey {
            Some(survey) => DescribeOptions {
                other_label: survey.other_label.clone(),
            },
            None => DescribeOptions::default(),
        }
    }
}

fn expand_tilde(path: PathBuf) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = home::home_dir() {
            let path_str = path.to_string_lossy();
            let expanded = path_str.replacen("~", &home.to_string_lossy(), 1);
            return PathBuf::from(expanded);
        }
    }
    path
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("encuesta/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

fn get_default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("encuesta/encuesta.db")
    } else {
        PathBuf::from("encuesta.db")
    }
}

fn get_default_uploads_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("encuesta/uploads")
    } else {
        PathBuf::from("uploads")
    }
}
