use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

pub const DEFAULT_SETTINGS_FILE: &str = "filesim.yaml";

const SNAPSHOT_KEY: &str = "snapshot";
const SAVE_ON_EXIT_KEY: &str = "save_on_exit";

/// Optional settings read from a YAML file. Absent keys stay `None` so that
/// command line flags and built-in defaults can fill them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub snapshot: Option<PathBuf>,
    pub save_on_exit: Option<bool>,
}

impl Settings {
    pub async fn read(path: &Path) -> Result<Self, SettingsError> {
        debug!("Opening settings file: {}", path.display());
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).context(ReadSnafu {
                    file_path: path.display().to_string(),
                });
            }
        };

        let contents = String::from_utf8(bytes).map_err(|_| SettingsError::NotUtf8 {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    fn from_mapping(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();

        for (key, value) in top_level {
            let Yaml::Value(Scalar::String(key)) = key else {
                debug!("Skipping non-string settings key: {:?}", key);
                continue;
            };

            match &**key {
                SNAPSHOT_KEY => match value {
                    Yaml::Value(Scalar::String(path)) => {
                        settings.snapshot = Some(PathBuf::from(path.to_string()));
                    }
                    _ => return InvalidValueSnafu { key: SNAPSHOT_KEY, expected: "a path" }.fail(),
                },
                SAVE_ON_EXIT_KEY => match value {
                    Yaml::Value(Scalar::Boolean(flag)) => {
                        settings.save_on_exit = Some(*flag);
                    }
                    _ => {
                        return InvalidValueSnafu { key: SAVE_ON_EXIT_KEY, expected: "a boolean" }
                            .fail();
                    }
                },
                other => debug!("Ignoring unknown settings key '{}'", other),
            }
        }

        Ok(settings)
    }
}

impl TryFrom<&str> for Settings {
    type Error = SettingsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        match documents.first() {
            None => Ok(Settings::default()),
            Some(Yaml::Value(Scalar::Null)) => Ok(Settings::default()),
            Some(document) => {
                let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
                Self::from_mapping(top_level)
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsError {
    #[snafu(display("Failed to read the settings file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Settings file {} is not valid UTF-8", file_path))]
    NotUtf8 { file_path: String },
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of settings should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Setting '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: String },
}
