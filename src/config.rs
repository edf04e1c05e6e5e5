#[derive(serde::Deserialize, Debug)]
pub struct ApplicationConfig {
    pub glidernet: GliderNetConfig,
    #[serde(default)]
    pub forwarder: ForwarderConfig,
    pub descriptors: Option<DescriptorsConfig>,
}

impl ApplicationConfig {
    pub fn construct_from_path(
        path: &std::path::PathBuf,
    ) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        let string =
            std::fs::read_to_string(path).map_err(|error| errors::ApplicationConfigError::Io {
                source: error,
                path: path.clone(),
            })?;

        toml::from_str(&string).map_err(|error| errors::ApplicationConfigError::Parse {
            source: error,
            path: path.clone(),
        })
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct GliderNetConfig {
    pub host: String,
    pub port: u16,
    pub filter: String,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ForwarderConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        ForwarderConfig {
            host: String::from("wro.fr24.com"),
            port: 15099,
        }
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct DescriptorsConfig {
    pub path: std::path::PathBuf,
}

pub mod errors {

    #[derive(Debug)]
    pub enum ApplicationConfigError {
        Parse {
            source: toml::de::Error,
            path: std::path::PathBuf,
        },
        Io {
            source: std::io::Error,
            path: std::path::PathBuf,
        },
    }
    impl std::fmt::Display for ApplicationConfigError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ApplicationConfigError::Io {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to read config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Parse {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        error
                    )
                }
            }
        }
    }
    impl std::error::Error for ApplicationConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                ApplicationConfigError::Io { source: error, .. } => Some(error),
                ApplicationConfigError::Parse { source: error, .. } => Some(error),
            }
        }
    }
}
