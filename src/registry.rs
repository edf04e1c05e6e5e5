use crate::types::{Descriptor, ICAOAddress, ICAOAddressError};

/// Known aircraft keyed by device address, loaded from a TOML file:
///
/// ```toml
/// [[aircraft]]
/// address = "3E1A07"
/// registration = "D-KABC"
/// model = "ASK-21"
/// competition_number = "K2"
/// ```
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    by_address: std::collections::HashMap<ICAOAddress, Descriptor>,
}

#[derive(serde::Deserialize)]
struct RegistryFile {
    #[serde(default)]
    aircraft: Vec<RegistryEntry>,
}

#[derive(serde::Deserialize)]
struct RegistryEntry {
    address: String,
    #[serde(flatten)]
    descriptor: Descriptor,
}

impl DescriptorRegistry {
    #[must_use]
    pub fn empty() -> Self {
        DescriptorRegistry::default()
    }

    pub fn load_from_path(path: &std::path::PathBuf) -> Result<Self, RegistryError> {
        let string = std::fs::read_to_string(path).map_err(|error| RegistryError::Io {
            source: error,
            path: path.clone(),
        })?;

        let file: RegistryFile =
            toml::from_str(&string).map_err(|error| RegistryError::Parse {
                source: error,
                path: path.clone(),
            })?;

        let mut registry = DescriptorRegistry::empty();
        for entry in file.aircraft {
            let address = ICAOAddress::from_hex_str(&entry.address).map_err(|error| {
                RegistryError::InvalidAddress {
                    source: error,
                    address: entry.address.clone(),
                }
            })?;
            if registry.insert(address, entry.descriptor).is_some() {
                log::warn!("Registry lists {address} more than once, keeping the last entry");
            }
        }
        log::info!(
            "Loaded {} aircraft descriptors from '{}'",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Adds or replaces the descriptor for `address`.
    pub fn insert(&mut self, address: ICAOAddress, descriptor: Descriptor) -> Option<Descriptor> {
        self.by_address.insert(address, descriptor)
    }

    #[must_use]
    pub fn lookup(&self, address: ICAOAddress) -> Option<&Descriptor> {
        self.by_address.get(&address)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

#[derive(Debug)]
pub enum RegistryError {
    Io {
        source: std::io::Error,
        path: std::path::PathBuf,
    },
    Parse {
        source: toml::de::Error,
        path: std::path::PathBuf,
    },
    InvalidAddress {
        source: ICAOAddressError,
        address: String,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Io {
                source: error,
                path,
            } => {
                write!(
                    f,
                    "Failed to read registry file '{}': {}",
                    path.display(),
                    error
                )
            }
            RegistryError::Parse {
                source: error,
                path,
            } => {
                write!(
                    f,
                    "Failed to parse registry file '{}': {}",
                    path.display(),
                    error
                )
            }
            RegistryError::InvalidAddress {
                source: error,
                address,
            } => write!(f, "Invalid aircraft address '{address}': {error}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Io { source: error, .. } => Some(error),
            RegistryError::Parse { source: error, .. } => Some(error),
            RegistryError::InvalidAddress { source: error, .. } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DescriptorRegistry, RegistryError};
    use crate::types::ICAOAddress;

    fn write_registry(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "fr24_forwarder_{name}_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn when_loading_valid_registry_then_descriptors_are_found_by_address() {
        let path = write_registry(
            "valid",
            r#"
                [[aircraft]]
                address = "3e1a07"
                registration = "D-KABC"
                model = "ASK-21"
                competition_number = "K2"

                [[aircraft]]
                address = "DDA5BA"
                registration = "D-EFGH"
                tracked = false
            "#,
        );

        let registry = DescriptorRegistry::load_from_path(&path).expect("registry should load");
        std::fs::remove_file(&path).unwrap();

        assert_eq!(registry.len(), 2);
        let glider = registry
            .lookup(ICAOAddress::new(0x3E_1A07).unwrap())
            .expect("expected glider");
        assert_eq!(glider.registration, "D-KABC");
        assert_eq!(glider.competition_number, "K2");
        assert!(glider.tracked);

        let tug = registry
            .lookup(ICAOAddress::new(0xDD_A5BA).unwrap())
            .expect("expected tug");
        assert!(tug.model.is_empty());
        assert!(!tug.tracked);
        assert!(registry.lookup(ICAOAddress::new(1).unwrap()).is_none());
    }

    #[test]
    fn when_address_is_not_hex_then_invalid_address_error_is_returned() {
        let path = write_registry(
            "bad_address",
            r#"
                [[aircraft]]
                address = "nothex"
                registration = "D-KABC"
            "#,
        );

        let result = DescriptorRegistry::load_from_path(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(RegistryError::InvalidAddress { .. })));
    }

    #[test]
    fn when_file_is_missing_then_io_error_names_the_path() {
        let path = std::path::PathBuf::from("/nonexistent/registry.toml");
        let error = DescriptorRegistry::load_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/registry.toml"));
    }
}
