//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use armory_domain::ArmoryError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ArmoryError);

impl From<InfraError> for ArmoryError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ArmoryError> for InfraError {
    fn from(value: ArmoryError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoArmoryError {
    fn into_armory(self) -> ArmoryError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ArmoryError */
/* -------------------------------------------------------------------------- */

impl IntoArmoryError for HttpError {
    fn into_armory(self) -> ArmoryError {
        if self.is_timeout() {
            return ArmoryError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return ArmoryError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return ArmoryError::Decode(format!("HTTP body could not be decoded: {self}"));
        }

        if let Some(status) = self.status() {
            return ArmoryError::Remote { status: status.as_u16(), body: self.to_string() };
        }

        if self.is_builder() {
            return ArmoryError::Config(format!("invalid HTTP request: {self}"));
        }

        ArmoryError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_armory())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → ArmoryError */
/* -------------------------------------------------------------------------- */

impl IntoArmoryError for IoError {
    fn into_armory(self) -> ArmoryError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => ArmoryError::Storage(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                ArmoryError::Storage(format!("permission denied: {self}"))
            }
            _ => ArmoryError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_armory())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml → ArmoryError */
/* -------------------------------------------------------------------------- */

impl IntoArmoryError for JsonError {
    fn into_armory(self) -> ArmoryError {
        ArmoryError::Decode(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_armory())
    }
}

impl IntoArmoryError for TomlError {
    fn into_armory(self) -> ArmoryError {
        ArmoryError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_armory())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
