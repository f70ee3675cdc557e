//! Application configuration.
//!
//! Settings come from a TOML file layered with `MEMBERSHIP_BILLING__`
//! prefixed environment variables (`MEMBERSHIP_BILLING__PROVIDER__GATEWAY`
//! overrides `[provider] gateway`).

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use common_utils::errors::{CustomResult, ValidationError};
use error_stack::ResultExt;
use masking::{PeekInterface, Secret};
use serde::Deserialize;

use crate::{
    connectors::AuthorizedotnetGateway,
    db::StorageInterface,
    gateway::{GatewayConfiguration, GatewayMode, GatewayStore},
    types::GatewayId,
};

/// Errors at application bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// Reading or deserializing the configuration sources failed.
    #[error("Invalid configuration value provided: {0}")]
    InvalidConfigurationValueError(String),
}

/// Top-level application settings.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Logging configuration.
    #[serde(default)]
    pub log: Log,
    /// The membership provider's own configuration.
    #[serde(default)]
    pub provider: ProviderSettings,
    /// The configured Authorize.Net gateways, keyed by gateway id.
    #[serde(default)]
    pub gateways: HashMap<String, GatewaySettings>,
}

/// Logging configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Log {
    /// Default filter level when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration of the membership provider itself: which gateway to bill
/// through.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProviderSettings {
    /// Id of the selected payment gateway.
    pub gateway: String,
}

/// Stored settings of one Authorize.Net gateway.
#[derive(Clone, Debug, Deserialize)]
pub struct GatewaySettings {
    /// Human-readable name shown on selection surfaces.
    pub label: String,
    /// Sandbox or production.
    pub mode: GatewayMode,
    /// The API login id identifying the merchant account.
    pub api_login_id: Secret<String>,
    /// The transaction key authenticating server-side calls.
    pub transaction_key: Secret<String>,
    /// The public client key used by the capture form.
    pub client_key: Secret<String>,
}

impl From<&GatewaySettings> for GatewayConfiguration {
    fn from(settings: &GatewaySettings) -> Self {
        Self {
            api_login_id: settings.api_login_id.clone(),
            transaction_key: settings.transaction_key.clone(),
            client_key: settings.client_key.clone(),
        }
    }
}

impl Settings {
    /// Load settings from `config/development.toml` and the environment.
    pub fn new() -> CustomResult<Self, ApplicationError> {
        Self::with_config_path(None)
    }

    /// Load settings from an explicit file path and the environment.
    pub fn with_config_path(config_path: Option<PathBuf>) -> CustomResult<Self, ApplicationError> {
        let file = config_path.unwrap_or_else(|| PathBuf::from("config/development.toml"));
        let config = config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .add_source(
                config::Environment::with_prefix("MEMBERSHIP_BILLING")
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()
            .change_context(ApplicationError::InvalidConfigurationValueError(
                "Unable to assemble the configuration sources".to_string(),
            ))?;
        config
            .try_deserialize()
            .change_context(ApplicationError::InvalidConfigurationValueError(
                "Unable to deserialize the application configuration".to_string(),
            ))
    }

    /// Check the configuration for values that cannot work at runtime.
    /// Read-only: a failed validation leaves the stored settings untouched.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider.gateway.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field_name: "provider.gateway".to_string(),
            });
        }
        if !self.gateways.contains_key(&self.provider.gateway) {
            return Err(ValidationError::IncorrectValueProvided {
                field_name: "provider.gateway",
            });
        }
        for (gateway_id, gateway) in &self.gateways {
            if gateway.api_login_id.peek().is_empty() {
                return Err(ValidationError::InvalidValue {
                    message: format!("gateway {gateway_id} has an empty api_login_id"),
                });
            }
            if gateway.transaction_key.peek().is_empty() {
                return Err(ValidationError::InvalidValue {
                    message: format!("gateway {gateway_id} has an empty transaction_key"),
                });
            }
        }
        Ok(())
    }

    /// Build the gateway registry from the configured gateways.
    pub fn gateway_store(&self, db: Arc<dyn StorageInterface>) -> GatewayStore {
        let mut store = GatewayStore::new();
        for (gateway_id, settings) in &self.gateways {
            let gateway_id = GatewayId::new(gateway_id.clone());
            store.register(
                gateway_id.clone(),
                Arc::new(AuthorizedotnetGateway::new(
                    gateway_id,
                    settings.label.clone(),
                    settings.mode,
                    settings.into(),
                    Arc::clone(&db),
                )),
            );
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway_settings() -> GatewaySettings {
        GatewaySettings {
            label: "Authorize.Net (sandbox)".to_string(),
            mode: GatewayMode::Test,
            api_login_id: Secret::new("login".to_string()),
            transaction_key: Secret::new("txn_key".to_string()),
            client_key: Secret::new("client_key".to_string()),
        }
    }

    #[test]
    fn empty_gateway_selection_fails_validation_without_mutating() {
        let settings = Settings {
            log: Log::default(),
            provider: ProviderSettings {
                gateway: String::new(),
            },
            gateways: HashMap::from([("authnet_test".to_string(), gateway_settings())]),
        };

        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingRequiredField { ref field_name } if field_name == "provider.gateway"
        ));
        assert!(settings.provider.gateway.is_empty());
        assert_eq!(settings.gateways.len(), 1);
    }

    #[test]
    fn selection_must_reference_a_configured_gateway() {
        let settings = Settings {
            log: Log::default(),
            provider: ProviderSettings {
                gateway: "missing".to_string(),
            },
            gateways: HashMap::from([("authnet_test".to_string(), gateway_settings())]),
        };
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::IncorrectValueProvided {
                field_name: "provider.gateway"
            })
        ));
    }

    #[test]
    fn valid_settings_pass() {
        let settings = Settings {
            log: Log::default(),
            provider: ProviderSettings {
                gateway: "authnet_test".to_string(),
            },
            gateways: HashMap::from([("authnet_test".to_string(), gateway_settings())]),
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn settings_deserialize_from_toml() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [log]
                level = "debug"

                [provider]
                gateway = "authnet_test"

                [gateways.authnet_test]
                label = "Authorize.Net (sandbox)"
                mode = "test"
                api_login_id = "login"
                transaction_key = "txn_key"
                client_key = "client_key"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.provider.gateway, "authnet_test");
        let gateway = &settings.gateways["authnet_test"];
        assert_eq!(gateway.mode, GatewayMode::Test);
        assert_eq!(gateway.api_login_id.peek(), "login");
        settings.validate().unwrap();
    }
}
