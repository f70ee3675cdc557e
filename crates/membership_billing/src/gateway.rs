//! The payment-gateway abstraction and its configuration registry.

use std::{collections::HashMap, sync::Arc};

use masking::Secret;
use serde::Deserialize;

use crate::{
    core::errors::{CustomResult, GatewayResolveError, PaymentGatewayError},
    types::{CustomerId, GatewayId, Payment},
};

/// Operating mode of a configured gateway.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GatewayMode {
    /// Requests go to the processor's sandbox.
    Test,
    /// Requests go to the production processor.
    Live,
}

/// Credentials of a configured Authorize.Net gateway.
#[derive(Clone, Debug, Deserialize)]
pub struct GatewayConfiguration {
    /// The API login id identifying the merchant account.
    pub api_login_id: Secret<String>,
    /// The transaction key authenticating server-side calls.
    pub transaction_key: Secret<String>,
    /// The public client key used by the Accept.js capture form.
    pub client_key: Secret<String>,
}

/// A configured integration with a remote payment processor, capable of
/// charging payments and resolving remote customer identifiers.
#[async_trait::async_trait]
pub trait PaymentGateway: std::fmt::Debug + Send + Sync {
    /// Human-readable name of this gateway configuration.
    fn label(&self) -> &str;

    /// Sandbox or production.
    fn mode(&self) -> GatewayMode;

    /// The stored credential configuration.
    fn configuration(&self) -> &GatewayConfiguration;

    /// Charge the given payment at the processor. On success the payment's
    /// status and processor transaction id are updated in place.
    async fn create_payment(&self, payment: &mut Payment)
        -> CustomResult<(), PaymentGatewayError>;

    /// The processor-side customer profile id for an account holder.
    async fn get_remote_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> CustomResult<Secret<String>, PaymentGatewayError>;
}

/// Registry of configured gateways, keyed by gateway id.
#[derive(Clone, Default)]
pub struct GatewayStore {
    gateways: HashMap<GatewayId, Arc<dyn PaymentGateway>>,
}

impl std::fmt::Debug for GatewayStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayStore")
            .field("gateways", &self.gateways.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl GatewayStore {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gateway under its id.
    pub fn register(&mut self, gateway_id: GatewayId, gateway: Arc<dyn PaymentGateway>) {
        self.gateways.insert(gateway_id, gateway);
    }

    /// Resolve the gateway selected in the provider configuration.
    ///
    /// Fails if the selection is empty or the referenced gateway does not
    /// exist. No retries.
    pub fn resolve(
        &self,
        selection: &str,
    ) -> CustomResult<Arc<dyn PaymentGateway>, GatewayResolveError> {
        if selection.is_empty() {
            return Err(error_stack::report!(GatewayResolveError::NotConfigured));
        }
        self.gateways
            .get(&GatewayId::new(selection))
            .cloned()
            .ok_or_else(|| {
                error_stack::report!(GatewayResolveError::NotFound {
                    gateway_id: selection.to_string(),
                })
            })
    }

    /// The configured gateways, as (id, label) pairs for a selection surface.
    pub fn list_gateways(&self) -> Vec<(GatewayId, String)> {
        let mut gateways = self
            .gateways
            .iter()
            .map(|(id, gateway)| (id.clone(), gateway.label().to_string()))
            .collect::<Vec<_>>();
        gateways.sort_by(|a, b| a.0.get_string_repr().cmp(b.0.get_string_repr()));
        gateways
    }

    /// Whether any gateway of the Authorize.Net family is configured.
    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_is_rejected() {
        let store = GatewayStore::new();
        let err = store.resolve("").unwrap_err();
        assert!(matches!(
            err.current_context(),
            GatewayResolveError::NotConfigured
        ));
    }

    #[test]
    fn unknown_gateway_is_rejected() {
        let store = GatewayStore::new();
        let err = store.resolve("authnet_main").unwrap_err();
        assert!(matches!(
            err.current_context(),
            GatewayResolveError::NotFound { .. }
        ));
    }
}
