//! Authorize.Net connector: one-time profile charges and recurring billing.

pub mod transformers;

use std::sync::Arc;

use error_stack::ResultExt;
use masking::Secret;

use crate::{
    consts,
    core::errors::{ArbError, CustomResult, PaymentGatewayError},
    db::StorageInterface,
    gateway::{GatewayConfiguration, GatewayMode, PaymentGateway},
    logger,
    services,
    types::{CustomerId, GatewayId, Payment},
};

/// A configured Authorize.Net gateway, charging payments against stored
/// customer payment profiles.
pub struct AuthorizedotnetGateway {
    gateway_id: GatewayId,
    label: String,
    mode: GatewayMode,
    configuration: GatewayConfiguration,
    db: Arc<dyn StorageInterface>,
}

impl std::fmt::Debug for AuthorizedotnetGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedotnetGateway")
            .field("gateway_id", &self.gateway_id)
            .field("label", &self.label)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl AuthorizedotnetGateway {
    /// Assemble a gateway from its stored configuration.
    pub fn new(
        gateway_id: GatewayId,
        label: String,
        mode: GatewayMode,
        configuration: GatewayConfiguration,
        db: Arc<dyn StorageInterface>,
    ) -> Self {
        Self {
            gateway_id,
            label,
            mode,
            configuration,
            db,
        }
    }

    fn base_url(&self) -> &'static str {
        match self.mode {
            GatewayMode::Test => consts::AUTHORIZEDOTNET_SANDBOX_BASE_URL,
            GatewayMode::Live => consts::AUTHORIZEDOTNET_LIVE_BASE_URL,
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for AuthorizedotnetGateway {
    fn label(&self) -> &str {
        &self.label
    }

    fn mode(&self) -> GatewayMode {
        self.mode
    }

    fn configuration(&self) -> &GatewayConfiguration {
        &self.configuration
    }

    #[logger::instrument(skip_all, fields(payment_id = %payment.payment_id))]
    async fn create_payment(
        &self,
        payment: &mut Payment,
    ) -> CustomResult<(), PaymentGatewayError> {
        let customer_profile_id = self
            .get_remote_customer_id(&payment.payment_method.customer_id)
            .await?;
        let request = transformers::CreateTransactionRequest::try_from_payment(
            &self.configuration,
            payment,
            customer_profile_id,
        )
        .change_context(PaymentGatewayError::RequestFailed)?;

        let response: transformers::AuthorizedotnetPaymentsResponse =
            services::call_connector_api(self.base_url(), &request)
                .await
                .change_context(PaymentGatewayError::RequestFailed)?;
        transformers::update_payment_from_response(payment, response)
    }

    async fn get_remote_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> CustomResult<Secret<String>, PaymentGatewayError> {
        self.db
            .find_remote_customer_id(customer_id, &self.gateway_id)
            .await
            .change_context(PaymentGatewayError::RequestFailed)?
            .ok_or_else(|| {
                error_stack::report!(PaymentGatewayError::MissingRemoteCustomer {
                    customer_id: customer_id.to_string(),
                })
            })
    }
}

/// The Authorize.Net API configuration a bound proxy submits with.
#[derive(Clone, Debug)]
pub struct ArbApiConfiguration {
    /// Route calls to the sandbox endpoint.
    pub sandbox: bool,
    /// The API login id identifying the merchant account.
    pub api_login_id: Secret<String>,
    /// The transaction key authenticating server-side calls.
    pub transaction_key: Secret<String>,
    /// The public client key of the capture form.
    pub client_key: Secret<String>,
}

/// Submission seam for recurring-billing subscriptions, letting the
/// orchestrator be exercised without network access.
#[async_trait::async_trait]
pub trait SubscriptionGateway: Send + Sync {
    /// Create the subscription at the processor. Nothing beyond
    /// success-or-error is reported back.
    async fn create_subscription(
        &self,
        subscription: transformers::ArbSubscription,
    ) -> CustomResult<(), ArbError>;
}

/// Uses a payment gateway's credentials for subscription operations.
///
/// A proxy is bound to exactly one gateway for its whole lifetime: binding
/// happens at construction and no rebinding operation exists.
#[derive(Debug)]
pub struct SubscriptionGatewayProxy {
    configuration: ArbApiConfiguration,
}

impl SubscriptionGatewayProxy {
    /// Bind a proxy to a gateway, extracting its operating mode and
    /// credentials into the API configuration.
    pub fn bind(gateway: &dyn PaymentGateway) -> Self {
        let configuration = gateway.configuration();
        Self {
            configuration: ArbApiConfiguration {
                sandbox: gateway.mode() == GatewayMode::Test,
                api_login_id: configuration.api_login_id.clone(),
                transaction_key: configuration.transaction_key.clone(),
                client_key: configuration.client_key.clone(),
            },
        }
    }

    /// The bound API configuration.
    pub fn configuration(&self) -> &ArbApiConfiguration {
        &self.configuration
    }

    fn base_url(&self) -> &'static str {
        if self.configuration.sandbox {
            consts::AUTHORIZEDOTNET_SANDBOX_BASE_URL
        } else {
            consts::AUTHORIZEDOTNET_LIVE_BASE_URL
        }
    }
}

#[async_trait::async_trait]
impl SubscriptionGateway for SubscriptionGatewayProxy {
    #[logger::instrument(skip_all)]
    async fn create_subscription(
        &self,
        subscription: transformers::ArbSubscription,
    ) -> CustomResult<(), ArbError> {
        let request = transformers::ArbCreateSubscriptionRequest::new(
            transformers::AuthorizedotnetAuthType::new(
                self.configuration.api_login_id.clone(),
                self.configuration.transaction_key.clone(),
            ),
            subscription,
        );
        let response: transformers::ArbCreateSubscriptionResponse =
            services::call_connector_api(self.base_url(), &request)
                .await
                .change_context(ArbError::RequestFailed)?;

        match response.messages.result_code {
            transformers::ResultCode::Ok => {
                logger::debug!(
                    subscription_id = ?response.subscription_id,
                    "recurring billing subscription created"
                );
                Ok(())
            }
            transformers::ResultCode::Error => {
                let (code, text) = response.messages.error_code_and_text();
                Err(error_stack::report!(ArbError::SubscriptionRejected {
                    code,
                    text,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use masking::PeekInterface;

    use super::*;
    use crate::db::MockDb;

    fn gateway(id: &str, login: &str, mode: GatewayMode) -> AuthorizedotnetGateway {
        AuthorizedotnetGateway::new(
            GatewayId::new(id),
            format!("Authorize.Net {id}"),
            mode,
            GatewayConfiguration {
                api_login_id: Secret::new(login.to_string()),
                transaction_key: Secret::new(format!("{login}_txn_key")),
                client_key: Secret::new(format!("{login}_client_key")),
            },
            Arc::new(MockDb::new()),
        )
    }

    #[test]
    fn bind_extracts_mode_and_credentials() {
        let proxy = SubscriptionGatewayProxy::bind(&gateway("a", "login_a", GatewayMode::Test));
        assert!(proxy.configuration().sandbox);
        assert_eq!(proxy.configuration().api_login_id.peek(), "login_a");
        assert_eq!(proxy.configuration().transaction_key.peek(), "login_a_txn_key");
    }

    #[test]
    fn binding_a_second_proxy_leaves_the_first_untouched() {
        let proxy_a = SubscriptionGatewayProxy::bind(&gateway("a", "login_a", GatewayMode::Test));
        let _proxy_b = SubscriptionGatewayProxy::bind(&gateway("b", "login_b", GatewayMode::Live));

        assert_eq!(proxy_a.configuration().api_login_id.peek(), "login_a");
        assert!(proxy_a.configuration().sandbox);
    }

    #[test]
    fn live_mode_targets_the_production_endpoint() {
        let proxy = SubscriptionGatewayProxy::bind(&gateway("a", "login_a", GatewayMode::Live));
        assert_eq!(proxy.base_url(), consts::AUTHORIZEDOTNET_LIVE_BASE_URL);
    }
}
