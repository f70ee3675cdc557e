//! Error types for the membership billing flows.

pub use common_utils::errors::CustomResult;

/// Failures of the charge step of the initial payment: the card or processor
/// declined, or the gateway call itself failed.
#[derive(Debug, thiserror::Error)]
pub enum PaymentGatewayError {
    /// The processor refused the charge.
    #[error("The charge was declined by the processor: [{code}] {text}")]
    ChargeDeclined {
        /// Processor error code.
        code: String,
        /// Processor error text.
        text: String,
    },
    /// The gateway call could not be executed.
    #[error("Failed to execute the payment gateway request")]
    RequestFailed,
    /// The owner has no customer profile at the processor.
    #[error("No remote customer profile exists for customer {customer_id}")]
    MissingRemoteCustomer {
        /// The owner whose profile lookup failed.
        customer_id: String,
    },
}

/// Failures of the recurring-billing subscription call: the request could not
/// be built or sent, or the processor rejected it.
#[derive(Debug, thiserror::Error)]
pub enum ArbError {
    /// The customer profile reference could not be resolved.
    #[error("Failed to resolve the customer profile for the subscription")]
    CustomerProfileLookupFailed,
    /// The subscription request could not be constructed.
    #[error("Failed to construct the subscription request")]
    RequestConstructionFailed,
    /// The recurring-billing call could not be executed.
    #[error("Failed to execute the recurring billing request")]
    RequestFailed,
    /// The processor rejected the subscription.
    #[error("The processor rejected the subscription: [{code}] {text}")]
    SubscriptionRejected {
        /// Processor error code.
        code: String,
        /// Processor error text.
        text: String,
    },
}

/// Gateway configuration resolution failures. These propagate to the caller;
/// they are not part of the activation outcome.
#[derive(Debug, thiserror::Error)]
pub enum GatewayResolveError {
    /// The membership provider has no gateway configured.
    #[error("No payment gateway is configured for the membership provider")]
    NotConfigured,
    /// The configured gateway does not exist.
    #[error("Payment gateway {gateway_id} could not be loaded")]
    NotFound {
        /// The id that failed to resolve.
        gateway_id: String,
    },
}

/// Storage seam failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No record matched the lookup.
    #[error("Value not found: {entity}")]
    ValueNotFound {
        /// The kind of record looked up.
        entity: &'static str,
    },
}

/// Transport and codec failures of a connector call.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// The request body could not be encoded.
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    /// The HTTP call failed.
    #[error("Failed to execute a processing step")]
    ProcessingStepFailed,
    /// The response body could not be decoded.
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    /// A date could not be rendered in the format the remote API expects.
    #[error("Date formatting failed")]
    DateFormattingFailed,
}

/// Errors the membership-creation hook propagates to its caller, as opposed
/// to the charge/subscription failures it reports through the outcome type.
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    /// The configured gateway could not be resolved.
    #[error("Failed to resolve the configured payment gateway")]
    GatewayResolveFailed,
    /// The payment record could not be persisted.
    #[error("Failed to persist the subscription payment")]
    StorageFailed,
}
