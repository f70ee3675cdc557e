//! Domain model for membership billing.

use common_utils::types::Money;
use masking::Secret;
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an externally supplied id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The underlying string representation.
            pub fn get_string_repr(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type!(MembershipId, "Identifier of a membership record.");
id_type!(CustomerId, "Identifier of the account holder owning a membership.");
id_type!(PaymentId, "Identifier of a payment record.");
id_type!(PaymentMethodId, "Identifier of a stored payment method.");
id_type!(GatewayId, "Identifier of a configured payment gateway.");

impl PaymentId {
    /// Generate a fresh payment id.
    pub fn generate() -> Self {
        Self(common_utils::generate_id_with_default_len("pay"))
    }
}

/// The account-holder record a subscription is purchased for.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Membership {
    /// Identifier of this membership.
    pub membership_id: MembershipId,
    /// The account holder.
    pub customer_id: CustomerId,
}

/// The priced plan being purchased. Immutable input to the purchase; drives
/// both the initial charge and the recurring amount.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MembershipOffer {
    /// Human-readable name of the plan.
    pub label: String,
    /// Price per billing cycle.
    pub price: Money,
}

/// A stored payment instrument, tokenized at the processor.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PaymentMethod {
    /// Identifier of this payment method.
    pub payment_method_id: PaymentMethodId,
    /// The owning account holder.
    pub customer_id: CustomerId,
    /// Processor-side payment profile token standing in for card data.
    pub remote_id: Secret<String>,
    /// The gateway this method was tokenized with.
    pub gateway_id: GatewayId,
}

/// Type tag of a payment record.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentType {
    /// The initial charge made when a subscription membership is created.
    SubscriptionPayment,
}

/// Processing state of a payment record.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    /// Created locally, not yet charged.
    Pending,
    /// Accepted by the processor.
    Charged,
}

/// A payment record, created fresh per initial charge and persisted once.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Payment {
    /// Identifier of this payment.
    pub payment_id: PaymentId,
    /// Type tag.
    pub payment_type: PaymentType,
    /// Charged amount.
    pub amount: Money,
    /// The instrument charged.
    pub payment_method: PaymentMethod,
    /// The gateway the charge goes through.
    pub gateway_id: GatewayId,
    /// Processing state.
    pub status: PaymentStatus,
    /// Processor-side transaction id, set once the charge is accepted.
    pub connector_transaction_id: Option<String>,
    /// The membership this payment funds. Set exactly once, after the charge
    /// succeeds and before the record is persisted.
    pub membership_id: Option<MembershipId>,
}

impl Payment {
    /// Construct the initial subscription payment for an offer, to be charged
    /// through the payment method's gateway.
    pub fn subscription_payment(offer: &MembershipOffer, payment_method: &PaymentMethod) -> Self {
        Self {
            payment_id: PaymentId::generate(),
            payment_type: PaymentType::SubscriptionPayment,
            amount: offer.price,
            gateway_id: payment_method.gateway_id.clone(),
            payment_method: payment_method.clone(),
            status: PaymentStatus::Pending,
            connector_transaction_id: None,
            membership_id: None,
        }
    }

    /// Attach the membership reference after a successful charge.
    pub fn link_membership(&mut self, membership_id: MembershipId) {
        self.membership_id = Some(membership_id);
    }
}
