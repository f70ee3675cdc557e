//! The membership-creation hook.
//!
//! Sequences the initial charge and the recurring-billing setup on a single
//! membership-creation event. The two payment-side failure categories are
//! reported through [`ActivationOutcome`] so the caller can decide on
//! compensation or user notification; configuration and storage failures
//! propagate as errors.

use std::sync::Arc;

use common_utils::date_time;
use error_stack::ResultExt;

use crate::{
    connectors::{SubscriptionGateway, SubscriptionGatewayProxy},
    core::errors::{ArbError, CustomResult, MembershipError, PaymentGatewayError},
    db::StorageInterface,
    gateway::{GatewayStore, PaymentGateway},
    logger,
    types::{Membership, MembershipOffer, Payment, PaymentId, PaymentMethod},
};

use crate::connectors::authorizedotnet::transformers;

/// Builds the subscription submission bound to the resolved gateway.
pub type SubscriptionGatewayFactory =
    Box<dyn Fn(&dyn PaymentGateway) -> Box<dyn SubscriptionGateway> + Send + Sync>;

/// Result of a membership-creation event.
#[derive(Debug)]
pub enum ActivationOutcome {
    /// Initial charge and recurring setup both succeeded.
    Subscribed {
        /// The persisted initial payment.
        payment_id: PaymentId,
    },
    /// The initial charge failed; no payment was persisted and no
    /// subscription call was attempted.
    ChargeDeclined {
        /// What the charge step reported.
        error: error_stack::Report<PaymentGatewayError>,
    },
    /// The charge succeeded and its payment record remains persisted and
    /// linked to the membership, but the recurring-billing setup failed.
    /// The member has been charged once and has no subscription; the caller
    /// decides whether to compensate.
    RecurringSetupFailed {
        /// The persisted initial payment.
        payment_id: PaymentId,
        /// What the subscription step reported.
        error: error_stack::Report<ArbError>,
    },
}

/// The Authorize.Net membership provider.
pub struct AuthnetMembershipProvider {
    gateway_store: GatewayStore,
    db: Arc<dyn StorageInterface>,
    /// The configured gateway selection.
    gateway: String,
    subscription_gateway: SubscriptionGatewayFactory,
}

impl std::fmt::Debug for AuthnetMembershipProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthnetMembershipProvider")
            .field("gateway_store", &self.gateway_store)
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

impl AuthnetMembershipProvider {
    /// A provider charging through the gateway selected in configuration.
    pub fn new(
        gateway_store: GatewayStore,
        db: Arc<dyn StorageInterface>,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            gateway_store,
            db,
            gateway: gateway.into(),
            subscription_gateway: Box::new(|gateway| {
                Box::new(SubscriptionGatewayProxy::bind(gateway))
            }),
        }
    }

    /// Replace the subscription submission seam. Tests use this to observe
    /// the built request without network access.
    pub fn with_subscription_gateway(mut self, factory: SubscriptionGatewayFactory) -> Self {
        self.subscription_gateway = factory;
        self
    }

    /// Handle a membership-creation event: charge the initial payment, then
    /// set up the recurring subscription at the processor.
    #[logger::instrument(skip_all, fields(membership_id = %membership.membership_id))]
    pub async fn post_create_membership(
        &self,
        membership: &Membership,
        offer: &MembershipOffer,
        payment_method: &PaymentMethod,
    ) -> CustomResult<ActivationOutcome, MembershipError> {
        let gateway = self
            .gateway_store
            .resolve(&self.gateway)
            .change_context(MembershipError::GatewayResolveFailed)?;

        let payment = match self
            .make_initial_payment(gateway.as_ref(), membership, offer, payment_method)
            .await
        {
            Ok(payment) => self
                .db
                .insert_payment(payment)
                .await
                .change_context(MembershipError::StorageFailed)?,
            Err(error) => {
                logger::error!(?error, "initial subscription charge failed");
                return Ok(ActivationOutcome::ChargeDeclined { error });
            }
        };

        match self
            .create_remote_subscription(gateway.as_ref(), offer, payment_method)
            .await
        {
            Ok(()) => {
                logger::info!(payment_id = %payment.payment_id, "membership subscribed");
                Ok(ActivationOutcome::Subscribed {
                    payment_id: payment.payment_id,
                })
            }
            Err(error) => {
                logger::error!(
                    ?error,
                    payment_id = %payment.payment_id,
                    "recurring billing setup failed after a successful charge"
                );
                Ok(ActivationOutcome::RecurringSetupFailed {
                    payment_id: payment.payment_id,
                    error,
                })
            }
        }
    }

    /// Charge the offer price immediately through the resolved gateway and
    /// link the resulting payment to the membership. The charge happens
    /// before the link, so a declined payment is never persisted.
    async fn make_initial_payment(
        &self,
        gateway: &dyn PaymentGateway,
        membership: &Membership,
        offer: &MembershipOffer,
        payment_method: &PaymentMethod,
    ) -> CustomResult<Payment, PaymentGatewayError> {
        let mut payment = Payment::subscription_payment(offer, payment_method);
        gateway.create_payment(&mut payment).await?;
        payment.link_membership(membership.membership_id.clone());
        Ok(payment)
    }

    /// Create the subscription at the processor.
    async fn create_remote_subscription(
        &self,
        gateway: &dyn PaymentGateway,
        offer: &MembershipOffer,
        payment_method: &PaymentMethod,
    ) -> CustomResult<(), ArbError> {
        let customer_profile_id = gateway
            .get_remote_customer_id(&payment_method.customer_id)
            .await
            .change_context(ArbError::CustomerProfileLookupFailed)?;
        let subscription = transformers::build_subscription_request(
            offer,
            payment_method,
            customer_profile_id,
            date_time::now().date(),
        )
        .change_context(ArbError::RequestConstructionFailed)?;
        (self.subscription_gateway)(gateway)
            .create_subscription(subscription)
            .await
    }
}
