//! Wire types for the Authorize.Net API.
//!
//! Request structs keep their fields in the order the API documentation
//! lists them; the connector enforces field ordering.

use common_utils::{
    date_time,
    enums::Currency,
    types::{AmountConvertor, StringMajorUnit, StringMajorUnitForDisplay},
};
use error_stack::ResultExt;
use masking::Secret;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    consts,
    core::errors::{ConnectorError, CustomResult, PaymentGatewayError},
    gateway::GatewayConfiguration,
    types::{MembershipOffer, Payment, PaymentMethod, PaymentStatus},
};

const NO_ERROR_CODE: &str = "No error code";

/// Merchant credentials as every request body carries them.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedotnetAuthType {
    name: Secret<String>,
    transaction_key: Secret<String>,
}

impl From<&GatewayConfiguration> for AuthorizedotnetAuthType {
    fn from(configuration: &GatewayConfiguration) -> Self {
        Self {
            name: configuration.api_login_id.clone(),
            transaction_key: configuration.transaction_key.clone(),
        }
    }
}

impl AuthorizedotnetAuthType {
    /// Build merchant credentials from already-extracted fields.
    pub fn new(api_login_id: Secret<String>, transaction_key: Secret<String>) -> Self {
        Self {
            name: api_login_id,
            transaction_key,
        }
    }
}

#[derive(Debug, Serialize)]
pub enum TransactionType {
    #[serde(rename = "authCaptureTransaction")]
    Payment,
}

/// Envelope of the one-time charge call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    create_transaction_request: TransactionRequestBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRequestBody {
    merchant_authentication: AuthorizedotnetAuthType,
    ref_id: String,
    transaction_request: TransactionRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRequest {
    transaction_type: TransactionType,
    amount: StringMajorUnit,
    currency_code: Currency,
    profile: ProfileDetails,
    order: Order,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileDetails {
    customer_profile_id: Secret<String>,
    payment_profile: PaymentProfileDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentProfileDetails {
    payment_profile_id: Secret<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Order {
    invoice_number: String,
    description: String,
}

impl CreateTransactionRequest {
    /// Build the profile-based charge for the initial subscription payment.
    pub fn try_from_payment(
        configuration: &GatewayConfiguration,
        payment: &Payment,
        customer_profile_id: Secret<String>,
    ) -> CustomResult<Self, ConnectorError> {
        let amount = payment
            .amount
            .amount
            .to_major_unit_as_string(payment.amount.currency);
        Ok(Self {
            create_transaction_request: TransactionRequestBody {
                merchant_authentication: configuration.into(),
                ref_id: truncate_id(payment.payment_id.get_string_repr()),
                transaction_request: TransactionRequest {
                    transaction_type: TransactionType::Payment,
                    amount,
                    currency_code: payment.amount.currency,
                    profile: ProfileDetails {
                        customer_profile_id,
                        payment_profile: PaymentProfileDetails {
                            payment_profile_id: payment.payment_method.remote_id.clone(),
                        },
                    },
                    order: Order {
                        invoice_number: truncate_id(payment.payment_id.get_string_repr()),
                        description: payment.payment_type.to_string(),
                    },
                },
            },
        })
    }
}

fn truncate_id(id: &str) -> String {
    id.chars().take(consts::MAX_ID_LENGTH).collect()
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ResponseMessage {
    pub code: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, strum::Display)]
pub enum ResultCode {
    #[default]
    Ok,
    Error,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessages {
    pub result_code: ResultCode,
    pub message: Vec<ResponseMessage>,
}

impl ResponseMessages {
    /// The processor's error code and the concatenated message texts.
    pub fn error_code_and_text(&self) -> (String, String) {
        let code = self
            .message
            .first()
            .map(|message| message.code.clone())
            .unwrap_or_else(|| NO_ERROR_CODE.to_string());
        let text = self
            .message
            .iter()
            .map(|message| message.text.clone())
            .collect::<Vec<_>>()
            .join(" ");
        (code, text)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum AuthorizedotnetPaymentStatus {
    #[serde(rename = "1")]
    Approved,
    #[serde(rename = "2")]
    Declined,
    #[serde(rename = "3")]
    Error,
    #[serde(rename = "4")]
    HeldForReview,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub error_code: String,
    pub error_text: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    response_code: AuthorizedotnetPaymentStatus,
    #[serde(rename = "transId")]
    transaction_id: String,
    errors: Option<Vec<ErrorMessage>>,
}

/// Response of the one-time charge call.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedotnetPaymentsResponse {
    transaction_response: Option<TransactionResponse>,
    messages: ResponseMessages,
}

/// Apply the charge response to the local payment record: mark it charged and
/// record the processor transaction id, or surface the decline.
pub fn update_payment_from_response(
    payment: &mut Payment,
    response: AuthorizedotnetPaymentsResponse,
) -> CustomResult<(), PaymentGatewayError> {
    let transaction = match response.transaction_response {
        Some(transaction) => transaction,
        None => {
            let (code, text) = response.messages.error_code_and_text();
            return Err(error_stack::report!(PaymentGatewayError::ChargeDeclined {
                code,
                text,
            }));
        }
    };
    match transaction.response_code {
        AuthorizedotnetPaymentStatus::Approved => {
            payment.status = PaymentStatus::Charged;
            payment.connector_transaction_id = Some(transaction.transaction_id);
            Ok(())
        }
        // The processor holds some transactions for manual review; the charge
        // stays pending locally, it is not a decline.
        AuthorizedotnetPaymentStatus::HeldForReview => {
            payment.connector_transaction_id = Some(transaction.transaction_id);
            Ok(())
        }
        AuthorizedotnetPaymentStatus::Declined | AuthorizedotnetPaymentStatus::Error => {
            let (code, text) = transaction
                .errors
                .as_ref()
                .and_then(|errors| errors.first())
                .map(|error| (error.error_code.clone(), error.error_text.clone()))
                .unwrap_or_else(|| response.messages.error_code_and_text());
            Err(error_stack::report!(PaymentGatewayError::ChargeDeclined {
                code,
                text,
            }))
        }
    }
}

/// Envelope of the recurring-billing subscription call.
#[derive(Debug, Serialize)]
pub struct ArbCreateSubscriptionRequest {
    #[serde(rename = "ARBCreateSubscriptionRequest")]
    request: ArbCreateSubscriptionBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArbCreateSubscriptionBody {
    merchant_authentication: AuthorizedotnetAuthType,
    subscription: ArbSubscription,
}

impl ArbCreateSubscriptionRequest {
    /// Wrap a built subscription with the merchant credentials.
    pub fn new(
        merchant_authentication: AuthorizedotnetAuthType,
        subscription: ArbSubscription,
    ) -> Self {
        Self {
            request: ArbCreateSubscriptionBody {
                merchant_authentication,
                subscription,
            },
        }
    }
}

/// The recurring-billing subscription as the remote API takes it. Transient:
/// never persisted locally, built solely for the one outbound request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbSubscription {
    /// Name shown on the processor's side, from the offer label.
    pub name: String,
    /// When and how often to charge.
    pub payment_schedule: ArbPaymentSchedule,
    /// Display-formatted amount string.
    pub amount: StringMajorUnit,
    /// The payer and instrument, by processor-side profile tokens.
    pub profile: ArbProfileReference,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbPaymentSchedule {
    pub interval: ArbInterval,
    /// First recurring charge date, `YYYY-MM-DD`.
    pub start_date: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ArbInterval {
    pub length: u32,
    pub unit: ArbIntervalUnit,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArbIntervalUnit {
    Days,
    Months,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbProfileReference {
    pub customer_profile_id: Secret<String>,
    pub customer_payment_profile_id: Secret<String>,
}

/// Assemble the subscription request from the offer and payment method.
///
/// Pure with respect to the network: the resolved customer profile id and the
/// current date come in as arguments.
///
/// The schedule starts one month out: the processor defers same-day
/// activations to a fixed off-peak hour, and the first cycle is covered by
/// the separately-executed initial payment.
pub fn build_subscription_request(
    offer: &MembershipOffer,
    payment_method: &PaymentMethod,
    customer_profile_id: Secret<String>,
    today: Date,
) -> CustomResult<ArbSubscription, ConnectorError> {
    let amount = StringMajorUnitForDisplay
        .convert(offer.price.amount, offer.price.currency)
        .change_context(ConnectorError::RequestEncodingFailed)?;
    let start_date = date_time::add_calendar_months(today, 1)
        .change_context(ConnectorError::DateFormattingFailed)?;
    Ok(ArbSubscription {
        name: offer.label.clone(),
        payment_schedule: ArbPaymentSchedule {
            interval: ArbInterval {
                length: consts::ARB_INTERVAL_LENGTH,
                unit: ArbIntervalUnit::Months,
            },
            start_date: date_time::format_ymd(start_date)
                .change_context(ConnectorError::DateFormattingFailed)?,
        },
        amount,
        profile: ArbProfileReference {
            customer_profile_id,
            customer_payment_profile_id: payment_method.remote_id.clone(),
        },
    })
}

/// Response of the recurring-billing subscription call.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbCreateSubscriptionResponse {
    pub subscription_id: Option<String>,
    pub messages: ResponseMessages,
}

#[cfg(test)]
mod tests {
    use common_utils::types::{MinorUnit, Money};
    use masking::PeekInterface;
    use time::macros::date;

    use super::*;
    use crate::types::{CustomerId, GatewayId, PaymentMethodId};

    fn offer() -> MembershipOffer {
        MembershipOffer {
            label: "Annual membership".to_string(),
            price: Money::new(MinorUnit::new(1999), Currency::USD),
        }
    }

    fn payment_method() -> PaymentMethod {
        PaymentMethod {
            payment_method_id: PaymentMethodId::new("pm_local_1"),
            customer_id: CustomerId::new("cus_1"),
            remote_id: Secret::new("pm_123".to_string()),
            gateway_id: GatewayId::new("authnet_test"),
        }
    }

    #[test]
    fn subscription_request_carries_offer_and_profiles() {
        let subscription = build_subscription_request(
            &offer(),
            &payment_method(),
            Secret::new("cust_456".to_string()),
            date!(2026 - 08 - 07),
        )
        .unwrap();

        assert_eq!(subscription.name, "Annual membership");
        assert_eq!(subscription.amount.get_amount_as_string(), "$19.99");
        assert_eq!(subscription.payment_schedule.interval.length, 1);
        assert_eq!(
            subscription.payment_schedule.interval.unit,
            ArbIntervalUnit::Months
        );
        assert_eq!(subscription.payment_schedule.start_date, "2026-09-07");
        assert_eq!(subscription.profile.customer_profile_id.peek(), "cust_456");
        assert_eq!(
            subscription.profile.customer_payment_profile_id.peek(),
            "pm_123"
        );
    }

    #[test]
    fn start_date_clamps_on_short_months() {
        let subscription = build_subscription_request(
            &offer(),
            &payment_method(),
            Secret::new("cust_456".to_string()),
            date!(2026 - 01 - 31),
        )
        .unwrap();
        assert_eq!(subscription.payment_schedule.start_date, "2026-02-28");
    }

    #[test]
    fn subscription_json_keeps_documented_field_order() {
        let subscription = build_subscription_request(
            &offer(),
            &payment_method(),
            Secret::new("cust_456".to_string()),
            date!(2026 - 08 - 07),
        )
        .unwrap();
        let request = ArbCreateSubscriptionRequest::new(
            AuthorizedotnetAuthType::new(
                Secret::new("login".to_string()),
                Secret::new("key".to_string()),
            ),
            subscription,
        );

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            "{\"ARBCreateSubscriptionRequest\":{\
             \"merchantAuthentication\":{\"name\":\"login\",\"transactionKey\":\"key\"},\
             \"subscription\":{\"name\":\"Annual membership\",\
             \"paymentSchedule\":{\"interval\":{\"length\":1,\"unit\":\"months\"},\
             \"startDate\":\"2026-09-07\"},\
             \"amount\":\"$19.99\",\
             \"profile\":{\"customerProfileId\":\"cust_456\",\
             \"customerPaymentProfileId\":\"pm_123\"}}}}"
        );
    }

    #[test]
    fn charge_request_targets_the_stored_profiles() {
        let payment = Payment::subscription_payment(&offer(), &payment_method());
        let configuration = GatewayConfiguration {
            api_login_id: Secret::new("login".to_string()),
            transaction_key: Secret::new("key".to_string()),
            client_key: Secret::new("client".to_string()),
        };
        let request = CreateTransactionRequest::try_from_payment(
            &configuration,
            &payment,
            Secret::new("cust_456".to_string()),
        )
        .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        let body = &json["createTransactionRequest"];
        assert_eq!(body["merchantAuthentication"]["name"], "login");
        let transaction = &body["transactionRequest"];
        assert_eq!(transaction["transactionType"], "authCaptureTransaction");
        assert_eq!(transaction["amount"], "19.99");
        assert_eq!(transaction["currencyCode"], "USD");
        assert_eq!(transaction["profile"]["customerProfileId"], "cust_456");
        assert_eq!(
            transaction["profile"]["paymentProfile"]["paymentProfileId"],
            "pm_123"
        );
        assert_eq!(transaction["order"]["description"], "subscription_payment");
    }

    #[test]
    fn declined_charge_surfaces_processor_error() {
        let mut payment = Payment::subscription_payment(&offer(), &payment_method());
        let response: AuthorizedotnetPaymentsResponse = serde_json::from_str(
            r#"{
                "transactionResponse": {
                    "responseCode": "2",
                    "transId": "0",
                    "errors": [{"errorCode": "2", "errorText": "This transaction has been declined."}]
                },
                "messages": {"resultCode": "Ok", "message": []}
            }"#,
        )
        .unwrap();

        let err = update_payment_from_response(&mut payment, response).unwrap_err();
        assert!(matches!(
            err.current_context(),
            PaymentGatewayError::ChargeDeclined { code, .. } if code == "2"
        ));
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.connector_transaction_id.is_none());
    }

    #[test]
    fn approved_charge_marks_payment_charged() {
        let mut payment = Payment::subscription_payment(&offer(), &payment_method());
        let response: AuthorizedotnetPaymentsResponse = serde_json::from_str(
            r#"{
                "transactionResponse": {"responseCode": "1", "transId": "60157186288"},
                "messages": {"resultCode": "Ok", "message": [{"code": "I00001", "text": "Successful."}]}
            }"#,
        )
        .unwrap();

        update_payment_from_response(&mut payment, response).unwrap();
        assert_eq!(payment.status, PaymentStatus::Charged);
        assert_eq!(
            payment.connector_transaction_id.as_deref(),
            Some("60157186288")
        );
    }
}
