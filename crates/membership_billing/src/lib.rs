//! Membership subscription billing through the Authorize.Net payment gateway.
//!
//! This crate connects a membership domain model to Authorize.Net:
//! - resolve the configured payment gateway for the membership provider
//! - charge the initial payment for a membership offer
//! - create the recurring-billing subscription at the processor

pub mod configs;
pub mod connectors;
pub mod consts;
pub mod core;
pub mod db;
pub mod gateway;
pub mod logger;
pub mod services;
pub mod types;

pub use crate::core::{
    errors::{ArbError, MembershipError, PaymentGatewayError},
    membership::{ActivationOutcome, AuthnetMembershipProvider},
};
