//! Gateway connector implementations.

pub mod authorizedotnet;

pub use authorizedotnet::{AuthorizedotnetGateway, SubscriptionGateway, SubscriptionGatewayProxy};
