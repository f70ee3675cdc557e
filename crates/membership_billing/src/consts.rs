//! Crate-wide constants.

/// Endpoint serving both one-time transactions and recurring billing in the
/// Authorize.Net sandbox.
pub const AUTHORIZEDOTNET_SANDBOX_BASE_URL: &str = "https://apitest.authorize.net/xml/v1/request.api";

/// Production Authorize.Net endpoint.
pub const AUTHORIZEDOTNET_LIVE_BASE_URL: &str = "https://api.authorize.net/xml/v1/request.api";

/// Authorize.Net rejects reference ids and invoice numbers longer than this.
pub const MAX_ID_LENGTH: usize = 20;

/// Billing cycles between subscription charges.
pub const ARB_INTERVAL_LENGTH: u32 = 1;
