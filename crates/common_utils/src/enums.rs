//! Enums shared across the workspace.

use serde::{Deserialize, Serialize};

/// The three-letter ISO 4217 currency codes the gateway integrations accept.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Currency {
    AED,
    AUD,
    BHD,
    CAD,
    CHF,
    CLP,
    CNY,
    DKK,
    EUR,
    GBP,
    HKD,
    INR,
    JPY,
    KRW,
    KWD,
    MXN,
    NOK,
    NZD,
    OMR,
    PLN,
    SEK,
    SGD,
    #[default]
    USD,
    VND,
    ZAR,
}

impl Currency {
    /// Number of minor-unit digits after the decimal point in the major
    /// denomination.
    pub fn exponent(self) -> u32 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else {
            2
        }
    }

    /// Currencies with no minor unit.
    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(self, Self::CLP | Self::JPY | Self::KRW | Self::VND)
    }

    /// Currencies with a thousandth minor unit.
    pub fn is_three_decimal_currency(self) -> bool {
        matches!(self, Self::BHD | Self::KWD | Self::OMR)
    }

    /// Display symbol, where one is in common use for the currency.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Self::AUD | Self::CAD | Self::CLP | Self::HKD | Self::MXN | Self::NZD | Self::SGD
            | Self::USD => Some("$"),
            Self::CNY | Self::JPY => Some("¥"),
            Self::EUR => Some("€"),
            Self::GBP => Some("£"),
            Self::INR => Some("₹"),
            Self::KRW => Some("₩"),
            Self::VND => Some("₫"),
            Self::ZAR => Some("R"),
            Self::AED
            | Self::BHD
            | Self::CHF
            | Self::DKK
            | Self::KWD
            | Self::NOK
            | Self::OMR
            | Self::PLN
            | Self::SEK => None,
        }
    }
}
