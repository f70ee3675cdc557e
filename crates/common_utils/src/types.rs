//! Shared money types.
//!
//! Core amounts are carried as [`MinorUnit`]; each gateway integration
//! converts to the denomination its remote API expects through the
//! [`AmountConvertor`] seam.

use serde::{Deserialize, Serialize};

use crate::{enums::Currency, errors::CustomResult};

/// An amount in the minor denomination of its currency (cents for USD).
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Deserialize, Serialize,
)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// Forms a new minor unit from amount.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Gets amount as i64 value.
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// Convert the amount to its major denomination based on currency and
    /// render it as a plain decimal string (`1999` cents -> `"19.99"`).
    pub fn to_major_unit_as_string(self, currency: Currency) -> StringMajorUnit {
        let exponent = currency.exponent();
        if exponent == 0 {
            return StringMajorUnit::new(self.0.to_string());
        }
        let scale = 10_i64.pow(exponent);
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let scale = scale.unsigned_abs();
        StringMajorUnit::new(format!(
            "{sign}{}.{:0width$}",
            magnitude / scale,
            magnitude % scale,
            width = exponent as usize
        ))
    }

    /// Render the amount the way it is displayed to a payer: the currency
    /// symbol (or code) followed by the major-denomination decimal string
    /// (`1999` cents USD -> `"$19.99"`).
    ///
    /// Symbol and exponent tables are fixed, so the output never varies with
    /// the process locale.
    pub fn to_display_amount(self, currency: Currency) -> StringMajorUnit {
        let major = self.to_major_unit_as_string(currency);
        match currency.symbol() {
            Some(symbol) => StringMajorUnit::new(format!("{symbol}{}", major.0)),
            None => StringMajorUnit::new(format!("{currency} {}", major.0)),
        }
    }
}

impl std::fmt::Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An amount rendered as a string in the major denomination, the form some
/// remote APIs take on the wire.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct StringMajorUnit(String);

impl StringMajorUnit {
    /// Forms a new major unit from an already-rendered amount.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// The rendered amount.
    pub fn get_amount_as_string(&self) -> &str {
        &self.0
    }
}

/// An amount together with its currency.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub struct Money {
    /// The amount in minor units.
    pub amount: MinorUnit,
    /// The currency of the amount.
    pub currency: Currency,
}

impl Money {
    /// Forms a new amount-with-currency pair.
    pub fn new(amount: MinorUnit, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

/// Conversion of a core [`MinorUnit`] amount into the denomination a remote
/// API expects.
pub trait AmountConvertor: Send {
    /// The denomination produced by this convertor.
    type Output;
    /// Convert a minor-unit amount into the output denomination.
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> CustomResult<Self::Output, crate::errors::ParsingError>;
}

/// Convertor producing display-formatted major-unit strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringMajorUnitForDisplay;

impl AmountConvertor for StringMajorUnitForDisplay {
    type Output = StringMajorUnit;

    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> CustomResult<Self::Output, crate::errors::ParsingError> {
        Ok(amount.to_display_amount(currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_unit_rendering_honours_exponent() {
        assert_eq!(
            MinorUnit::new(1999)
                .to_major_unit_as_string(Currency::USD)
                .get_amount_as_string(),
            "19.99"
        );
        assert_eq!(
            MinorUnit::new(500)
                .to_major_unit_as_string(Currency::JPY)
                .get_amount_as_string(),
            "500"
        );
        assert_eq!(
            MinorUnit::new(1005)
                .to_major_unit_as_string(Currency::KWD)
                .get_amount_as_string(),
            "1.005"
        );
    }

    #[test]
    fn sub_unit_amounts_are_zero_padded() {
        assert_eq!(
            MinorUnit::new(5)
                .to_major_unit_as_string(Currency::USD)
                .get_amount_as_string(),
            "0.05"
        );
    }

    #[test]
    fn display_amount_uses_symbol_or_code() {
        assert_eq!(
            MinorUnit::new(1999)
                .to_display_amount(Currency::USD)
                .get_amount_as_string(),
            "$19.99"
        );
        assert_eq!(
            MinorUnit::new(1000)
                .to_display_amount(Currency::CHF)
                .get_amount_as_string(),
            "CHF 10.00"
        );
    }
}
