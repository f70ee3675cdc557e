//! Wrapper types and traits for secret management, ensuring credentials and
//! processor-side tokens are not accidentally logged or otherwise exposed.

#![warn(missing_docs)]

mod abs;
mod secret;
mod strategy;

pub use abs::{ExposeInterface, PeekInterface};
pub use secret::Secret;
pub use strategy::{Strategy, WithType, WithoutType};

/// This module should be included with asterisk.
///
/// `use masking::prelude::*;`
pub mod prelude {
    pub use super::{ExposeInterface, PeekInterface};
}
