use std::{fmt, marker::PhantomData};

use serde::{de, Deserialize, Serialize, Serializer};

use crate::{strategy::Strategy, PeekInterface};

/// A secret value.
///
/// Access to the inner value goes through [`crate::PeekInterface::peek`] or
/// [`crate::ExposeInterface::expose`]; `Debug` applies the masking strategy
/// given as the second type parameter instead of printing the value.
///
/// Serialization writes the inner value, so secrets can be carried inside
/// outbound request bodies without unwrapping them field by field.
pub struct Secret<S, I = crate::WithType>
where
    I: Strategy<S>,
{
    pub(crate) inner_secret: S,
    pub(crate) marker: PhantomData<I>,
}

impl<S, I> Secret<S, I>
where
    I: Strategy<S>,
{
    /// Take ownership of a secret value.
    pub fn new(secret: S) -> Self {
        Self {
            inner_secret: secret,
            marker: PhantomData,
        }
    }
}

impl<S, I> PeekInterface<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn peek(&self) -> &S {
        &self.inner_secret
    }
}

impl<S, I> From<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn from(secret: S) -> Self {
        Self::new(secret)
    }
}

impl<S, I> Clone for Secret<S, I>
where
    S: Clone,
    I: Strategy<S>,
{
    fn clone(&self) -> Self {
        Self {
            inner_secret: self.inner_secret.clone(),
            marker: PhantomData,
        }
    }
}

impl<S, I> PartialEq for Secret<S, I>
where
    S: PartialEq,
    I: Strategy<S>,
{
    fn eq(&self, other: &Self) -> bool {
        self.peek().eq(other.peek())
    }
}

impl<S, I> Eq for Secret<S, I>
where
    S: Eq,
    I: Strategy<S>,
{
}

impl<S, I> fmt::Debug for Secret<S, I>
where
    I: Strategy<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S, I> Default for Secret<S, I>
where
    S: Default,
    I: Strategy<S>,
{
    fn default() -> Self {
        S::default().into()
    }
}

impl<'de, S, I> Deserialize<'de> for Secret<S, I>
where
    S: de::DeserializeOwned,
    I: Strategy<S>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        S::deserialize(deserializer).map(Self::new)
    }
}

impl<S, I> Serialize for Secret<S, I>
where
    S: Serialize,
    I: Strategy<S>,
{
    fn serialize<T>(&self, serializer: T) -> Result<T::Ok, T::Error>
    where
        T: Serializer,
    {
        self.peek().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_masked() {
        let secret: Secret<String> = Secret::new("5KP3u95bQpv4".to_string());
        assert_eq!("*** alloc::string::String ***", format!("{secret:?}"));
    }

    #[test]
    fn serialize_writes_inner_value() {
        let secret: Secret<String> = Secret::new("4vmE38dwfn".to_string());
        let json = serde_json::to_string(&secret).expect("serialization failed");
        assert_eq!(json, r#""4vmE38dwfn""#);
    }
}
