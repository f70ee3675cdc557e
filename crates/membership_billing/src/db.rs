//! Storage seam.
//!
//! Entity persistence belongs to the surrounding framework; this trait covers
//! exactly what the billing flow needs from it. [`MockDb`] backs the tests.

use std::collections::HashMap;

use masking::Secret;
use tokio::sync::Mutex;

use crate::{
    core::errors::{CustomResult, StorageError},
    types::{CustomerId, GatewayId, Payment},
};

/// The persistence operations used by the membership billing flow.
#[async_trait::async_trait]
pub trait StorageInterface: Send + Sync {
    /// Persist a finalized payment record.
    async fn insert_payment(&self, payment: Payment) -> CustomResult<Payment, StorageError>;

    /// The stored processor-side customer profile id for an owner at a
    /// gateway, if one exists.
    async fn find_remote_customer_id(
        &self,
        customer_id: &CustomerId,
        gateway_id: &GatewayId,
    ) -> CustomResult<Option<Secret<String>>, StorageError>;
}

/// In-memory storage for tests.
#[derive(Debug, Default)]
pub struct MockDb {
    payments: Mutex<Vec<Payment>>,
    remote_customer_ids: Mutex<HashMap<(CustomerId, GatewayId), Secret<String>>>,
}

impl MockDb {
    /// An empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the remote customer profile id for an owner at a gateway.
    pub async fn set_remote_customer_id(
        &self,
        customer_id: CustomerId,
        gateway_id: GatewayId,
        remote_id: Secret<String>,
    ) {
        self.remote_customer_ids
            .lock()
            .await
            .insert((customer_id, gateway_id), remote_id);
    }

    /// The payments persisted so far.
    pub async fn payments(&self) -> Vec<Payment> {
        self.payments.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl StorageInterface for MockDb {
    async fn insert_payment(&self, payment: Payment) -> CustomResult<Payment, StorageError> {
        self.payments.lock().await.push(payment.clone());
        Ok(payment)
    }

    async fn find_remote_customer_id(
        &self,
        customer_id: &CustomerId,
        gateway_id: &GatewayId,
    ) -> CustomResult<Option<Secret<String>>, StorageError> {
        Ok(self
            .remote_customer_ids
            .lock()
            .await
            .get(&(customer_id.clone(), gateway_id.clone()))
            .cloned())
    }
}
