use std::collections::HashMap;

use async_trait::async_trait;
use models::Payment;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::ServiceError;
use crate::storage::repository::{IdGenerator, PaymentRepository};

/// Process-local payment store. Contents are lost on restart.
pub struct InMemoryPaymentRepository {
    payments: RwLock<HashMap<String, Payment>>,
    id_gen: IdGenerator,
}

impl InMemoryPaymentRepository {
    pub fn new(id_gen: IdGenerator) -> Self {
        Self { payments: RwLock::new(HashMap::new()), id_gen }
    }

    /// Start from an existing map, keyed by payment id.
    #[cfg(test)]
    pub(crate) fn with_payments(id_gen: IdGenerator, payments: HashMap<String, Payment>) -> Self {
        Self { payments: RwLock::new(payments), id_gen }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.payments.read().await.is_empty()
    }

    #[cfg(test)]
    pub(crate) async fn clear(&self) {
        self.payments.write().await.clear();
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: Payment) -> Result<Payment, ServiceError> {
        let payment = if payment.has_id() {
            payment
        } else {
            let id = (self.id_gen)();
            debug!(%id, "generated payment id");
            payment.with_id(id)
        };

        let mut payments = self.payments.write().await;
        if payments.contains_key(&payment.id) {
            return Err(ServiceError::already_exists(&payment.id));
        }
        payments.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    async fn update(&self, payment: Payment) -> Result<Payment, ServiceError> {
        let mut payments = self.payments.write().await;
        match payments.get_mut(&payment.id) {
            Some(stored) => {
                *stored = payment.clone();
                Ok(payment)
            }
            None => Err(ServiceError::not_found(&payment.id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut payments = self.payments.write().await;
        payments.remove(id).map(|_| ()).ok_or_else(|| ServiceError::not_found(id))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Payment>, ServiceError> {
        let payments = self.payments.read().await;
        Ok(payments.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Payment>, ServiceError> {
        let payments = self.payments.read().await;
        Ok(payments.values().cloned().collect())
    }
}
