use std::sync::Arc;

use async_trait::async_trait;
use models::Payment;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Source of fresh payment ids, injected at repository construction.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Random UUID v4 ids. Collisions are not retried.
pub fn uuid_generator() -> IdGenerator {
    Arc::new(|| Uuid::new_v4().to_string())
}

/// Repository abstraction for payment persistence.
/// Implementations must honour the same contract regardless of medium.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a payment, assigning an id when it has none.
    /// Fails with `AlreadyExists` (and leaves storage untouched) on id collision.
    async fn save(&self, payment: Payment) -> Result<Payment, ServiceError>;

    /// Replace the stored payment with the same id. `NotFound` if absent.
    async fn update(&self, payment: Payment) -> Result<Payment, ServiceError>;

    async fn delete(&self, id: &str) -> Result<(), ServiceError>;

    /// Absence is `Ok(None)`, not an error.
    async fn get_by_id(&self, id: &str) -> Result<Option<Payment>, ServiceError>;

    /// All stored payments; order is backend specific.
    async fn get_all(&self) -> Result<Vec<Payment>, ServiceError>;
}

/// Simple deterministic generators for tests and doc examples
pub mod mock {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use super::IdGenerator;

    /// Yields `{prefix}-1`, `{prefix}-2`, ...
    pub fn sequential(prefix: &str) -> IdGenerator {
        let prefix = prefix.to_string();
        let next = AtomicU64::new(1);
        Arc::new(move || format!("{}-{}", prefix, next.fetch_add(1, Ordering::Relaxed)))
    }

    /// Always yields the same id; handy for provoking collisions.
    pub fn constant(id: &str) -> IdGenerator {
        let id = id.to_string();
        Arc::new(move || id.clone())
    }
}
