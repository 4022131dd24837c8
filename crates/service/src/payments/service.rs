use std::sync::Arc;

use models::{Payment, PaymentInput};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::payments::merge::{merge_payment, payment_from_input};
use crate::storage::repository::PaymentRepository;

/// Payment business service independent of web framework and storage medium.
///
/// `R` may be unsized so the backend can be chosen at runtime as
/// `PaymentService<dyn PaymentRepository>`.
pub struct PaymentService<R: PaymentRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: PaymentRepository + ?Sized> PaymentService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Fetch one payment; absence becomes `NotFound`.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Payment, ServiceError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))
    }

    pub async fn get_all(&self) -> Result<Vec<Payment>, ServiceError> {
        self.repo.get_all().await
    }

    /// Create a payment from a fully populated input; the repository assigns the id.
    ///
    /// # Examples
    /// ```
    /// use service::payments::PaymentService;
    /// use service::storage::{InMemoryPaymentRepository, repository::mock};
    /// use models::PaymentInput;
    /// use std::sync::Arc;
    /// let svc = PaymentService::new(Arc::new(InMemoryPaymentRepository::new(mock::sequential("pay"))));
    /// let input = PaymentInput { amount: Some(10), currency: Some("USD".into()), user_id: Some("1".into()), account_number: Some("123".into()) };
    /// let created = tokio_test::block_on(svc.save(input)).unwrap();
    /// assert_eq!(created.id, "pay-1");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn save(&self, input: PaymentInput) -> Result<Payment, ServiceError> {
        let payment = payment_from_input(input)?;
        let saved = self.repo.save(payment).await?;
        info!(id = %saved.id, amount = saved.amount, currency = %saved.currency.code(), "payment_created");
        Ok(saved)
    }

    /// Merge the present input fields into the stored payment and persist it.
    ///
    /// # Examples
    /// ```
    /// use service::payments::PaymentService;
    /// use service::storage::{InMemoryPaymentRepository, repository::mock};
    /// use models::PaymentInput;
    /// use std::sync::Arc;
    /// let svc = PaymentService::new(Arc::new(InMemoryPaymentRepository::new(mock::sequential("pay"))));
    /// let created = tokio_test::block_on(svc.save(PaymentInput { amount: Some(10), currency: Some("USD".into()), user_id: Some("1".into()), account_number: Some("1".into()) })).unwrap();
    /// let patch = PaymentInput { amount: Some(12), ..Default::default() };
    /// let updated = tokio_test::block_on(svc.update(patch, &created.id)).unwrap();
    /// assert_eq!(updated.amount, 12);
    /// assert_eq!(updated.user_id, "1");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn update(&self, input: PaymentInput, id: &str) -> Result<Payment, ServiceError> {
        if id.is_empty() {
            return Err(ServiceError::InvalidInput("update requires a payment id".into()));
        }
        let existing = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no payment for id {}", id)))?;
        let merged = merge_payment(&existing, input)?;
        debug!(?existing, ?merged, "merged payment update");
        let updated = self.repo.update(merged).await?;
        info!(id = %updated.id, "payment_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.repo.delete(id).await?;
        info!(%id, "payment_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::uuid_generator;
    use crate::storage::{CsvPaymentRepository, InMemoryPaymentRepository};
    use async_trait::async_trait;
    use iso_currency::Currency;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Counts every repository call before delegating.
    struct CountingRepository {
        inner: InMemoryPaymentRepository,
        calls: AtomicUsize,
    }

    impl CountingRepository {
        fn new() -> Self {
            Self { inner: InMemoryPaymentRepository::new(uuid_generator()), calls: AtomicUsize::new(0) }
        }

        fn hit(&self) { self.calls.fetch_add(1, Ordering::SeqCst); }
    }

    #[async_trait]
    impl PaymentRepository for CountingRepository {
        async fn save(&self, payment: Payment) -> Result<Payment, ServiceError> { self.hit(); self.inner.save(payment).await }
        async fn update(&self, payment: Payment) -> Result<Payment, ServiceError> { self.hit(); self.inner.update(payment).await }
        async fn delete(&self, id: &str) -> Result<(), ServiceError> { self.hit(); self.inner.delete(id).await }
        async fn get_by_id(&self, id: &str) -> Result<Option<Payment>, ServiceError> { self.hit(); self.inner.get_by_id(id).await }
        async fn get_all(&self) -> Result<Vec<Payment>, ServiceError> { self.hit(); self.inner.get_all().await }
    }

    fn setup() -> (Arc<InMemoryPaymentRepository>, PaymentService<InMemoryPaymentRepository>) {
        let repo = Arc::new(InMemoryPaymentRepository::new(uuid_generator()));
        (Arc::clone(&repo), PaymentService::new(repo))
    }

    fn stored(amount: i64) -> Payment {
        Payment::unsaved(amount, Currency::USD, "1", "1").with_id(Uuid::new_v4().to_string())
    }

    fn full_input(amount: i64, currency: &str, user: &str, account: &str) -> PaymentInput {
        PaymentInput {
            amount: Some(amount),
            currency: Some(currency.into()),
            user_id: Some(user.into()),
            account_number: Some(account.into()),
        }
    }

    #[tokio::test]
    async fn get_by_id_returns_stored() -> Result<(), anyhow::Error> {
        let (repo, svc) = setup();
        let p = repo.save(stored(10)).await?;
        assert_eq!(svc.get_by_id(&p.id).await?, p);
        Ok(())
    }

    #[tokio::test]
    async fn get_by_id_absent_is_not_found() -> Result<(), anyhow::Error> {
        let (repo, svc) = setup();
        repo.save(stored(10)).await?;
        let err = svc.get_by_id(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn get_all_lists_both() -> Result<(), anyhow::Error> {
        let (repo, svc) = setup();
        let a = repo.save(stored(10)).await?;
        let b = repo.save(Payment { amount: 12, user_id: "2".into(), account_number: "3".into(), ..stored(0) }).await?;
        let all = svc.get_all().await?;
        assert_eq!(all.len(), 2);
        assert!(all.contains(&a) && all.contains(&b));
        Ok(())
    }

    #[tokio::test]
    async fn save_then_get_round_trips() -> Result<(), anyhow::Error> {
        let (_repo, svc) = setup();
        let created = svc.save(full_input(10, "USD", "1", "123")).await?;
        assert!(created.has_id());
        assert_eq!(svc.get_by_id(&created.id).await?, created);
        assert_eq!(created.currency, Currency::USD);
        Ok(())
    }

    #[tokio::test]
    async fn save_rejects_unknown_currency() {
        let (repo, svc) = setup();
        let err = svc.save(full_input(10, "XYZ", "1", "1")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCurrency(code) if code == "XYZ"));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn save_rejects_missing_amount() {
        let (repo, svc) = setup();
        let input = PaymentInput { amount: None, ..full_input(0, "USD", "1", "1") };
        assert!(matches!(svc.save(input).await, Err(ServiceError::InvalidInput(_))));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn update_merges_partial_input() -> Result<(), anyhow::Error> {
        let (repo, svc) = setup();
        let old = repo.save(stored(10)).await?;
        let input = PaymentInput {
            amount: Some(12),
            currency: Some("USD".into()),
            user_id: None,
            account_number: Some("123".into()),
        };

        svc.update(input, &old.id).await?;

        let updated = repo.get_by_id(&old.id).await?.expect("still stored");
        assert_eq!(updated.id, old.id);
        assert_eq!(updated.amount, 12);
        assert_eq!(updated.account_number, "123");
        assert_eq!(updated.user_id, "1");
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() -> Result<(), anyhow::Error> {
        let (repo, svc) = setup();
        repo.save(stored(10)).await?;
        let err = svc.update(full_input(12, "USD", "1", "123"), &Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn update_without_id_fails_before_repository_access() {
        let repo = Arc::new(CountingRepository::new());
        let svc = PaymentService::new(Arc::clone(&repo));
        let err = svc.update(full_input(12, "USD", "1", "123"), "").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_with_bad_currency_keeps_stored() -> Result<(), anyhow::Error> {
        let (repo, svc) = setup();
        let old = repo.save(stored(10)).await?;
        let input = PaymentInput { currency: Some("???".into()), ..Default::default() };
        assert!(matches!(svc.update(input, &old.id).await, Err(ServiceError::InvalidCurrency(_))));
        assert_eq!(repo.get_by_id(&old.id).await?, Some(old));
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_and_unknown_is_not_found() -> Result<(), anyhow::Error> {
        let (repo, svc) = setup();
        let old = repo.save(stored(10)).await?;
        svc.delete(&old.id).await?;
        assert_eq!(repo.get_by_id(&old.id).await?, None);
        assert!(matches!(svc.delete(&old.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn works_over_dyn_csv_backend() -> Result<(), anyhow::Error> {
        let path = std::env::temp_dir().join(format!("svc_payments_{}.csv", Uuid::new_v4()));
        let repo: Arc<dyn PaymentRepository> = Arc::new(CsvPaymentRepository::new(&path, uuid_generator()).await?);
        let svc = PaymentService::new(repo);

        let created = svc.save(full_input(10, "USD", "1", "1")).await?;
        let patched = svc
            .update(PaymentInput { user_id: Some("9".into()), ..Default::default() }, &created.id)
            .await?;
        assert_eq!(patched, Payment { user_id: "9".into(), ..created.clone() });
        assert_eq!(svc.get_all().await?, vec![patched]);

        svc.delete(&created.id).await?;
        assert!(matches!(svc.get_by_id(&created.id).await, Err(ServiceError::NotFound(_))));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
