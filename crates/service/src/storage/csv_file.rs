use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;
use models::Payment;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, error, info};

use crate::errors::ServiceError;
use crate::storage::repository::{IdGenerator, PaymentRepository};
use crate::storage::row;

/// CSV file-backed payment store.
///
/// The file is the only source of truth: every call re-reads it, `save`
/// appends one row and `update`/`delete` rewrite the whole file. The rewrite
/// truncates in place, so a crash mid-write can leave a partial or empty file.
/// Operations on one instance are serialized; several instances or processes
/// sharing a file are not supported.
pub struct CsvPaymentRepository {
    file_path: PathBuf,
    id_gen: IdGenerator,
    lock: Mutex<()>,
}

impl CsvPaymentRepository {
    /// Open the store at `path`, creating an empty file (and parent dirs) if missing.
    pub async fn new<P: Into<PathBuf>>(path: P, id_gen: IdGenerator) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
            }
        }
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await
            .map_err(|e| {
                error!(path = %file_path.display(), error = %e, "cannot create payments file");
                ServiceError::storage(e)
            })?;
        info!(path = %file_path.display(), "csv payment repository ready");
        Ok(Self { file_path, id_gen, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn read_rows(&self) -> Result<Vec<Vec<String>>, ServiceError> {
        let bytes = fs::read(&self.file_path).await.map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "payments file read failed");
            ServiceError::storage(e)
        })?;
        parse_rows(&bytes)
    }

    /// Decode the whole file into an id-keyed map that keeps file order.
    async fn load(&self) -> Result<IndexMap<String, Payment>, ServiceError> {
        let mut payments = IndexMap::new();
        for fields in self.read_rows().await? {
            let payment = row::decode(&fields)?;
            if payments.contains_key(&payment.id) {
                return Err(ServiceError::CorruptRow(format!("duplicate id {:?}", payment.id)));
            }
            payments.insert(payment.id.clone(), payment);
        }
        Ok(payments)
    }

    async fn rewrite(&self, payments: &IndexMap<String, Payment>) -> Result<(), ServiceError> {
        let data = write_rows(payments.values())?;
        fs::write(&self.file_path, data).await.map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "payments file rewrite failed");
            ServiceError::storage(e)
        })?;
        debug!(rows = payments.len(), "payments file rewritten");
        Ok(())
    }

    async fn append(&self, payment: &Payment) -> Result<(), ServiceError> {
        let data = write_rows(std::iter::once(payment))?;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&self.file_path)
            .await
            .map_err(ServiceError::storage)?;
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(())
    }
}

fn parse_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>, ServiceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ServiceError::CorruptRow(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn write_rows<'a>(payments: impl Iterator<Item = &'a Payment>) -> Result<Vec<u8>, ServiceError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for payment in payments {
        writer.write_record(row::encode(payment)).map_err(ServiceError::storage)?;
    }
    writer.into_inner().map_err(ServiceError::storage)
}

#[async_trait]
impl PaymentRepository for CsvPaymentRepository {
    async fn save(&self, payment: Payment) -> Result<Payment, ServiceError> {
        let _guard = self.lock.lock().await;
        let payment = if payment.has_id() {
            payment
        } else {
            let id = (self.id_gen)();
            debug!(%id, "generated payment id");
            payment.with_id(id)
        };

        // Only the id column is inspected here; other rows are not decoded.
        let exists = self
            .read_rows()
            .await?
            .iter()
            .any(|fields| fields.first().map(String::as_str) == Some(payment.id.as_str()));
        if exists {
            return Err(ServiceError::already_exists(&payment.id));
        }

        self.append(&payment).await?;
        info!(id = %payment.id, "payment appended");
        Ok(payment)
    }

    async fn update(&self, payment: Payment) -> Result<Payment, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut payments = self.load().await?;
        match payments.get_mut(&payment.id) {
            Some(stored) => *stored = payment.clone(),
            None => return Err(ServiceError::not_found(&payment.id)),
        }
        self.rewrite(&payments).await?;
        info!(id = %payment.id, "payment updated");
        Ok(payment)
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let _guard = self.lock.lock().await;
        let mut payments = self.load().await?;
        if payments.shift_remove(id).is_none() {
            return Err(ServiceError::not_found(id));
        }
        self.rewrite(&payments).await?;
        info!(%id, "payment deleted");
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Payment>, ServiceError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.shift_remove(id))
    }

    async fn get_all(&self) -> Result<Vec<Payment>, ServiceError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_values().collect())
    }
}
