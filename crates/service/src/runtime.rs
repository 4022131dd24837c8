//! Runtime wiring helpers
//!
//! Turns the backend selector given on the command line (or in config) into a
//! ready `PaymentService` over the chosen repository.

use std::{fmt, path::PathBuf, sync::Arc};

use tracing::info;

use crate::errors::ServiceError;
use crate::payments::PaymentService;
use crate::storage::{CsvPaymentRepository, IdGenerator, InMemoryPaymentRepository, PaymentRepository};

/// Storage backend chosen at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Csv,
}

impl Backend {
    /// `"CSV"` selects the file backend; anything else (including `"MEM"`) is in-memory.
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "CSV" => Backend::Csv,
            _ => Backend::Memory,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => f.write_str("MEM"),
            Backend::Csv => f.write_str("CSV"),
        }
    }
}

pub async fn open_repository(
    backend: Backend,
    csv_path: impl Into<PathBuf>,
    id_gen: IdGenerator,
) -> Result<Arc<dyn PaymentRepository>, ServiceError> {
    let repo: Arc<dyn PaymentRepository> = match backend {
        Backend::Csv => Arc::new(CsvPaymentRepository::new(csv_path, id_gen).await?),
        Backend::Memory => Arc::new(InMemoryPaymentRepository::new(id_gen)),
    };
    info!(%backend, "payment repository opened");
    Ok(repo)
}

pub async fn build_service(
    backend: Backend,
    csv_path: impl Into<PathBuf>,
    id_gen: IdGenerator,
) -> Result<Arc<PaymentService<dyn PaymentRepository>>, ServiceError> {
    let repo = open_repository(backend, csv_path, id_gen).await?;
    Ok(Arc::new(PaymentService::new(repo)))
}
