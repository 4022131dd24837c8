//! Row codec for the flat-file backend.
//!
//! Field order is part of the file format: id, amount, currency code,
//! user id, account number.

use models::payment::resolve_currency;
use models::Payment;

use crate::errors::ServiceError;

pub const ROW_LEN: usize = 5;

pub fn encode(payment: &Payment) -> [String; ROW_LEN] {
    [
        payment.id.clone(),
        payment.amount.to_string(),
        payment.currency.code().to_string(),
        payment.user_id.clone(),
        payment.account_number.clone(),
    ]
}

/// Shape check only: exactly `ROW_LEN` fields.
pub fn validate_row<S: AsRef<str>>(row: &[S]) -> Result<(), ServiceError> {
    if row.len() != ROW_LEN {
        return Err(ServiceError::CorruptRow(format!(
            "expected {} fields, got {}: {:?}",
            ROW_LEN,
            row.len(),
            row.iter().map(AsRef::as_ref).collect::<Vec<_>>()
        )));
    }
    Ok(())
}

pub fn decode<S: AsRef<str>>(row: &[S]) -> Result<Payment, ServiceError> {
    validate_row(row)?;
    let field = |i: usize| row[i].as_ref();

    let amount = field(1)
        .parse::<i64>()
        .map_err(|e| ServiceError::CorruptRow(format!("amount {:?} in row {:?}: {}", field(1), field(0), e)))?;
    let currency = resolve_currency(field(2))
        .map_err(|e| ServiceError::CorruptRow(format!("{} in row {:?}", e, field(0))))?;

    Ok(Payment {
        id: field(0).to_string(),
        amount,
        currency,
        user_id: field(3).to_string(),
        account_number: field(4).to_string(),
    })
}
