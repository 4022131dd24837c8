use models::payment::resolve_currency;
use models::{Payment, PaymentInput};

use crate::errors::ServiceError;

/// Overlay the present fields of `input` on `existing`; the id is kept.
/// A present currency is re-resolved from its code.
pub fn merge_payment(existing: &Payment, input: PaymentInput) -> Result<Payment, ServiceError> {
    let currency = match input.currency.as_deref() {
        Some(code) => resolve_currency(code)?,
        None => existing.currency,
    };
    Ok(Payment {
        id: existing.id.clone(),
        amount: input.amount.unwrap_or(existing.amount),
        currency,
        user_id: input.user_id.unwrap_or_else(|| existing.user_id.clone()),
        account_number: input.account_number.unwrap_or_else(|| existing.account_number.clone()),
    })
}

/// Turn a fully populated input into an unsaved payment.
pub fn payment_from_input(input: PaymentInput) -> Result<Payment, ServiceError> {
    let code = input.currency.ok_or_else(|| missing("currency"))?;
    let currency = resolve_currency(&code)?;
    let amount = input.amount.ok_or_else(|| missing("amount"))?;
    let user_id = input.user_id.ok_or_else(|| missing("userId"))?;
    let account_number = input.account_number.ok_or_else(|| missing("accountNumber"))?;
    Ok(Payment::unsaved(amount, currency, user_id, account_number))
}

fn missing(field: &str) -> ServiceError {
    ServiceError::InvalidInput(format!("{} is required", field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use iso_currency::Currency;

    fn stored() -> Payment {
        Payment::unsaved(10, Currency::USD, "1", "1").with_id("p1")
    }

    #[test]
    fn present_fields_win_and_absent_are_kept() {
        let input = PaymentInput {
            amount: Some(12),
            currency: Some("USD".into()),
            user_id: None,
            account_number: Some("123".into()),
        };
        let merged = merge_payment(&stored(), input).unwrap();
        assert_eq!(merged.id, "p1");
        assert_eq!(merged.amount, 12);
        assert_eq!(merged.currency, Currency::USD);
        assert_eq!(merged.user_id, "1");
        assert_eq!(merged.account_number, "123");
    }

    #[test]
    fn empty_input_is_identity() {
        assert_eq!(merge_payment(&stored(), PaymentInput::default()).unwrap(), stored());
    }

    #[test]
    fn currency_is_re_resolved() {
        let input = PaymentInput { currency: Some("EUR".into()), ..Default::default() };
        assert_eq!(merge_payment(&stored(), input).unwrap().currency, Currency::EUR);

        let bad = PaymentInput { currency: Some("EURO".into()), ..Default::default() };
        assert!(matches!(merge_payment(&stored(), bad), Err(ServiceError::InvalidCurrency(_))));
    }

    #[test]
    fn full_input_builds_unsaved_payment() {
        let input = PaymentInput {
            amount: Some(10),
            currency: Some("USD".into()),
            user_id: Some("1".into()),
            account_number: Some("123".into()),
        };
        let p = payment_from_input(input).unwrap();
        assert!(!p.has_id());
        assert_eq!(p, Payment::unsaved(10, Currency::USD, "1", "123"));
    }

    #[test]
    fn incomplete_input_is_invalid() {
        let input = PaymentInput { amount: Some(10), currency: Some("USD".into()), ..Default::default() };
        assert!(matches!(payment_from_input(input), Err(ServiceError::InvalidInput(_))));
    }
}
