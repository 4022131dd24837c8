use iso_currency::Currency;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Stored payment.
///
/// `id` is empty until a repository assigns one; `amount` is in the
/// smallest unit of `currency`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub amount: i64,
    #[serde(with = "currency_code")]
    pub currency: Currency,
    pub user_id: String,
    pub account_number: String,
}

impl Payment {
    /// Build a payment that has not been assigned an id yet.
    pub fn unsaved(amount: i64, currency: Currency, user_id: impl Into<String>, account_number: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            amount,
            currency,
            user_id: user_id.into(),
            account_number: account_number.into(),
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Same payment carrying the given id.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self { id: id.into(), ..self }
    }
}

/// Create/update request body. Every field is optional so the same shape
/// serves partial updates; absent fields serialize as explicit `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
}

/// Resolve an ISO 4217 alphabetic code (case-sensitive).
pub fn resolve_currency(code: &str) -> Result<Currency, ModelError> {
    Currency::from_code(code).ok_or_else(|| ModelError::InvalidCurrency(code.to_string()))
}

/// Serde adapter writing a currency as its alphabetic code.
pub mod currency_code {
    use iso_currency::Currency;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(currency: &Currency, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(currency.code())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Currency, D::Error> {
        let code = String::deserialize(deserializer)?;
        super::resolve_currency(&code).map_err(de::Error::custom)
    }
}
