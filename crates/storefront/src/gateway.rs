//! Payment gateway return parameters.
//!
//! The hosted payment page returns the customer to the confirmation route
//! with `vnp_*` query parameters. Response code "00" is the only success;
//! the amount comes back in hundredths of a đồng and the pay date as a
//! `YYYYMMDDHHMMSS` string.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::backend::orders::TransactionData;

/// The gateway's "payment succeeded" response code.
const SUCCESS_RESPONSE_CODE: &str = "00";

/// Pay date format on the gateway return, e.g. `20240601103000`.
const PAY_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Query parameters the gateway appends on return.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayReturn {
    #[serde(rename = "vnp_ResponseCode")]
    pub response_code: Option<String>,
    #[serde(rename = "vnp_Amount")]
    pub amount: Option<String>,
    #[serde(rename = "vnp_BankCode")]
    pub bank_code: Option<String>,
    #[serde(rename = "vnp_PayDate")]
    pub pay_date: Option<String>,
    #[serde(rename = "vnp_TransactionNo")]
    pub transaction_no: Option<String>,
}

impl GatewayReturn {
    /// Whether the gateway reported a successful payment.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_code.as_deref() == Some(SUCCESS_RESPONSE_CODE)
    }

    /// Build the transaction record from a successful return.
    ///
    /// `now` is the fallback pay date when the gateway omits or mangles
    /// its own.
    #[must_use]
    pub fn into_transaction(self, now: NaiveDateTime) -> TransactionData {
        // vnp_Amount is the amount multiplied by 100
        let amount = self
            .amount
            .as_deref()
            .and_then(|raw| raw.parse::<i64>().ok())
            .map_or(Decimal::ZERO, |hundredths| {
                Decimal::from(hundredths) / Decimal::from(100)
            });

        let pay_date = self
            .pay_date
            .as_deref()
            .and_then(|raw| NaiveDateTime::parse_from_str(raw, PAY_DATE_FORMAT).ok())
            .unwrap_or(now);

        let bank_code = self.bank_code.unwrap_or_default();

        TransactionData {
            transaction_id: self.transaction_no.unwrap_or_default(),
            // The gateway does not report the card type separately
            card_type: bank_code.clone(),
            bank_code,
            amount,
            pay_date,
            error_message: String::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn successful_return() -> GatewayReturn {
        GatewayReturn {
            response_code: Some("00".to_owned()),
            amount: Some("23500000".to_owned()),
            bank_code: Some("NCB".to_owned()),
            pay_date: Some("20240601103000".to_owned()),
            transaction_no: Some("14422574".to_owned()),
        }
    }

    #[test]
    fn test_only_code_00_is_success() {
        assert!(successful_return().is_success());

        let mut failed = successful_return();
        failed.response_code = Some("24".to_owned());
        assert!(!failed.is_success());

        assert!(!GatewayReturn::default().is_success());
    }

    #[test]
    fn test_amount_is_scaled_down_from_hundredths() {
        let tx = successful_return().into_transaction(now());
        assert_eq!(tx.amount, Decimal::from(235_000));
    }

    #[test]
    fn test_pay_date_parsing() {
        let tx = successful_return().into_transaction(now());
        assert_eq!(
            tx.pay_date,
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_malformed_pay_date_falls_back_to_now() {
        let mut ret = successful_return();
        ret.pay_date = Some("June 1st".to_owned());
        assert_eq!(ret.into_transaction(now()).pay_date, now());
    }

    #[test]
    fn test_missing_parameters_default_safely() {
        let ret = GatewayReturn {
            response_code: Some("00".to_owned()),
            ..GatewayReturn::default()
        };
        let tx = ret.into_transaction(now());
        assert_eq!(tx.amount, Decimal::ZERO);
        assert_eq!(tx.transaction_id, "");
        assert_eq!(tx.bank_code, "");
        assert_eq!(tx.pay_date, now());
    }

    #[test]
    fn test_card_type_mirrors_bank_code() {
        let tx = successful_return().into_transaction(now());
        assert_eq!(tx.card_type, "NCB");
    }
}
