//! Payment gateway redirect.
//!
//! Payment happens off-site: the storefront redirects the customer to the
//! backend's gateway pass-through, which forwards to the hosted payment
//! page. The gateway returns the customer to `/checkout/confirmation` with
//! its own query parameters.

use rust_decimal::Decimal;
use url::Url;

use super::{BackendClient, BackendError};

/// Fixed order description forwarded to the gateway.
const ORDER_INFO: &str = "Thanh toan hoa don";

impl BackendClient {
    /// Build the gateway redirect URL for a payment.
    ///
    /// `amount` is the full payable total in VND, freshly recomputed from
    /// the live cart by the caller. `order_ref` is the client-generated
    /// reference the gateway echoes back.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured backend URL cannot be parsed.
    pub fn payment_redirect_url(
        &self,
        amount: Decimal,
        order_ref: &str,
    ) -> Result<Url, BackendError> {
        let mut url = Url::parse(self.base_url()).map_err(|e| BackendError::Api {
            status: 0,
            message: format!("invalid backend URL: {e}"),
        })?;
        url.set_path("/api/pay");
        url.query_pairs_mut()
            .append_pair("gateway", self.payment_gateway())
            .append_pair("amount", &amount.round().to_string())
            .append_pair("orderId", order_ref)
            .append_pair("orderInfo", ORDER_INFO);
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    fn client() -> BackendClient {
        BackendClient::new(&BackendConfig {
            base_url: "http://localhost:8080".to_owned(),
            payment_gateway: "vnpay".to_owned(),
        })
        .unwrap()
    }

    #[test]
    fn test_redirect_url_carries_gateway_amount_and_order() {
        let url = client()
            .payment_redirect_url(Decimal::from(235_000), "ord-123")
            .unwrap();

        assert_eq!(url.path(), "/api/pay");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("gateway".to_owned(), "vnpay".to_owned())));
        assert!(pairs.contains(&("amount".to_owned(), "235000".to_owned())));
        assert!(pairs.contains(&("orderId".to_owned(), "ord-123".to_owned())));
    }

    #[test]
    fn test_redirect_amount_is_rounded_to_whole_dong() {
        // 235000.4 VND rounds down to a whole-dong amount
        let url = client()
            .payment_redirect_url(Decimal::new(2_350_004, 1), "x")
            .unwrap();
        let amount = url
            .query_pairs()
            .find(|(k, _)| k == "amount")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(amount, "235000");
    }
}
