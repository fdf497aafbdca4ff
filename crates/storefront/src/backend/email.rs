//! Best-effort order confirmation email.
//!
//! The only request in the system with a timeout (5 seconds). Failures are
//! logged and swallowed by the caller - the order already exists and the
//! customer is never made to wait on, or hear about, a mail relay.

use tracing::instrument;

use super::{BackendClient, BackendError};

impl BackendClient {
    /// Ask the backend to send the order confirmation email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or times out; callers log and
    /// move on. Never retried.
    #[instrument(skip(self))]
    pub async fn send_order_confirmation(&self, to: &str) -> Result<(), BackendError> {
        let url = format!(
            "{}/send-gmail?toGmail={}",
            self.base_url(),
            urlencoding::encode(to)
        );

        let response = self.email_client().get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
