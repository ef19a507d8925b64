use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{PrintRecord, PrintRequest};

impl ApiClient {
    /// Record a printed certificate. The backend deducts one certificate
    /// and one medal from the teacher's branch.
    pub async fn print_certificate(&self, request: &PrintRequest) -> Result<PrintRecord, Error> {
        self.post("printing/certificates", request).await
    }

    pub async fn print_history(&self) -> Result<Vec<PrintRecord>, Error> {
        self.get("printing/history").await
    }
}
