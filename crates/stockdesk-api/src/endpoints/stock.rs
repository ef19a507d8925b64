// Certificate and medal stock: batches, per-branch totals, and migrations.
//
// Stock arithmetic is the backend's job; a migration that would overdraw
// the source branch comes back as `success: false` or a 4xx.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{
    CertificateBatch, MigrationRequest, StockBatchRequest, StockMigration, StockSummary,
};

impl ApiClient {
    pub async fn list_batches(&self) -> Result<Vec<CertificateBatch>, Error> {
        self.get("certificates").await
    }

    /// Register a new delivery of certificates and medals for a branch.
    pub async fn add_batch(&self, request: &StockBatchRequest) -> Result<CertificateBatch, Error> {
        self.post("certificates", request).await
    }

    /// On-hand totals per branch.
    pub async fn stock_summary(&self) -> Result<Vec<StockSummary>, Error> {
        self.get("certificates/stock").await
    }

    pub async fn migrate_stock(&self, request: &MigrationRequest) -> Result<StockMigration, Error> {
        self.post("certificates/migrate", request).await
    }

    pub async fn list_migrations(&self) -> Result<Vec<StockMigration>, Error> {
        self.get("certificates/migrations").await
    }
}
