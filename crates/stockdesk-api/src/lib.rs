// stockdesk-api: Async Rust client for the certificate and medal stock-management REST API

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use reqwest;
pub use envelope::{Envelope, Page, Pagination, PaginationMeta, PaginationSource};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    Branch, BranchOption, BranchRequest, CertificateBatch, CreatedTeacher, CurrentUser, EntityId,
    LearningModule, LogEntry, LogQuery, LoginResponse, MigrationRequest, ModuleRequest,
    PrintRecord, PrintRequest, Role, StockBatchRequest, StockMigration, StockSummary, Teacher,
    TeacherCredentials, TeacherRequest,
};
