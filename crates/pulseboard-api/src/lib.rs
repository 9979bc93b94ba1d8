// pulseboard-api: Async Rust client for the pulseboard monitoring backend

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::{Error, ErrorKind};
pub use transport::TransportConfig;
pub use types::{
    Activity, HealthResponse, MetricRecord, MetricsSummary, NotificationRecord, Page, PageQuery,
    Pagination,
};
