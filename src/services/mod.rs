pub mod analysis_service;
pub mod ingest_service;
pub mod notification_service;
pub mod report_service;
pub mod scheduler_service;
