pub mod child_service;
pub mod models;
pub mod record_service;
pub mod report;
pub mod report_service;

pub use child_service::ChildService;
pub use record_service::RecordService;
pub use report_service::ReportService;
