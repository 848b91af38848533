pub mod dispatch;
pub mod host;
pub mod memory;
pub mod rds;
pub mod service;
pub mod trigger;

pub use dispatch::{dispatch, Dispatch};
pub use memory::RecordingExportService;
pub use rds::RdsExportService;
pub use service::{ExportJobResult, ExportService, ServiceError, DUPLICATE_JOB_CODE};
pub use trigger::{ExportTrigger, TriggerError, TriggerOutcome};
