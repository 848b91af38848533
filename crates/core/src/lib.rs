pub mod arn;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod request;

pub use arn::ResourceReference;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AwsConfig, Config, ExportConfig};
pub use error::{ConfigError, EventError};
pub use event::{EventCategory, SnapshotEvent};
pub use filter::EventFilter;
pub use request::{date_partition, Destination, ExportJobRequest, JobIdentifier};
