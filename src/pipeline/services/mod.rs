pub mod classification_service;
pub mod result_publisher;

pub use classification_service::ClassificationService;
pub use result_publisher::{ResultPublishingService, ResultReader};
