pub mod algorithm;
pub mod error_conversions;
pub mod error_responses;
pub mod events;
pub mod initializer;
pub mod queue;
pub mod stats;
pub mod submission;

pub use algorithm::SrsConfig;
pub use events::{CacheInvalidationHook, NotificationSink, ReviewListeners};
pub use queue::QueueRequest;
