//! Application services for the activity module.

mod stream;

pub use stream::{ActivityService, ActivityServiceError};
