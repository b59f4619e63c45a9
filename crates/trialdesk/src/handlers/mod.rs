pub mod envelope;
pub mod error;
pub mod resource;

pub use envelope::{Envelope, JsonBody, QueryParams, RecordId};
pub use error::AppError;
pub use resource::resource_routes;
