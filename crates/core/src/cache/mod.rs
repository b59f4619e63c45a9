mod error;
mod keys;
mod patterns;
mod policy;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{collection_pattern, entity_key, list_key};
pub use patterns::pattern_matches;
pub use policy::CachePolicy;
pub use serialization::{deserialize, serialize, SerializationError};
pub use traits::Cache;
