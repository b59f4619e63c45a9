//! Repository abstraction shared by every storage backend.

mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::Repository;
pub use types::{
    paginate, select_matching, sort_by_creation, ListFilter, ListQuery, Page, PageRequest,
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
