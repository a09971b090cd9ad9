//! REST API endpoint implementations.
//!
//! Each function issues exactly one request through a [`crate::Transport`]
//! (login is the exception: it talks to reqwest directly because it runs
//! inside the transport) and decodes the response into a model.

mod auth;
mod indexes;
mod knowledge;
pub mod request;
mod search;
mod users;
pub mod url_encoding;

pub use auth::login;
pub use indexes::list_index_names;
pub use knowledge::list_knowledge_objects;
pub use search::{JOBS_PATH, create_job, fetch_results, results_path};
pub use users::{get_user_entry, list_usernames};
