mod client;
mod types;

pub use client::{BitriseClient, DEFAULT_BASE_URL};
pub use types::{BuildListPage, Paging};
