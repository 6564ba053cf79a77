//! Search backend access: the HTTP client, its payload types, and the
//! caching and debouncing used by search-as-you-type.

mod cache;
mod client;
mod debounce;
mod types;

pub use cache::{DEFAULT_CACHE_CAPACITY, LatestOnly, QueryCache, Ticket};
pub use client::{HttpTransport, SearchClient, Transport};
pub use debounce::use_debounced;
pub use types::{AnswerMode, ApiError, GeneratedText, SearchHit, SearchMetadata};
