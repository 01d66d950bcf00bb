//! Stateless fetchers for the third-party HTTP APIs backing the side panels.
//!
//! Every fetcher follows the same policy: one GET, shallow field extraction,
//! and on any failure (transport error, non-2xx, malformed body) a warning is
//! logged and an empty result is returned. Nothing here retries or aborts the
//! caller.

pub mod arxiv;
pub mod images;
pub mod markets;
pub mod news;
pub mod profile;

pub use news::{NewsItem, NewsProvider};
