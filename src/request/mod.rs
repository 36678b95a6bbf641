//! Request and response value types
//!
//! A [`Request`] describes one HTTP call. The pagination driver never mutates
//! a request in place across rounds; it derives the next one with
//! [`Request::next_round`], which merges the continuation token into the
//! existing query and resets per-round state.
//!
//! A [`Response`] is the outcome of executing one request: the request itself
//! (with dispatch metadata), the decoded payload, and an optional error.

mod types;

pub use types::{Request, Response, RoundState};

#[cfg(test)]
mod tests;
