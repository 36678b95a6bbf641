//! Pagination module
//!
//! Per-call orchestration on top of a [`Queue`](crate::queue::Queue).
//!
//! # Overview
//!
//! [`PageDriver::spawn`] starts the queue worker, seeds it with the first
//! request and hands back a [`PageStream`] right away. A background task
//! then relays every response to the caller (payload on `data`, error on
//! `errors`) and, while the payload carries a continuation token, derives
//! the next request and resubmits it.
//!
//! Both caller-facing channels close when the task ends, whatever the
//! reason: last page, auto-pagination off, single-page call, halt on
//! error, cancellation, or the caller dropping `data`.

mod driver;
mod stream;
mod types;

pub use driver::PageDriver;
pub use stream::{PageResultStream, PageStream};
pub use types::{next_page, NextPage, StopReason};
