//! Pagination decision types
//!
//! The continuation check is a pure function of the response and the
//! session policy, kept apart from the channel plumbing in the driver.

use crate::page::Page;
use crate::queue::QueueConfig;
use crate::request::{Request, Response};
use crate::types::{CallMode, ErrorPolicy};

/// Result of the continuation check
#[derive(Debug, Clone)]
pub enum NextPage {
    /// Submit this request next
    Continue(Request),
    /// No more pages
    Done(StopReason),
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// Why a session stopped requesting pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Payload carried no continuation token
    NoToken,
    /// Auto-pagination is disabled
    AutoDisabled,
    /// The call site cannot paginate
    SingleCall,
    /// The page carried an error and the policy is to halt
    HaltedOnError,
}

/// Decide what follows `response`
pub fn next_page<P: Page>(
    response: &Response<P>,
    config: &QueueConfig,
    mode: CallMode,
) -> NextPage {
    if mode == CallMode::Single {
        return NextPage::Done(StopReason::SingleCall);
    }
    if !config.auto {
        return NextPage::Done(StopReason::AutoDisabled);
    }
    if response.error().is_some() && config.error_policy == ErrorPolicy::Halt {
        return NextPage::Done(StopReason::HaltedOnError);
    }

    match response.continuation_token() {
        Some(token) => NextPage::Continue(
            response
                .request()
                .next_round(&config.continuation_param, token),
        ),
        None => NextPage::Done(StopReason::NoToken),
    }
}
