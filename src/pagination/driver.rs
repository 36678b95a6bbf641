//! Pagination driver

use super::stream::PageStream;
use super::types::{next_page, NextPage};
use crate::error::Error;
use crate::page::Page;
use crate::queue::{Queue, QueueConfig, QueueHandle};
use crate::request::Request;
use crate::types::CallMode;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Ties one queue to one seed request and one pair of caller channels
#[derive(Debug)]
pub struct PageDriver<P> {
    queue: Queue<P>,
    mode: CallMode,
}

impl<P: Page> PageDriver<P> {
    /// Create a paginating driver over `queue`
    pub fn new(queue: Queue<P>) -> Self {
        Self {
            queue,
            mode: CallMode::Paginated,
        }
    }

    /// Set the call mode (single-page lookups never follow tokens)
    #[must_use]
    pub fn mode(mut self, mode: CallMode) -> Self {
        self.mode = mode;
        self
    }

    /// Start the session and return the caller channels immediately
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self, seed: Request) -> PageStream<P> {
        let config = self.queue.config().clone();
        let cancel = self.queue.cancellation_token().clone();

        let (data_tx, data_rx) = mpsc::channel(config.data_capacity.max(1));
        let (error_tx, error_rx) = mpsc::unbounded_channel();

        let session = Session {
            handle: self.queue.start(),
            config,
            mode: self.mode,
            cancel: cancel.clone(),
            data: data_tx,
            errors: error_tx,
        };
        tokio::spawn(session.run(seed));

        PageStream::new(data_rx, error_rx, cancel)
    }
}

/// The orchestration task; owns the caller-facing senders
struct Session<P> {
    handle: QueueHandle<P>,
    config: QueueConfig,
    mode: CallMode,
    cancel: CancellationToken,
    data: mpsc::Sender<P>,
    errors: mpsc::UnboundedSender<Error>,
}

impl<P: Page> Session<P> {
    async fn run(mut self, seed: Request) {
        debug!(url = %seed.url(), mode = ?self.mode, "Starting pagination session");

        if let Err(e) = self.handle.submit(seed).await {
            self.relay_error(e);
            self.handle.join().await;
            return;
        }

        let mut pages: u32 = 0;
        loop {
            let response = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    debug!(pages, "Pagination cancelled");
                    break;
                }
                next = self.handle.recv() => match next {
                    Some(response) => response,
                    None => break,
                },
            };
            pages += 1;

            let step = next_page(&response, &self.config, self.mode);
            let (request, payload, error) = response.into_parts();

            if let Some(payload) = payload {
                let sent = tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => break,
                    sent = self.data.send(payload) => sent,
                };
                if sent.is_err() {
                    debug!(pages, "Data receiver dropped, stopping pagination");
                    break;
                }
            }

            if let Some(error) = error {
                warn!(round = request.round(), error = %error, "Page returned an error");
                self.relay_error(error);
            }

            match step {
                NextPage::Continue(next) => {
                    debug!(round = next.round(), "Requesting next page");
                    if self.handle.submit(next).await.is_err() {
                        break;
                    }
                }
                NextPage::Done(reason) => {
                    debug!(pages, ?reason, "Pagination finished");
                    break;
                }
            }
        }

        self.handle.join().await;
        // data and errors senders drop here, closing both channels
    }

    fn relay_error(&self, error: Error) {
        if self.errors.send(error).is_err() {
            debug!("Error receiver dropped, discarding error");
        }
    }
}
