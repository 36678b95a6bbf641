//! Caller-facing side of a pagination session

use crate::error::{Error, Result};
use futures::Stream;
use std::pin::Pin;
use std::task::Poll;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Pages and errors merged into one stream
pub type PageResultStream<P> = Pin<Box<dyn Stream<Item = Result<P>> + Send>>;

/// The two channels handed to the caller of a paginated call
///
/// `data` yields one payload per page; `errors` yields zero or more errors.
/// Both close when the session ends. The `errors` channel is unbounded so a
/// caller that drains `data` first never stalls the session.
///
/// Dropping the stream cancels the session.
#[derive(Debug)]
pub struct PageStream<P> {
    /// Decoded payloads, one per page
    pub data: mpsc::Receiver<P>,
    /// Errors relayed from the executor or the API
    pub errors: mpsc::UnboundedReceiver<Error>,
    cancel: CancellationToken,
    guard: DropGuard,
}

impl<P: Send + 'static> PageStream<P> {
    pub(crate) fn new(
        data: mpsc::Receiver<P>,
        errors: mpsc::UnboundedReceiver<Error>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            data,
            errors,
            guard: cancel.clone().drop_guard(),
            cancel,
        }
    }

    /// A session that never started: one error, both channels closed
    pub fn failed(error: Error) -> Self {
        let (_, data) = mpsc::channel(1);
        let (error_tx, errors) = mpsc::unbounded_channel();
        // receiver is alive, cannot fail
        let _ = error_tx.send(error);
        Self::new(data, errors, CancellationToken::new())
    }

    /// Stop the session, aborting any pacing wait or in-flight call
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Next page, or `None` once the session is over
    pub async fn next_page(&mut self) -> Option<P> {
        self.data.recv().await
    }

    /// Split into the raw receivers
    ///
    /// Disarms drop cancellation: the session then stops when `data` is
    /// dropped, or on [`PageStream::cancellation_token`].
    pub fn into_parts(self) -> (mpsc::Receiver<P>, mpsc::UnboundedReceiver<Error>) {
        let (data, errors, guard) = self.split();
        guard.disarm();
        (data, errors)
    }

    fn split(self) -> (mpsc::Receiver<P>, mpsc::UnboundedReceiver<Error>, DropGuard) {
        (self.data, self.errors, self.guard)
    }

    /// Drain both channels concurrently until they close
    pub async fn collect(self) -> (Vec<P>, Vec<Error>) {
        let (mut data, mut errors, _guard) = self.split();

        let pages = async {
            let mut pages = Vec::new();
            while let Some(page) = data.recv().await {
                pages.push(page);
            }
            pages
        };
        let failures = async {
            let mut failures = Vec::new();
            while let Some(error) = errors.recv().await {
                failures.push(error);
            }
            failures
        };

        tokio::join!(pages, failures)
    }

    /// Merge both channels into a single stream of results
    ///
    /// Errors are polled first, so an error is yielded no later than the
    /// page that follows it.
    pub fn into_stream(self) -> PageResultStream<P> {
        let (data, errors, guard) = self.split();
        let mut data = Some(data);
        let mut errors = Some(errors);

        Box::pin(futures::stream::poll_fn(move |cx| {
            // held for as long as the stream lives
            let _guard = &guard;
            match errors.as_mut().map(|rx| rx.poll_recv(cx)) {
                Some(Poll::Ready(Some(error))) => return Poll::Ready(Some(Err(error))),
                Some(Poll::Ready(None)) => errors = None,
                Some(Poll::Pending) | None => {}
            }
            match data.as_mut().map(|rx| rx.poll_recv(cx)) {
                Some(Poll::Ready(Some(page))) => return Poll::Ready(Some(Ok(page))),
                Some(Poll::Ready(None)) => data = None,
                Some(Poll::Pending) | None => {}
            }
            if data.is_none() && errors.is_none() {
                Poll::Ready(None)
            } else {
                Poll::Pending
            }
        }))
    }
}
