//! Queue worker

use super::pacing::{FixedIntervalPacer, Pacer};
use super::types::QueueConfig;
use crate::error::{Error, Result};
use crate::http::Executor;
use crate::page::Page;
use crate::request::{Request, Response};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A not-yet-started rate-limited queue
pub struct Queue<P> {
    config: QueueConfig,
    executor: Arc<dyn Executor<P>>,
    pacer: Box<dyn Pacer>,
    cancel: CancellationToken,
}

impl<P: Page> Queue<P> {
    /// Create a queue pacing at `config.interval`
    pub fn new(config: QueueConfig, executor: Arc<dyn Executor<P>>) -> Self {
        let pacer = Box::new(FixedIntervalPacer::new(config.interval));
        Self {
            config,
            executor,
            pacer,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the executor
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn Executor<P>>) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the pacing strategy
    #[must_use]
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    /// Stop when `parent` is cancelled
    ///
    /// The queue runs on a child of `parent`, so cancelling this queue never
    /// cancels the parent or its other children.
    #[must_use]
    pub fn with_cancellation(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Spawn the worker and return the handle used to feed it
    pub fn start(self) -> QueueHandle<P> {
        let (request_tx, request_rx) = mpsc::channel(self.config.request_capacity.max(1));
        let (response_tx, response_rx) = mpsc::channel(self.config.response_capacity.max(1));

        let worker = Worker {
            executor: self.executor,
            pacer: self.pacer,
            cancel: self.cancel.clone(),
            requests: request_rx,
            responses: response_tx,
        };
        let task = tokio::spawn(worker.run());

        QueueHandle {
            requests: Some(request_tx),
            responses: response_rx,
            cancel: self.cancel,
            task,
        }
    }
}

impl<P> std::fmt::Debug for Queue<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Handle to a running queue
pub struct QueueHandle<P> {
    requests: Option<mpsc::Sender<Request>>,
    responses: mpsc::Receiver<Response<P>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl<P> QueueHandle<P> {
    /// Enqueue a request, waiting for channel capacity
    pub async fn submit(&self, request: Request) -> Result<()> {
        let sender = self.requests.as_ref().ok_or(Error::QueueClosed)?;
        sender.send(request).await.map_err(|_| Error::QueueClosed)
    }

    /// Next response, or `None` once the worker has stopped
    pub async fn recv(&mut self) -> Option<Response<P>> {
        self.responses.recv().await
    }

    /// Stop accepting requests; the worker finishes what is queued and exits
    pub fn close(&mut self) {
        self.requests = None;
    }

    /// Stop the worker, including any in-flight pacing wait or call
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.requests.is_none()
    }

    /// Close the inbound side and wait for the worker to exit
    pub async fn join(mut self) {
        self.close();
        // Unblock a worker parked on a full outbound channel
        self.responses.close();
        if let Err(e) = self.task.await {
            warn!(error = %e, "Queue worker terminated abnormally");
        }
    }
}

struct Worker<P> {
    executor: Arc<dyn Executor<P>>,
    pacer: Box<dyn Pacer>,
    cancel: CancellationToken,
    requests: mpsc::Receiver<Request>,
    responses: mpsc::Sender<Response<P>>,
}

impl<P: Page> Worker<P> {
    async fn run(mut self) {
        debug!("Queue worker started");
        let mut dispatched: u64 = 0;

        loop {
            let mut request = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    debug!("Queue worker cancelled while idle");
                    break;
                }
                next = self.requests.recv() => match next {
                    Some(request) => request,
                    None => break,
                },
            };

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    debug!(round = request.round(), "Queue worker cancelled while pacing");
                    break;
                }
                () = self.pacer.wait() => {}
            }

            request.mark_dispatched(Instant::now());
            dispatched += 1;
            debug!(
                round = request.round(),
                dispatched,
                url = %request.url(),
                "Dispatching request"
            );

            let outcome = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    debug!(round = request.round(), "Queue worker cancelled during call");
                    break;
                }
                outcome = AssertUnwindSafe(self.executor.execute(&request)).catch_unwind() => outcome,
            };
            request.mark_completed();

            let result = outcome.unwrap_or_else(|panic| {
                Err(Error::ExecutorPanic {
                    message: panic_message(panic.as_ref()),
                })
            });

            if let Err(e) = &result {
                warn!(round = request.round(), error = %e, "Request failed");
            }

            let response = Response::from_result(request, result);
            let sent = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                sent = self.responses.send(response) => sent,
            };
            if sent.is_err() {
                debug!("Response receiver dropped, stopping queue worker");
                break;
            }
        }

        debug!(dispatched, "Queue worker stopped");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
