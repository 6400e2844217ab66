//! Concurrent request fan-out

use crate::error::{FailureKind, ProbeError, ProbeResult};
use loadspread_http::HttpClient;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Worker ceiling applied when no explicit concurrency limit is configured
pub const DEFAULT_MAX_IN_FLIGHT: usize = 256;

/// Every outcome of one batch, gathered behind a completion barrier
#[derive(Debug)]
pub struct BatchOutcome {
    /// One entry per request intent, in intent order
    pub outcomes: Vec<ProbeResult<String>>,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }
}

/// Issues a batch of GET requests through a fixed pool of workers
///
/// Workers pull request intents from a shared queue until it is drained, so
/// at most `worker_count(n)` requests are in flight at once. Individual
/// failures and timeouts are recorded in the outcome and never abort the
/// batch.
pub struct FanoutEngine<C: HttpClient + ?Sized> {
    client: Arc<C>,
    concurrency_limit: Option<usize>,
    request_timeout: Duration,
}

impl<C: HttpClient + ?Sized + 'static> FanoutEngine<C> {
    pub fn new(client: Arc<C>, request_timeout: Duration) -> Self {
        Self {
            client,
            concurrency_limit: None,
            request_timeout,
        }
    }

    pub fn with_concurrency_limit(mut self, limit: Option<usize>) -> Self {
        self.concurrency_limit = limit.filter(|l| *l > 0);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Workers spawned for a batch of `n` requests
    pub fn worker_count(&self, n: usize) -> usize {
        match self.concurrency_limit {
            Some(limit) => n.min(limit),
            None => n.min(DEFAULT_MAX_IN_FLIGHT),
        }
    }

    pub async fn run_batch(&self, url: &str, n: usize) -> BatchOutcome {
        let started = Instant::now();
        let workers = self.worker_count(n);
        debug!(url, requests = n, workers, "Starting batch");

        let (tx, rx) = mpsc::channel::<usize>(n.max(1));
        for index in 0..n {
            if tx.send(index).await.is_err() {
                break;
            }
        }
        drop(tx);

        let queue = Arc::new(Mutex::new(rx));
        let url: Arc<str> = Arc::from(url);
        let mut pool = JoinSet::new();

        for _ in 0..workers {
            let queue = Arc::clone(&queue);
            let client = Arc::clone(&self.client);
            let url = Arc::clone(&url);
            let limit = self.request_timeout;

            pool.spawn(async move {
                let mut completed = Vec::new();
                loop {
                    let next = queue.lock().await.recv().await;
                    let Some(index) = next else { break };
                    completed.push((index, fetch(client.as_ref(), &url, limit).await));
                }
                completed
            });
        }

        let mut slots: Vec<Option<ProbeResult<String>>> = (0..n).map(|_| None).collect();
        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(completed) => {
                    for (index, outcome) in completed {
                        slots[index] = Some(outcome);
                    }
                }
                Err(error) => warn!(%error, "Fan-out worker terminated abnormally"),
            }
        }

        let outcomes: Vec<_> = slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(ProbeError::RequestFailed {
                        kind: FailureKind::Other,
                        message: "worker stopped before recording an outcome".to_string(),
                    })
                })
            })
            .collect();

        let batch = BatchOutcome {
            outcomes,
            elapsed: started.elapsed(),
        };
        debug!(
            url = %url,
            succeeded = batch.succeeded(),
            failed = batch.failed(),
            elapsed_ms = batch.elapsed.as_millis() as u64,
            "Batch complete"
        );
        batch
    }
}

async fn fetch<C: HttpClient + ?Sized>(client: &C, url: &str, limit: Duration) -> ProbeResult<String> {
    match tokio::time::timeout(limit, client.get_text(url)).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(error)) => Err(ProbeError::request_failed(&error)),
        Err(_) => Err(ProbeError::RequestFailed {
            kind: FailureKind::Timeout,
            message: format!("no response from {} within {}ms", url, limit.as_millis()),
        }),
    }
}
