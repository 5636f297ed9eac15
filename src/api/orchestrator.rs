use super::{QueryBackend, QueryError, QueryRequest};
use crate::filter::cancel::CancelToken;
use crate::record::LogRecord;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of one query submission, tagged with its sequence number.
#[derive(Debug)]
pub struct QueryOutcome {
    pub seq: u64,
    pub request: QueryRequest,
    pub result: Result<Vec<LogRecord>, QueryError>,
}

/// Runs remote queries on worker threads and hands back only the newest
/// outcome.
///
/// Policy is cancel-and-ignore: a submission cancels whatever is in flight
/// and bumps the sequence number. Outcomes that arrive with an older number
/// are dropped in [`try_recv`](Self::try_recv), so a slow stale response
/// can never overwrite a newer result.
pub struct QueryOrchestrator {
    backend: Arc<dyn QueryBackend>,
    tx: Sender<QueryOutcome>,
    rx: Receiver<QueryOutcome>,
    seq: u64,
    pending: Option<CancelToken>,
}

impl QueryOrchestrator {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        let (tx, rx) = channel();
        Self {
            backend,
            tx,
            rx,
            seq: 0,
            pending: None,
        }
    }

    /// Start `request` in the background and return its sequence number.
    pub fn submit(&mut self, request: QueryRequest) -> u64 {
        self.cancel_pending();
        self.seq += 1;
        let seq = self.seq;

        let cancel = CancelToken::new();
        self.pending = Some(cancel.clone());

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        debug!(seq, query = %request.query, "Submitting query");

        thread::spawn(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                backend.execute(&request, &cancel)
            }))
            .unwrap_or_else(|_| Err(QueryError::Internal("query thread panicked".to_string())));

            // Receiver gone means the app is shutting down.
            let _ = tx.send(QueryOutcome {
                seq,
                request,
                result,
            });
        });

        seq
    }

    /// Forget the in-flight request so its response is discarded on arrival.
    pub fn invalidate(&mut self) {
        if self.pending.is_some() {
            self.cancel_pending();
            self.seq += 1;
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(cancel) = self.pending.take() {
            cancel.cancel();
        }
    }

    /// Next outcome for the latest submission, if it has arrived.
    pub fn try_recv(&mut self) -> Option<QueryOutcome> {
        loop {
            match self.rx.try_recv() {
                Ok(outcome) => {
                    if let Some(current) = self.accept(outcome) {
                        return Some(current);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Block up to `timeout` for the latest submission's outcome.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<QueryOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    if let Some(current) = self.accept(outcome) {
                        return Some(current);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    fn accept(&mut self, outcome: QueryOutcome) -> Option<QueryOutcome> {
        if outcome.seq != self.seq {
            debug!(
                seq = outcome.seq,
                latest = self.seq,
                "Discarding stale query response"
            );
            return None;
        }
        self.pending = None;
        Some(outcome)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn latest_seq(&self) -> u64 {
        self.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{record, scenario_records, MockBackend};
    use crate::timerange::TimeRange;

    const WAIT: Duration = Duration::from_secs(5);

    fn request(query: &str) -> QueryRequest {
        QueryRequest::new(query, TimeRange::default(), 100)
    }

    #[test]
    fn test_outcome_delivered_and_loading_cleared() {
        let backend = Arc::new(MockBackend::returning(scenario_records()));
        let mut orch = QueryOrchestrator::new(backend.clone());

        let seq = orch.submit(request("fetch logs"));
        assert!(orch.is_loading());

        let outcome = orch.recv_timeout(WAIT).expect("outcome");
        assert_eq!(outcome.seq, seq);
        assert_eq!(outcome.result.unwrap().len(), 3);
        assert!(!orch.is_loading());
        assert_eq!(backend.calls(), 1);
        assert_eq!(backend.requests()[0].query, "fetch logs");
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let slow = Arc::new(
            MockBackend::returning(vec![record("2024-03-15T10:00:00Z", "INFO", "old", "stale")])
                .with_delay(Duration::from_millis(200)),
        );
        let mut orch = QueryOrchestrator::new(slow.clone());
        let first = orch.submit(request("first"));

        slow.set_response(Ok(scenario_records()));
        let second = orch.submit(request("second"));
        assert!(second > first);

        let outcome = orch.recv_timeout(WAIT).expect("outcome");
        assert_eq!(outcome.seq, second);
        assert_eq!(outcome.request.query, "second");

        // The first worker finishes later and must not surface.
        thread::sleep(Duration::from_millis(300));
        assert!(orch.try_recv().is_none());
    }

    #[test]
    fn test_invalidate_discards_in_flight_response() {
        let backend = Arc::new(
            MockBackend::returning(scenario_records()).with_delay(Duration::from_millis(100)),
        );
        let mut orch = QueryOrchestrator::new(backend);
        orch.submit(request("fetch logs"));
        orch.invalidate();
        assert!(!orch.is_loading());
        assert!(orch.recv_timeout(Duration::from_millis(400)).is_none());
    }

    #[test]
    fn test_invalidate_without_pending_keeps_sequence() {
        let backend = Arc::new(MockBackend::returning(vec![]));
        let mut orch = QueryOrchestrator::new(backend);
        orch.invalidate();
        assert_eq!(orch.latest_seq(), 0);
    }

    #[test]
    fn test_backend_error_is_delivered() {
        let backend = Arc::new(MockBackend::failing(QueryError::Timeout));
        let mut orch = QueryOrchestrator::new(backend);
        orch.submit(request("fetch logs"));
        let outcome = orch.recv_timeout(WAIT).expect("outcome");
        assert_eq!(outcome.result.unwrap_err(), QueryError::Timeout);
    }

    struct PanickingBackend;

    impl QueryBackend for PanickingBackend {
        fn execute(
            &self,
            _request: &QueryRequest,
            _cancel: &CancelToken,
        ) -> Result<Vec<LogRecord>, QueryError> {
            panic!("backend exploded");
        }
    }

    #[test]
    fn test_worker_panic_becomes_error() {
        let mut orch = QueryOrchestrator::new(Arc::new(PanickingBackend));
        orch.submit(request("fetch logs"));
        let outcome = orch.recv_timeout(WAIT).expect("outcome");
        assert!(matches!(outcome.result, Err(QueryError::Internal(_))));
    }
}
