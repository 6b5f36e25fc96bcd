//! Worker threads
//!
//! Each worker owns a dedicated OS thread so that key derivation functions
//! never block the async runtime. Panics inside an algorithm are caught and
//! reported as a failure of the request that triggered them.

use super::messages::{Batch, HashRequest, WorkerJob, WorkerMessage};
use crate::error::InternalError;
use crate::hashing::{AlgorithmRegistry, HashOptions};
use crate::{Error, Result};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc;

pub(crate) struct Worker {
    index: usize,
    registry: Arc<AlgorithmRegistry>,
    jobs: mpsc::UnboundedReceiver<WorkerJob>,
    results: mpsc::UnboundedSender<WorkerMessage>,
}

impl Worker {
    pub fn new(
        index: usize,
        registry: Arc<AlgorithmRegistry>,
        jobs: mpsc::UnboundedReceiver<WorkerJob>,
        results: mpsc::UnboundedSender<WorkerMessage>,
    ) -> Self {
        Self {
            index,
            registry,
            jobs,
            results,
        }
    }

    /// Start the worker on its own named thread
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        let index = self.index;
        std::thread::Builder::new()
            .name(format!("hashgen-worker-{index}"))
            .spawn(move || self.run())
            .map_err(|err| {
                Error::Internal(InternalError::WorkerSpawn {
                    index,
                    message: err.to_string(),
                })
            })
    }

    fn run(mut self) {
        log::debug!("Worker {} started", self.index);

        while let Some(job) = self.jobs.blocking_recv() {
            let message = match job {
                WorkerJob::Single(request) => self.execute_single(request),
                WorkerJob::Batch(batch) => self.execute_batch(batch),
            };
            if self.results.send(message).is_err() {
                log::debug!("Worker {}: coordinator gone, stopping", self.index);
                break;
            }
        }

        log::debug!("Worker {} stopped", self.index);
    }

    fn execute_single(&self, request: HashRequest) -> WorkerMessage {
        let result = self.compute(&request.algorithm, &request.text, &request.options);
        WorkerMessage::Single {
            id: request.id,
            result,
        }
    }

    fn execute_batch(&self, batch: Batch) -> WorkerMessage {
        let result = batch
            .items
            .iter()
            .map(|item| {
                self.compute(&batch.algorithm, &item.text, &batch.options)
                    .map(|digest| (item.original_index, digest))
            })
            .collect::<Result<Vec<_>>>();

        WorkerMessage::Batch {
            batch_id: batch.batch_id,
            result,
        }
    }

    fn compute(&self, algorithm: &str, text: &str, options: &HashOptions) -> Result<String> {
        match catch_unwind(AssertUnwindSafe(|| {
            self.registry.compute(algorithm, text, options)
        })) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(&*payload);
                log::warn!(
                    "Worker {} panicked computing '{algorithm}': {message}",
                    self.index
                );
                Err(InternalError::worker_failure(algorithm, format!("panicked: {message}")).into())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};
    use crate::worker_pool::messages::BulkItem;

    struct PanickingAlgorithm;

    impl HashAlgorithmImpl for PanickingAlgorithm {
        fn descriptor(&self) -> AlgorithmDescriptor {
            AlgorithmDescriptor::plain("panic", "Panic", AlgorithmCategory::Special)
        }

        fn compute(&self, text: &str, _options: &HashOptions) -> Result<String> {
            if text == "boom" {
                panic!("refusing to hash {text}");
            }
            Ok(text.to_uppercase())
        }
    }

    fn start_worker() -> (
        mpsc::UnboundedSender<WorkerJob>,
        mpsc::UnboundedReceiver<WorkerMessage>,
    ) {
        let mut registry = AlgorithmRegistry::with_builtins();
        registry.register(PanickingAlgorithm);

        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Worker::new(0, Arc::new(registry), job_rx, result_tx)
            .spawn()
            .unwrap();
        (job_tx, result_rx)
    }

    fn request(id: u64, text: &str, algorithm: &str) -> WorkerJob {
        WorkerJob::Single(HashRequest {
            id,
            text: text.to_string(),
            algorithm: algorithm.to_string(),
            options: Arc::new(HashOptions::default()),
        })
    }

    #[test]
    fn test_single_job_round_trip() {
        let (jobs, mut results) = start_worker();
        jobs.send(request(42, "abc", "md5")).unwrap();

        match results.blocking_recv().unwrap() {
            WorkerMessage::Single { id, result } => {
                assert_eq!(id, 42);
                assert_eq!(result.unwrap(), "900150983cd24fb0d6963f7d28e17f72");
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_panic_is_reported_and_worker_survives() {
        let (jobs, mut results) = start_worker();
        jobs.send(request(1, "boom", "panic")).unwrap();
        jobs.send(request(2, "fine", "panic")).unwrap();

        match results.blocking_recv().unwrap() {
            WorkerMessage::Single { id: 1, result } => {
                let err = result.unwrap_err();
                assert!(err.is_worker_failure());
                assert!(err.to_string().contains("refusing to hash boom"));
            }
            other => panic!("unexpected message {other:?}"),
        }
        match results.blocking_recv().unwrap() {
            WorkerMessage::Single { id: 2, result } => assert_eq!(result.unwrap(), "FINE"),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_batch_preserves_indices() {
        let (jobs, mut results) = start_worker();
        jobs.send(WorkerJob::Batch(Batch {
            batch_id: 9,
            items: vec![
                BulkItem {
                    text: "a".into(),
                    original_index: 10,
                },
                BulkItem {
                    text: "b".into(),
                    original_index: 11,
                },
            ],
            algorithm: "panic".into(),
            options: Arc::new(HashOptions::default()),
        }))
        .unwrap();

        match results.blocking_recv().unwrap() {
            WorkerMessage::Batch { batch_id, result } => {
                assert_eq!(batch_id, 9);
                assert_eq!(
                    result.unwrap(),
                    vec![(10, "A".to_string()), (11, "B".to_string())]
                );
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_worker_exits_when_jobs_close() {
        let registry = Arc::new(AlgorithmRegistry::new());
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let (result_tx, _result_rx) = mpsc::unbounded_channel();
        let handle = Worker::new(3, registry, job_rx, result_tx).spawn().unwrap();

        drop(job_tx);
        handle.join().unwrap();
    }
}
