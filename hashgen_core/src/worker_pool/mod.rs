//! Worker pool and scheduler
//!
//! A single coordinator task owns every piece of mutable state: the worker
//! job senders, the table of pending requests and the throughput statistics.
//! Callers talk to it over a command channel and wait on a oneshot for their
//! answer; workers answer over a shared message channel. Nothing is locked.
//!
//! Single requests always go to worker 0. Bulk requests are split into
//! batches that are handed out round-robin and re-sequenced by their original
//! index when the last batch returns.

mod messages;
mod stats;
mod worker;

pub use stats::{StatsCallback, StatsUpdate};

use crate::error::{InternalError, ValidationError};
use crate::hashing::{AlgorithmRegistry, HashOptions};
use crate::{EngineConfig, Result};
use messages::{HashRequest, WorkerJob, WorkerMessage, partition};
use stats::Statistics;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use worker::Worker;

/// Requests from the engine facade to the coordinator
enum Command {
    Single {
        request: HashRequest,
        reply: oneshot::Sender<Result<String>>,
    },
    Bulk {
        batch_id: u64,
        texts: Vec<String>,
        algorithm: String,
        options: Arc<HashOptions>,
        reply: oneshot::Sender<Result<Vec<String>>>,
    },
    Subscribe(StatsCallback),
}

struct PendingSingle {
    algorithm: String,
    reply: oneshot::Sender<Result<String>>,
}

struct PendingBulk {
    algorithm: String,
    reply: oneshot::Sender<Result<Vec<String>>>,
    results: Vec<(usize, String)>,
    outstanding: usize,
}

/// Handle to the coordinator task and its workers
pub(crate) struct WorkerPool {
    commands: mpsc::UnboundedSender<Command>,
    next_id: AtomicU64,
    worker_count: usize,
    coordinator: JoinHandle<()>,
}

impl WorkerPool {
    /// Start the workers and the coordinator on the current Tokio runtime
    pub fn start(config: &EngineConfig, registry: Arc<AlgorithmRegistry>) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|err| {
            ValidationError::invalid_configuration(&format!(
                "the hash engine must be started inside a Tokio runtime ({err})"
            ))
        })?;

        let worker_count = config.resolved_worker_count();
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let (job_tx, job_rx) = mpsc::unbounded_channel();
            Worker::new(index, Arc::clone(&registry), job_rx, message_tx.clone()).spawn()?;
            workers.push(job_tx);
        }
        // Only workers hold message senders
        drop(message_tx);

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let coordinator = Coordinator {
            workers,
            batch_size: config.batch_size,
            singles: HashMap::new(),
            bulks: HashMap::new(),
            stats: Statistics::new(Instant::now()),
            subscribers: Vec::new(),
        };
        let interval = Duration::from_millis(config.stats_interval_ms.max(1));
        let coordinator = runtime.spawn(coordinator.run(command_rx, message_rx, interval));

        log::debug!("Worker pool started with {worker_count} workers");
        Ok(Self {
            commands: command_tx,
            next_id: AtomicU64::new(1),
            worker_count,
            coordinator,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Queue one hash; the receiver settles with the digest or the failure
    pub fn submit_single(
        &self,
        text: String,
        algorithm: String,
        options: HashOptions,
    ) -> oneshot::Receiver<Result<String>> {
        let (reply, receiver) = oneshot::channel();
        let request = HashRequest {
            id: self.next_id(),
            text,
            algorithm,
            options: Arc::new(options),
        };
        // A closed channel drops `reply`, which the caller sees as shutdown
        let _ = self.commands.send(Command::Single { request, reply });
        receiver
    }

    /// Queue a bulk request; results come back in input order
    pub fn submit_bulk(
        &self,
        texts: Vec<String>,
        algorithm: String,
        options: HashOptions,
    ) -> oneshot::Receiver<Result<Vec<String>>> {
        let (reply, receiver) = oneshot::channel();
        let _ = self.commands.send(Command::Bulk {
            batch_id: self.next_id(),
            texts,
            algorithm,
            options: Arc::new(options),
            reply,
        });
        receiver
    }

    pub fn subscribe(&self, callback: StatsCallback) {
        let _ = self.commands.send(Command::Subscribe(callback));
    }

    /// Close the command channel and wait for the coordinator to finish
    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(err) = self.coordinator.await {
            log::error!("Coordinator task failed during shutdown: {err}");
        }
    }
}

struct Coordinator {
    workers: Vec<mpsc::UnboundedSender<WorkerJob>>,
    batch_size: usize,
    singles: HashMap<u64, PendingSingle>,
    bulks: HashMap<u64, PendingBulk>,
    stats: Statistics,
    subscribers: Vec<StatsCallback>,
}

impl Coordinator {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut messages: mpsc::UnboundedReceiver<WorkerMessage>,
        interval: Duration,
    ) {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(message) = messages.recv() => self.handle_message(message),
                _ = ticker.tick() => self.sample_stats(),
            }
        }

        self.reject_pending();
        log::debug!("Coordinator stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Single { request, reply } => self.dispatch_single(request, reply),
            Command::Bulk {
                batch_id,
                texts,
                algorithm,
                options,
                reply,
            } => self.dispatch_bulk(batch_id, texts, algorithm, options, reply),
            Command::Subscribe(callback) => self.subscribers.push(callback),
        }
    }

    fn dispatch_single(&mut self, request: HashRequest, reply: oneshot::Sender<Result<String>>) {
        let id = request.id;
        let algorithm = request.algorithm.clone();
        self.stats.record_algorithm(&algorithm);

        log::debug!("Dispatching request {id} ({algorithm}) to worker 0");
        if self.workers[0].send(WorkerJob::Single(request)).is_err() {
            log::error!("Worker 0 is gone; rejecting request {id}");
            let _ = reply.send(Err(InternalError::worker_failure(
                &algorithm,
                "worker 0 is no longer running",
            )
            .into()));
            return;
        }

        self.singles.insert(id, PendingSingle { algorithm, reply });
    }

    fn dispatch_bulk(
        &mut self,
        batch_id: u64,
        texts: Vec<String>,
        algorithm: String,
        options: Arc<HashOptions>,
        reply: oneshot::Sender<Result<Vec<String>>>,
    ) {
        self.stats.record_algorithm(&algorithm);
        if texts.is_empty() {
            let _ = reply.send(Ok(Vec::new()));
            return;
        }

        let total = texts.len();
        let batches = partition(batch_id, texts, self.batch_size, &algorithm, &options);
        log::debug!(
            "Dispatching bulk request {batch_id} ({algorithm}): {total} items in {} batches",
            batches.len()
        );

        let outstanding = batches.len();
        for (position, batch) in batches.into_iter().enumerate() {
            let worker = position % self.workers.len();
            if self.workers[worker].send(WorkerJob::Batch(batch)).is_err() {
                log::error!("Worker {worker} is gone; rejecting bulk request {batch_id}");
                let _ = reply.send(Err(InternalError::worker_failure(
                    &algorithm,
                    format!("worker {worker} is no longer running"),
                )
                .into()));
                return;
            }
        }

        self.bulks.insert(
            batch_id,
            PendingBulk {
                algorithm,
                reply,
                results: Vec::with_capacity(total),
                outstanding,
            },
        );
    }

    fn handle_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Single { id, result } => {
                let Some(pending) = self.singles.remove(&id) else {
                    log::trace!("Dropping stale result for request {id}");
                    return;
                };
                if result.is_ok() {
                    self.stats.record_hashes(1);
                }
                let result =
                    result.map_err(|err| InternalError::into_worker_failure(err, &pending.algorithm));
                log::debug!("Request {id} settled");
                // The caller may have stopped waiting
                let _ = pending.reply.send(result);
            }
            WorkerMessage::Batch { batch_id, result } => {
                let Some(pending) = self.bulks.get_mut(&batch_id) else {
                    log::trace!("Dropping stale batch result for request {batch_id}");
                    return;
                };

                match result {
                    Ok(mut results) => {
                        self.stats.record_hashes(results.len());
                        pending.results.append(&mut results);
                        pending.outstanding -= 1;
                        if pending.outstanding == 0
                            && let Some(pending) = self.bulks.remove(&batch_id)
                        {
                            let mut results = pending.results;
                            results.sort_unstable_by_key(|(index, _)| *index);
                            log::debug!("Bulk request {batch_id} settled");
                            let _ = pending
                                .reply
                                .send(Ok(results.into_iter().map(|(_, digest)| digest).collect()));
                        }
                    }
                    Err(err) => {
                        if let Some(pending) = self.bulks.remove(&batch_id) {
                            log::debug!("Bulk request {batch_id} failed: {err}");
                            let _ = pending.reply.send(Err(InternalError::into_worker_failure(
                                err,
                                &pending.algorithm,
                            )));
                        }
                    }
                }
            }
        }
    }

    fn sample_stats(&mut self) {
        if let Some(update) = self.stats.sample(Instant::now()) {
            for subscriber in &self.subscribers {
                subscriber(update);
            }
        }
    }

    fn reject_pending(&mut self) {
        for (_, pending) in self.singles.drain() {
            let _ = pending.reply.send(Err(InternalError::EngineShutdown.into()));
        }
        for (_, pending) in self.bulks.drain() {
            let _ = pending.reply.send(Err(InternalError::EngineShutdown.into()));
        }
    }
}
