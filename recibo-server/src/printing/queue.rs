//! FIFO print job dispatch
//!
//! The printer is a serial resource: jobs drain strictly in submission
//! order and at most one job is ever in `printing`. A submit that lands
//! while a drain loop is running is absorbed by that loop; a submit on an
//! idle queue starts a new one. Job failures are isolated: a failed job
//! is reported and the loop moves on to the next.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use recibo_printer::{PaperStatus, PrintError, PrinterTransport, Temperature};
use serde::Serialize;
use tokio::sync::{Mutex, oneshot};
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::{ReceiptStatusUpdate, ReceiptStore};

/// Print job lifecycle state
///
/// `pending -> printing -> {completed | failed}`, terminal states final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Printing,
    Completed,
    Failed,
}

/// One queued printer write
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub id: Uuid,
    /// Receipt row to update with the outcome, when the job prints a receipt
    pub receipt_id: Option<String>,
    pub commands: Vec<u8>,
    pub status: JobStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PrintJob {
    pub fn new(receipt_id: Option<String>, commands: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            receipt_id,
            commands,
            status: JobStatus::Pending,
            error: None,
            created_at: Utc::now(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Completed
    }
}

struct QueuedJob {
    job: PrintJob,
    done: oneshot::Sender<PrintJob>,
}

struct DispatchState {
    jobs: VecDeque<QueuedJob>,
    /// True while a drain loop is running
    active: bool,
}

/// FIFO dispatcher in front of a printer transport
#[derive(Clone)]
pub struct PrintQueue {
    transport: Arc<dyn PrinterTransport>,
    store: Arc<dyn ReceiptStore>,
    state: Arc<Mutex<DispatchState>>,
}

impl PrintQueue {
    pub fn new(transport: Arc<dyn PrinterTransport>, store: Arc<dyn ReceiptStore>) -> Self {
        Self {
            transport,
            store,
            state: Arc::new(Mutex::new(DispatchState {
                jobs: VecDeque::new(),
                active: false,
            })),
        }
    }

    /// Enqueue a job; the returned receiver resolves with its terminal state
    ///
    /// Starts a drain loop only when none is running, so concurrent submits
    /// never race two loops onto the hardware.
    pub async fn submit(&self, job: PrintJob) -> oneshot::Receiver<PrintJob> {
        let (done, outcome) = oneshot::channel();

        let start_drain = {
            let mut state = self.state.lock().await;
            state.jobs.push_back(QueuedJob { job, done });
            if state.active {
                false
            } else {
                state.active = true;
                true
            }
        };

        if start_drain {
            let queue = self.clone();
            tokio::spawn(async move {
                queue.drain().await;
            });
        }

        outcome
    }

    /// Number of jobs waiting behind the active one
    pub async fn pending(&self) -> usize {
        self.state.lock().await.jobs.len()
    }

    /// Fail every queued job, used on disconnect
    ///
    /// A job already handed to the transport is abandoned, not resumed;
    /// thermal printing has no abort command.
    pub async fn clear(&self, reason: &str) {
        let drained: Vec<QueuedJob> = {
            let mut state = self.state.lock().await;
            state.jobs.drain(..).collect()
        };

        for queued in drained {
            let mut job = queued.job;
            job.status = JobStatus::Failed;
            job.error = Some(reason.to_string());
            self.persist_outcome(&job).await;
            let _ = queued.done.send(job);
        }
    }

    async fn drain(&self) {
        loop {
            let queued = {
                let mut state = self.state.lock().await;
                match state.jobs.pop_front() {
                    Some(queued) => queued,
                    None => {
                        state.active = false;
                        return;
                    }
                }
            };

            let mut job = queued.job;
            job.status = JobStatus::Printing;
            info!(job_id = %job.id, bytes = job.commands.len(), "Dispatching print job");

            match self.dispatch(&job).await {
                Ok(()) => {
                    job.status = JobStatus::Completed;
                }
                Err(e) => {
                    warn!(job_id = %job.id, error = %e, "Print job failed");
                    job.status = JobStatus::Failed;
                    job.error = Some(e.to_string());
                }
            }

            self.persist_outcome(&job).await;

            // Submitter may have gone away; the outcome is persisted either way
            let _ = queued.done.send(job);
        }
    }

    /// Probe live status, then write the command stream
    async fn dispatch(&self, job: &PrintJob) -> Result<(), PrintError> {
        let status = self.transport.status().await;
        if !status.connected {
            return Err(PrintError::NotConnected);
        }
        if status.paper_status == PaperStatus::Empty {
            return Err(PrintError::PaperEmpty);
        }
        if status.temperature == Temperature::High {
            return Err(PrintError::Overheated);
        }

        self.transport.send(&job.commands).await
    }

    async fn persist_outcome(&self, job: &PrintJob) {
        let Some(receipt_id) = &job.receipt_id else {
            return;
        };

        let update = if job.succeeded() {
            ReceiptStatusUpdate {
                status: "printed".to_string(),
                printed_at: Some(Utc::now()),
                printer_info: Some(serde_json::json!({ "job_id": job.id })),
            }
        } else {
            ReceiptStatusUpdate {
                status: "failed".to_string(),
                printed_at: None,
                printer_info: Some(serde_json::json!({
                    "job_id": job.id,
                    "error": job.error,
                })),
            }
        };

        if let Err(e) = self.store.update_receipt_status(receipt_id, &update).await {
            warn!(receipt_id = %receipt_id, error = %e, "Failed to persist print outcome");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use recibo_printer::{PrintResult, PrinterStatus};
    use std::sync::Mutex as StdMutex;

    use crate::store::{
        AttendanceRecordRow, NewReceipt, ReceiptRow, ReceiptTemplateRow, StoreResult,
    };

    #[derive(Default)]
    struct FakeTransport {
        sends: StdMutex<Vec<Vec<u8>>>,
        failures: StdMutex<VecDeque<PrintError>>,
        offline: bool,
    }

    impl FakeTransport {
        fn fail_next(&self, error: PrintError) {
            self.failures.lock().unwrap().push_back(error);
        }

        fn sent(&self) -> Vec<Vec<u8>> {
            self.sends.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PrinterTransport for FakeTransport {
        async fn send(&self, data: &[u8]) -> PrintResult<()> {
            if let Some(e) = self.failures.lock().unwrap().pop_front() {
                return Err(e);
            }
            self.sends.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        async fn status(&self) -> PrinterStatus {
            if self.offline {
                PrinterStatus::unreachable("offline")
            } else {
                PrinterStatus::online()
            }
        }
    }

    #[derive(Default)]
    struct FakeStore {
        updates: StdMutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ReceiptStore for FakeStore {
        async fn get_attendance_record(
            &self,
            _id: &str,
        ) -> StoreResult<Option<AttendanceRecordRow>> {
            Ok(None)
        }

        async fn get_template(&self, _id: &str) -> StoreResult<Option<ReceiptTemplateRow>> {
            Ok(None)
        }

        async fn get_default_template(&self) -> StoreResult<Option<ReceiptTemplateRow>> {
            Ok(None)
        }

        async fn get_receipt(&self, _id: &str) -> StoreResult<Option<ReceiptRow>> {
            Ok(None)
        }

        async fn insert_receipt(&self, receipt: &NewReceipt) -> StoreResult<ReceiptRow> {
            Ok(ReceiptRow {
                id: "rc-1".to_string(),
                receipt_number: Some("REC-0001".to_string()),
                attendance_record_id: receipt.attendance_record_id.clone(),
                status: receipt.status.clone(),
                receipt_data: Some(receipt.receipt_data.clone()),
            })
        }

        async fn update_receipt_status(
            &self,
            id: &str,
            update: &ReceiptStatusUpdate,
        ) -> StoreResult<()> {
            self.updates
                .lock()
                .unwrap()
                .push((id.to_string(), update.status.clone()));
            Ok(())
        }
    }

    fn queue(transport: Arc<FakeTransport>) -> (PrintQueue, Arc<FakeStore>) {
        let store = Arc::new(FakeStore::default());
        (PrintQueue::new(transport, store.clone()), store)
    }

    #[tokio::test]
    async fn test_jobs_drain_in_fifo_order() {
        let transport = Arc::new(FakeTransport::default());
        let (queue, _) = queue(transport.clone());

        let rx1 = queue.submit(PrintJob::new(None, vec![1])).await;
        let rx2 = queue.submit(PrintJob::new(None, vec![2])).await;
        let rx3 = queue.submit(PrintJob::new(None, vec![3])).await;

        let j1 = rx1.await.unwrap();
        let j2 = rx2.await.unwrap();
        let j3 = rx3.await.unwrap();

        assert!(j1.succeeded() && j2.succeeded() && j3.succeeded());
        assert_eq!(transport.sent(), vec![vec![1], vec![2], vec![3]]);
    }

    #[tokio::test]
    async fn test_failure_does_not_block_next_job() {
        let transport = Arc::new(FakeTransport::default());
        transport.fail_next(PrintError::Communication("wire unplugged".to_string()));
        let (queue, _) = queue(transport.clone());

        let rx1 = queue.submit(PrintJob::new(None, vec![1])).await;
        let rx2 = queue.submit(PrintJob::new(None, vec![2])).await;

        let j1 = rx1.await.unwrap();
        let j2 = rx2.await.unwrap();

        assert_eq!(j1.status, JobStatus::Failed);
        assert!(j1.error.unwrap().contains("wire unplugged"));
        assert_eq!(j2.status, JobStatus::Completed);
        assert_eq!(transport.sent(), vec![vec![2]]);
    }

    #[tokio::test]
    async fn test_offline_transport_fails_without_sending() {
        let transport = Arc::new(FakeTransport {
            offline: true,
            ..FakeTransport::default()
        });
        let (queue, _) = queue(transport.clone());

        let job = queue
            .submit(PrintJob::new(None, vec![1]))
            .await
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_outcome_persisted_for_receipt_jobs() {
        let transport = Arc::new(FakeTransport::default());
        transport.fail_next(PrintError::PaperEmpty);
        let (queue, store) = queue(transport.clone());

        let rx1 = queue
            .submit(PrintJob::new(Some("rc-1".to_string()), vec![1]))
            .await;
        let rx2 = queue
            .submit(PrintJob::new(Some("rc-2".to_string()), vec![2]))
            .await;
        rx1.await.unwrap();
        rx2.await.unwrap();

        let updates = store.updates.lock().unwrap().clone();
        assert_eq!(updates[0], ("rc-1".to_string(), "failed".to_string()));
        assert_eq!(updates[1], ("rc-2".to_string(), "printed".to_string()));
    }
}
