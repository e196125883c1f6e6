//! Post-commit audit dispatch
//!
//! Entries are queued after the audited action has committed and written by
//! a background worker. A full queue or a failed write is logged and
//! counted; it never reaches the caller of the audited action.

use crate::domain::AuditEntry;
use crate::repository::AuditRepository;
use crate::telemetry::metrics::record_audit;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AuditDispatcher {
    sender: mpsc::Sender<AuditEntry>,
}

impl AuditDispatcher {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AuditEntry>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Queue `entry` without waiting.
    pub fn record(&self, entry: AuditEntry) {
        let action = entry.action;
        if let Err(e) = self.sender.try_send(entry) {
            warn!(%action, error = %e, "audit entry dropped");
            record_audit("dropped");
        }
    }
}

/// Drains the audit queue into an [`AuditRepository`]
pub struct AuditWorker<R: AuditRepository + 'static> {
    receiver: mpsc::Receiver<AuditEntry>,
    repo: Arc<R>,
}

impl<R: AuditRepository + 'static> AuditWorker<R> {
    pub fn new(receiver: mpsc::Receiver<AuditEntry>, repo: Arc<R>) -> Self {
        Self { receiver, repo }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until every [`AuditDispatcher`] clone has been dropped.
    pub async fn run(mut self) {
        while let Some(entry) = self.receiver.recv().await {
            match self.repo.append(&entry).await {
                Ok(()) => {
                    debug!(action = %entry.action, "audit entry written");
                    record_audit("written");
                }
                Err(e) => {
                    warn!(
                        action = %entry.action,
                        user_id = ?entry.user_id,
                        error = %e,
                        "failed to write audit entry"
                    );
                    record_audit("failed");
                }
            }
        }
        debug!("audit queue closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditAction, Profile};
    use crate::error::AppError;
    use crate::repository::audit::MockAuditRepository;

    fn entry(action: AuditAction) -> AuditEntry {
        AuditEntry::for_profile(&Profile::default(), action)
    }

    #[tokio::test]
    async fn test_worker_writes_queued_entries() {
        let mut mock = MockAuditRepository::new();
        mock.expect_append().times(2).returning(|_| Ok(()));

        let (dispatcher, receiver) = AuditDispatcher::channel(8);
        dispatcher.record(entry(AuditAction::Login));
        dispatcher.record(entry(AuditAction::Logout));
        drop(dispatcher);

        AuditWorker::new(receiver, Arc::new(mock)).run().await;
    }

    #[tokio::test]
    async fn test_worker_survives_write_failure() {
        let mut mock = MockAuditRepository::new();
        let mut calls = 0;
        mock.expect_append().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(AppError::StoreUnavailable("down".to_string()))
            } else {
                Ok(())
            }
        });

        let (dispatcher, receiver) = AuditDispatcher::channel(8);
        dispatcher.record(entry(AuditAction::ImpersonateTenant));
        dispatcher.record(entry(AuditAction::StopImpersonation));
        drop(dispatcher);

        AuditWorker::new(receiver, Arc::new(mock)).run().await;
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        let (dispatcher, mut receiver) = AuditDispatcher::channel(1);
        dispatcher.record(entry(AuditAction::Login));
        dispatcher.record(entry(AuditAction::Logout));

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.action, AuditAction::Login);
        assert!(receiver.try_recv().is_err());
    }
}
