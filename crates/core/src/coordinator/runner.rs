//! Session coordinator implementation.
//!
//! Opens the connections a run needs up front (one per session, or one
//! shared; only the first when concurrency is capped), then spawns every
//! session as its own task and joins them all.
//! A failing or panicking session never affects its siblings.

use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::bus::{BusConnector, ConnectError, ThumbnailerBus};
use crate::config::{Config, Topology};
use crate::session::{Progress, RequestSession, SessionOptions, SessionReport};
use crate::target::FileTarget;

use super::types::BatchReport;

pub struct SessionCoordinator {
    connector: Arc<dyn BusConnector>,
    options: SessionOptions,
    topology: Topology,
    max_concurrent: usize,
    progress: Option<mpsc::Sender<Progress>>,
}

impl SessionCoordinator {
    pub fn new(connector: Arc<dyn BusConnector>, config: &Config) -> Self {
        Self {
            connector,
            options: SessionOptions::from_config(config),
            topology: config.session.topology,
            max_concurrent: config.session.max_concurrent_sessions,
            progress: None,
        }
    }

    /// Replaces the per-session options derived from the config.
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Sends coordinator and session progress to `tx`.
    pub fn with_progress(mut self, tx: mpsc::Sender<Progress>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Runs one session per target and waits for all of them.
    ///
    /// Only a connection failure before any session starts fails the run as
    /// a whole; every per-file failure ends up in the returned report.
    pub async fn run(&self, targets: Vec<FileTarget>) -> Result<BatchReport, ConnectError> {
        if targets.is_empty() {
            return Ok(BatchReport::default());
        }

        let limit = (self.max_concurrent > 0).then(|| Arc::new(Semaphore::new(self.max_concurrent)));
        // With a limit, isolated sessions connect once they hold a permit.
        let deferred = self.topology == Topology::Isolated && limit.is_some();
        let buses = self.open_connections(targets.len(), deferred).await?;
        let connections = match self.topology {
            Topology::Isolated => buses.iter().flatten().count(),
            Topology::Shared => 1,
        };
        info!(
            sessions = targets.len(),
            connections,
            topology = ?self.topology,
            bus = buses.iter().flatten().next().map(|bus| bus.name()).unwrap_or_default(),
            max_concurrent = self.max_concurrent,
            "Starting sessions"
        );
        if let Some(tx) = &self.progress {
            let _ = tx.send(Progress::Connected { connections }).await;
        }

        let mut tasks = JoinSet::new();
        for (index, (target, bus)) in targets.iter().cloned().zip(buses).enumerate() {
            // An already open connection takes its permit before the others start.
            let held = match (&limit, &bus) {
                (Some(limit), Some(_)) if deferred => Arc::clone(limit).acquire_owned().await.ok(),
                _ => None,
            };
            let limit = limit.clone();
            let connector = Arc::clone(&self.connector);
            let options = self.options.clone();
            let progress = self.progress.clone();
            tasks.spawn(async move {
                let _permit = match (held, limit) {
                    (Some(permit), _) => Some(permit),
                    (None, Some(limit)) => limit.acquire_owned().await.ok(),
                    (None, None) => None,
                };
                let bus = match bus {
                    Some(bus) => bus,
                    None => match connector.connect().await {
                        Ok(bus) => bus,
                        Err(e) => {
                            warn!(path = %target.path.display(), error = %e, "Connection failed");
                            return (index, SessionReport::failed(target.path, e.into()));
                        }
                    },
                };
                let mut session = RequestSession::new(target, bus, options);
                if let Some(tx) = progress {
                    session = session.with_progress(tx);
                }
                (index, session.run().await)
            });
        }

        let mut slots: Vec<Option<SessionReport>> = vec![None; targets.len()];
        let mut join_failure = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => slots[index] = Some(report),
                Err(e) => {
                    error!(error = %e, "Session task failed");
                    join_failure = Some(e.to_string());
                }
            }
        }

        let reports = slots
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| {
                slot.unwrap_or_else(|| {
                    let reason = join_failure
                        .clone()
                        .unwrap_or_else(|| "session task did not complete".to_string());
                    SessionReport::aborted(target.path, reason)
                })
            })
            .collect();

        let batch = BatchReport { reports };
        info!(
            succeeded = batch.succeeded().count(),
            failed = batch.reports.len() - batch.succeeded().count(),
            "All sessions finished"
        );
        Ok(batch)
    }

    /// Opens the connections sessions start with. When `deferred`, only the
    /// first is opened here, so an unreachable bus still fails the run early.
    async fn open_connections(
        &self,
        sessions: usize,
        deferred: bool,
    ) -> Result<Vec<Option<Arc<dyn ThumbnailerBus>>>, ConnectError> {
        match self.topology {
            Topology::Isolated if deferred => {
                let first = self.connector.connect().await?;
                let mut buses = vec![Some(first)];
                buses.resize_with(sessions, || None);
                Ok(buses)
            }
            Topology::Isolated => {
                let buses = try_join_all((0..sessions).map(|_| self.connector.connect())).await?;
                Ok(buses.into_iter().map(Some).collect())
            }
            Topology::Shared => {
                let bus = self.connector.connect().await?;
                Ok(vec![Some(bus); sessions])
            }
        }
    }
}
