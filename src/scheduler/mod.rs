//! Drives collection passes on a timer and on operator request.
//!
//! One task owns the [`Snapshot`] and the [`AlertSink`]. Timer ticks and
//! manual requests are served by that task one at a time, so passes never
//! overlap and the snapshot has a single writer. Requests that arrive during a
//! pass wait in the channel and are served in order.

use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant};

use crate::alerts::{AlertSink, Thresholds};
use crate::collectors::Collector;
use crate::error::MonitorError;
use crate::models::{AlertEvent, MetricReading, Severity, Snapshot};
use crate::report::Report;

enum Request {
    Refresh(oneshot::Sender<()>),
    Run(oneshot::Sender<Report>),
}

pub struct Monitor {
    collectors: Vec<Arc<dyn Collector>>,
    thresholds: Thresholds,
    sink: AlertSink,
    snapshot: Snapshot,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    poll_interval: Duration,
}

impl Monitor {
    pub fn new(
        mut collectors: Vec<Arc<dyn Collector>>,
        thresholds: Thresholds,
        sink: AlertSink,
        poll_interval: Duration,
    ) -> Self {
        collectors.sort_by_key(|c| c.domain());
        let (snapshot_tx, _) = watch::channel(Arc::new(Snapshot::default()));
        Self {
            collectors,
            thresholds,
            sink,
            snapshot: Snapshot::default(),
            snapshot_tx,
            poll_interval,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// One full pass: collect everything, raise alerts in domain order, then
    /// publish the readings.
    pub async fn run_pass(&mut self) -> Vec<MetricReading> {
        let start = std::time::Instant::now();

        let handles: Vec<_> = self
            .collectors
            .iter()
            .map(|collector| {
                let collector = Arc::clone(collector);
                let domain = collector.domain();
                (domain, tokio::spawn(async move { collector.collect().await }))
            })
            .collect();

        let mut readings = Vec::with_capacity(handles.len());
        for (domain, handle) in handles {
            let reading = match handle.await {
                Ok(reading) => reading,
                Err(e) => {
                    error!("{:?} collector aborted: {}", domain, e);
                    MetricReading::failed(domain, format!("collector aborted: {}", e))
                }
            };
            readings.push(reading);
        }

        for reading in &readings {
            for event in self.thresholds.assess(reading) {
                self.sink.emit(&event);
            }
        }

        for reading in &readings {
            self.snapshot.apply(reading.clone());
        }
        self.snapshot_tx.send_replace(Arc::new(self.snapshot.clone()));

        debug!("pass took: {} ms", start.elapsed().as_millis());
        readings
    }

    /// Manual "Run": a pass whose readings come back as one report.
    pub async fn run_report(&mut self) -> Report {
        Report::new(self.run_pass().await)
    }

    /// Serve ticks and requests until every handle is dropped.
    async fn run(mut self, mut requests: mpsc::Receiver<Request>) {
        info!(
            "Monitoring {} domains every {}s",
            self.collectors.len(),
            self.poll_interval.as_secs()
        );
        self.sink.emit(&AlertEvent::new(
            Severity::Info,
            None,
            "System monitoring started",
        ));

        let mut next_tick = Instant::now();
        loop {
            tokio::select! {
                _ = time::sleep_until(next_tick) => {
                    debug!("Timer pass");
                    self.run_pass().await;
                    // Re-arm only once the pass is done so slow passes never overlap.
                    next_tick = Instant::now() + self.poll_interval;
                }
                request = requests.recv() => match request {
                    Some(Request::Refresh(reply)) => {
                        debug!("Manual refresh");
                        self.run_pass().await;
                        let _ = reply.send(());
                    }
                    Some(Request::Run(reply)) => {
                        debug!("Manual run");
                        let report = self.run_report().await;
                        let _ = reply.send(report);
                    }
                    None => break,
                },
            }
        }
        info!("Monitor stopped");
    }

    /// Move the monitor onto its own task.
    pub fn spawn(self) -> MonitorHandle {
        let (requests_tx, requests_rx) = mpsc::channel(8);
        let snapshot_rx = self.subscribe();
        tokio::spawn(self.run(requests_rx));
        MonitorHandle {
            requests: requests_tx,
            snapshot_rx,
        }
    }
}

/// Operator side of a spawned [`Monitor`].
#[derive(Clone)]
pub struct MonitorHandle {
    requests: mpsc::Sender<Request>,
    snapshot_rx: watch::Receiver<Arc<Snapshot>>,
}

impl MonitorHandle {
    /// Run a pass now and wait for it. The pending timer is left as is.
    pub async fn refresh(&self) -> Result<(), MonitorError> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(Request::Refresh(tx))
            .await
            .map_err(|_| MonitorError::Stopped)?;
        rx.await.map_err(|_| MonitorError::Stopped)
    }

    /// Run a pass now and return its consolidated report.
    pub async fn run_report(&self) -> Result<Report, MonitorError> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(Request::Run(tx))
            .await
            .map_err(|_| MonitorError::Stopped)?;
        rx.await.map_err(|_| MonitorError::Stopped)
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot_rx.clone()
    }
}
