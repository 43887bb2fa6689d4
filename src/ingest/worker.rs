//! Icon worker thread.
//!
//! Runs an [`IconResolver`] in a dedicated thread using `edge-executor`
//! for the task and `async-io-mini` for the connect timeout. Requests arrive
//! through a single-slot [`Signal`]: a newer request overwrites one the
//! worker has not picked up yet, so at most one resolution is ever in
//! flight and stale work is never started.
//!
//! ```text
//!  engine thread                       icon-worker thread
//!  ─────────────                       ──────────────────
//!  submit() ──▶ Signal<Job> ──wait()──▶ resolve_icon()
//!                                            │
//!  poll_icon() ◀── IconSlot::complete() ◀────┘
//! ```

use std::sync::Arc;
use std::thread::JoinHandle;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::{debug, info, warn};

use super::IconResolver;
use crate::app::ports::{AssetChannel, IconDecoder, IconIngestor};
use crate::payload::AssetRef;
use crate::weather::IconSlot;

const WORKER_NAME: &str = "icon-worker";
const WORKER_STACK_KB: usize = 64;

enum Job {
    Resolve { asset: AssetRef, slot: Arc<IconSlot> },
    Stop,
}

type JobSignal = Signal<CriticalSectionRawMutex, Job>;

/// Handle to the icon worker thread.
///
/// Dropping the handle asks the thread to stop without waiting for it;
/// use [`shutdown`](Self::shutdown) to join.
pub struct IconWorker {
    jobs: Arc<JobSignal>,
    handle: Option<JoinHandle<()>>,
}

impl IconWorker {
    /// Start the worker thread. Fails only if the OS refuses the thread.
    pub fn spawn<C, D>(resolver: IconResolver<C, D>) -> std::io::Result<Self>
    where
        C: AssetChannel + Send + 'static,
        D: IconDecoder + Send + 'static,
    {
        let jobs = Arc::new(JobSignal::new());
        let worker_jobs = Arc::clone(&jobs);

        info!("Spawning '{}' (stack={}KB)", WORKER_NAME, WORKER_STACK_KB);
        let handle = std::thread::Builder::new()
            .name(WORKER_NAME.into())
            .stack_size(WORKER_STACK_KB * 1024)
            .spawn(move || run_worker(resolver, &worker_jobs))?;

        Ok(Self {
            jobs,
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it. An in-flight resolution finishes
    /// first (bounded by the connect timeout).
    pub fn shutdown(mut self) {
        self.jobs.signal(Job::Stop);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("{}: thread panicked", WORKER_NAME);
            }
        }
    }
}

impl IconIngestor for IconWorker {
    fn submit(&mut self, asset: AssetRef, slot: Arc<IconSlot>) {
        if self.jobs.signaled() {
            debug!("{}: superseding queued request with {}", WORKER_NAME, asset);
        }
        self.jobs.signal(Job::Resolve { asset, slot });
    }
}

impl Drop for IconWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.jobs.signal(Job::Stop);
        }
    }
}

fn run_worker<C: AssetChannel, D: IconDecoder>(resolver: IconResolver<C, D>, jobs: &JobSignal) {
    let executor: edge_executor::LocalExecutor<'_, 1> = edge_executor::LocalExecutor::new();
    let task = executor.spawn(worker_loop(resolver, jobs));
    futures_lite::future::block_on(executor.run(task));
    info!("{}: stopped", WORKER_NAME);
}

async fn worker_loop<C: AssetChannel, D: IconDecoder>(
    mut resolver: IconResolver<C, D>,
    jobs: &JobSignal,
) {
    loop {
        let (asset, slot) = match jobs.wait().await {
            Job::Stop => return,
            Job::Resolve { asset, slot } => (asset, slot),
        };
        if !slot.is_alive() {
            debug!("{}: engine gone, skipping {}", WORKER_NAME, asset);
            continue;
        }

        let icon = match resolver.resolve_icon(&asset).await {
            Ok(icon) => icon,
            Err(e) => {
                warn!("{}: {} ({})", WORKER_NAME, e, asset);
                None
            }
        };
        if slot.complete(icon) {
            info!("{}: icon {} ready", WORKER_NAME, asset);
        }
    }
}
