//! In-memory asset channel.
//!
//! Stands in for the cross-device data-sync client: assets are published
//! into a shared table and opened as byte cursors. Connect latency and
//! link failures can be simulated so the worker's timeout path is
//! exercisable on the host.

use core::time::Duration;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::app::ports::AssetChannel;
use crate::payload::AssetRef;

/// How `connect` behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Link {
    #[default]
    Up,
    /// Connect resolves to `false` immediately.
    Refused,
    /// Connect never resolves; only a caller-side timeout ends it.
    Unreachable,
}

/// Cloneable handle; clones share the asset table and open counter.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetChannel {
    assets: Arc<Mutex<HashMap<AssetRef, Vec<u8>>>>,
    opens: Arc<AtomicUsize>,
    latency: Duration,
    link: Link,
}

impl MemoryAssetChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = link;
        self
    }

    /// Make `bytes` available under `asset`, replacing any previous bytes.
    pub fn publish(&self, asset: AssetRef, bytes: Vec<u8>) {
        self.table().insert(asset, bytes);
    }

    pub fn contains(&self, asset: &AssetRef) -> bool {
        self.table().contains_key(asset)
    }

    /// Number of `open` calls made through any clone.
    pub fn opened(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }

    fn table(&self) -> MutexGuard<'_, HashMap<AssetRef, Vec<u8>>> {
        // A panicked publisher leaves the map itself consistent.
        self.assets.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AssetChannel for MemoryAssetChannel {
    type Stream = Cursor<Vec<u8>>;

    async fn connect(&mut self) -> bool {
        match self.link {
            Link::Up => {
                if !self.latency.is_zero() {
                    async_io_mini::Timer::after(self.latency).await;
                }
                true
            }
            Link::Refused => false,
            Link::Unreachable => {
                debug!("MemoryAssetChannel: unreachable, connect pending forever");
                futures_lite::future::pending::<bool>().await
            }
        }
    }

    async fn open(&mut self, asset: &AssetRef) -> Option<Self::Stream> {
        self.opens.fetch_add(1, Ordering::Relaxed);
        self.table().get(asset).cloned().map(Cursor::new)
    }
}
