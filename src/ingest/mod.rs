//! Icon ingestion: turns an [`AssetRef`] from a weather payload into a
//! decoded [`Icon`].
//!
//! [`IconResolver`] walks the fixed pipeline; [`worker::IconWorker`] runs it
//! off the render path on a dedicated thread.
//!
//! ```text
//!   AssetRef ──▶ validate ──▶ connect (≤ timeout) ──▶ open ──▶ read ──▶ decode
//!                  │               │                   │                 │
//!             InvalidAsset   ChannelTimeout     AssetUnavailable     Ok(None)
//! ```

pub mod worker;

use core::time::Duration;
use std::io::Read;

use futures_lite::future;
use log::{debug, warn};

use crate::app::ports::{AssetChannel, IconDecoder};
use crate::error::IngestError;
use crate::payload::AssetRef;
use crate::weather::{Icon, MAX_ICON_DIM};

/// Channel handshake bound used when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest asset read from the channel: a full-size 32-bit bitmap plus
/// header room. Anything bigger could never decode.
pub const MAX_ASSET_BYTES: u64 = (MAX_ICON_DIM as u64).pow(2) * 4 + 1024;

/// Resolves icon assets through a channel and decoder.
pub struct IconResolver<C, D> {
    channel: C,
    decoder: D,
    connect_timeout: Duration,
    max_asset_bytes: u64,
}

impl<C: AssetChannel, D: IconDecoder> IconResolver<C, D> {
    pub fn new(channel: C, decoder: D) -> Self {
        Self {
            channel,
            decoder,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_asset_bytes: MAX_ASSET_BYTES,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_asset_bytes(mut self, limit: u64) -> Self {
        self.max_asset_bytes = limit;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Fetch and decode one icon.
    ///
    /// A corrupt image is not an error: it resolves to `Ok(None)` so the
    /// caller keeps its previous icon.
    pub async fn resolve_icon(&mut self, asset: &AssetRef) -> Result<Option<Icon>, IngestError> {
        if asset.is_empty() {
            warn!("Ingest: empty asset reference");
            return Err(IngestError::InvalidAsset);
        }

        let timeout = self.connect_timeout;
        let connected = future::or(self.channel.connect(), async move {
            async_io_mini::Timer::after(timeout).await;
            false
        })
        .await;
        if !connected {
            warn!("Ingest: channel not connected within {:?}", timeout);
            return Err(IngestError::ChannelTimeout);
        }

        let Some(stream) = self.channel.open(asset).await else {
            warn!("Ingest: asset {} unavailable", asset);
            return Err(IngestError::AssetUnavailable);
        };

        // One byte past the limit is enough to tell an oversized asset apart.
        let mut bytes = Vec::new();
        if let Err(e) = stream.take(self.max_asset_bytes + 1).read_to_end(&mut bytes) {
            warn!("Ingest: reading asset {} failed: {}", asset, e);
            return Err(IngestError::AssetUnavailable);
        }
        if bytes.len() as u64 > self.max_asset_bytes {
            warn!(
                "Ingest: asset {} exceeds {} bytes, not decoding",
                asset, self.max_asset_bytes
            );
            return Ok(None);
        }
        debug!("Ingest: {} bytes for {}", bytes.len(), asset);

        match self.decoder.decode(&bytes) {
            Ok(icon) => Ok(Some(icon)),
            Err(e) => {
                warn!("Ingest: {} for asset {}", e, asset);
                Ok(None)
            }
        }
    }
}
