//! Mock roster loader for testing and development.
//!
//! Simulates the remote allow-list loader: an external collaborator that
//! delivers zero or more text chunks (or a failure), asynchronously, in
//! send order. The engine never performs network I/O itself; the host
//! receives each delivery here and forwards it to the engine's
//! `on_list_delivered` / `on_list_delivery_failed` callbacks sequentially.
//! A delivery that arrives late is still applied; there is no cancellation.

use codelock_core::{Error, Result};
use codelock_engine::KeypadEngine;
use tokio::sync::mpsc;
use tracing::debug;

/// One simulated loader result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterDelivery {
    /// A chunk of roster text arrived.
    Chunk(String),
    /// The fetch failed with a host-reported reason.
    Failure(String),
}

impl RosterDelivery {
    /// Forward this delivery to an engine the way a host would.
    ///
    /// Returns `true` when a chunk delivery auto-granted the current actor.
    pub fn apply(&self, engine: &mut KeypadEngine) -> bool {
        match self {
            RosterDelivery::Chunk(text) => engine.on_list_delivered(text),
            RosterDelivery::Failure(reason) => {
                engine.on_list_delivery_failed(reason);
                false
            }
        }
    }
}

/// Mock roster loader.
///
/// # Examples
///
/// ```
/// use codelock_emulator::{MockRosterLoader, RosterDelivery};
///
/// #[tokio::main]
/// async fn main() -> codelock_core::Result<()> {
///     let (mut loader, handle) = MockRosterLoader::new();
///
///     tokio::spawn(async move {
///         handle.send_chunk("alice,bob").await.unwrap();
///     });
///
///     let delivery = loader.recv().await?;
///     assert_eq!(delivery, RosterDelivery::Chunk("alice,bob".to_string()));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRosterLoader {
    rx: mpsc::Receiver<RosterDelivery>,
}

impl MockRosterLoader {
    /// Create a loader and the handle used to feed it.
    pub fn new() -> (Self, MockRosterHandle) {
        let (tx, rx) = mpsc::channel(32);
        (Self { rx }, MockRosterHandle { tx })
    }

    /// Wait for the next delivery.
    ///
    /// # Errors
    /// Returns `Error::Delivery` when the feeding side has been dropped.
    pub async fn recv(&mut self) -> Result<RosterDelivery> {
        self.rx.recv().await.ok_or_else(|| Error::Delivery {
            message: "roster channel closed".to_string(),
        })
    }

    /// Non-blocking poll for a delivery, for hosts that tick.
    pub fn try_recv(&mut self) -> Option<RosterDelivery> {
        self.rx.try_recv().ok()
    }
}

/// Feeding side of a [`MockRosterLoader`].
#[derive(Debug, Clone)]
pub struct MockRosterHandle {
    tx: mpsc::Sender<RosterDelivery>,
}

impl MockRosterHandle {
    /// Simulate a successful chunk delivery.
    ///
    /// # Errors
    /// Returns `Error::Delivery` when the loader has been dropped.
    pub async fn send_chunk(&self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        debug!(len = text.len(), "mock roster chunk sent");
        self.tx
            .send(RosterDelivery::Chunk(text))
            .await
            .map_err(|_| Error::Delivery {
                message: "roster loader dropped".to_string(),
            })
    }

    /// Simulate a failed fetch.
    ///
    /// # Errors
    /// Returns `Error::Delivery` when the loader has been dropped.
    pub async fn send_failure(&self, reason: impl Into<String>) -> Result<()> {
        self.tx
            .send(RosterDelivery::Failure(reason.into()))
            .await
            .map_err(|_| Error::Delivery {
                message: "roster loader dropped".to_string(),
            })
    }
}
