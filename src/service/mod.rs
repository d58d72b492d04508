//! Service layer: snapshot polling and view reconciliation.

pub mod poller;
pub mod reconciler;

pub use poller::{HttpSnapshotSource, SnapshotPoller, SnapshotSource};
pub use reconciler::{DisplayList, DisplaySource, RECENT_WINDOW, RowKey, reconcile};
