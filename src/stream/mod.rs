//! Push-stream layer: event-stream decoding, reconnecting transport, and the
//! client that turns transport events into [`crate::domain::LiveState`].
//!
//! ```text
//! GET /events ──> SseTransport ──mpsc<TransportEvent>──> LiveStreamClient ──watch<LiveState>──> view
//! ```

pub mod client;
pub mod sse;
pub mod transport;

pub use client::LiveStreamClient;
pub use sse::{SseDecoder, SseEvent};
pub use transport::{LiveTransport, SseTransport, TransportEvent};
