//! Domain layer: wire records and the state each data source owns.
//!
//! [`Snapshot`] and [`PollState`] belong to the poller; [`LiveBuffer`],
//! [`ConnectionState`] and [`LiveState`] belong to the stream client. Nothing
//! here performs I/O.

pub mod connection_state;
pub mod joined_event;
pub mod live_buffer;
pub mod live_state;
pub mod poll_state;
pub mod snapshot;

pub use connection_state::ConnectionState;
pub use joined_event::JoinedEvent;
pub use live_buffer::{LIVE_BUFFER_CAPACITY, LiveBuffer};
pub use live_state::LiveState;
pub use poll_state::PollState;
pub use snapshot::Snapshot;
