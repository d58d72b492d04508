//! # order-dashboard
//!
//! Terminal dashboard for a real-time orders × payments join pipeline.
//!
//! Two independent sources feed one view: a snapshot of aggregate counters
//! and recent history, polled every few seconds, and a Server-Sent-Events
//! stream pushing each joined event as it happens. The live stream wins as
//! soon as it has delivered anything; until then the snapshot history fills
//! the table.
//!
//! ## Architecture
//!
//! ```text
//! GET /stats ──> SnapshotPoller ──watch<PollState>──┐
//!                                                   ├──> reconcile ──> ui
//! GET /events ──> SseTransport ──> LiveStreamClient ─┘
//!                              watch<LiveState>
//! ```
//!
//! Both writers run as tasks owned by a [`session::DashboardSession`]; the
//! binary drives everything from a single-threaded runtime.

pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod session;
pub mod stream;
pub mod ui;
