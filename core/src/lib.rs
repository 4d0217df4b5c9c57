//! Synchronous client core for the blog admin service.
//!
//! # Overview
//! Turns the backend's unreliable, inconsistently shaped responses into a
//! coherent session and blog collection. The host supplies the HTTP
//! round-trip through the `Transport` trait; everything here is
//! deterministic and testable with scripted transports.
//!
//! # Design
//! - `BlogClient` is stateless: `build_*` produces requests, `parse_*`
//!   consumes responses (host-does-IO split).
//! - `error::normalize` is the only place that inspects failed responses.
//! - `SessionManager` owns the token; writes borrow it and read the token
//!   when the request is built.
//! - `probe` and `mutation::dual_verb` are pure strategies over an attempt
//!   closure, so retry policy is testable without a network.
//! - `BlogSynchronizer` caches only the last successful list; callers re-list
//!   after every mutation.

pub mod blogs;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mutation;
pub mod probe;
pub mod session;
pub mod types;

pub use blogs::{BlogSynchronizer, SyncState};
pub use client::BlogClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{normalize, ErrorKind, OperationError};
pub use http::{CallOutcome, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use probe::probe;
pub use session::{MemoryStore, Session, SessionManager, SessionStore};
pub use types::{
    parse_tags, Admin, AdminStatus, Blog, BlogDraft, BlogPayload, BootstrapOutcome,
    BootstrapRequest, Credentials,
};
