//! Engine transport for Scenewright.
//!
//! The engine is a separately running process with an HTTP listener. Every
//! call goes through [`EngineTransport::send`], which never fails: transport
//! problems come back as an [`EngineReply`] with `success == false` so the
//! model can read them and adapt.
//!
//! - [`command`] — the closed set of engine commands and their payloads
//! - [`reply`] — the normalized `{success, data | error}` record
//! - [`http`] — in-process HTTP client strategy
//! - [`curl`] — process-spawned `curl` strategy

pub mod command;
pub mod curl;
pub mod http;
pub mod reply;
pub mod transport;

pub use command::{Color, EngineCommand, LightingPreset, Scale, SpawnPayload, Vec3};
pub use curl::CurlTransport;
pub use http::HttpTransport;
pub use reply::EngineReply;
pub use transport::{build_transport, EngineError, EngineTransport};
