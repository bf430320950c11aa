//! Helix API client.
//!
//! - [`http`]: the HTTP seam ([`HttpClient`]) with a reqwest implementation
//!   and a scripted fake
//! - [`client`]: [`RestClient`] with rate-limit retry and cursor pagination
//! - [`endpoints`]: typed lookups built on those two primitives
//!
//! Calls are made from inside command handlers and block that handler (and
//! so the read loop) for their full duration, backoff included. Bots that
//! need chat to keep flowing during slow lookups should spawn the call on
//! its own task and reply from there through a cloned `ChatSender`.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod types;

pub use client::{RestClient, RetryPolicy};
pub use error::ApiError;
pub use http::{HttpClient, HttpResponse, RecordedRequest, ReqwestHttp, ScriptedHttp};
pub use types::{Chatters, FollowInfo, GameInfo, StreamInfo, UserInfo};
