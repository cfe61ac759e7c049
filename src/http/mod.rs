//! HTTP plumbing shared by entity refreshes and page fetches.
//!
//! The core only ever talks to a [`Requester`], which pairs a [`Transport`]
//! with a [`HeaderProvider`]. Swapping the transport is how tests script
//! responses without a network.

mod headers;
#[cfg(test)]
pub(crate) mod mock;
mod requester;
mod transport;

pub use headers::{HeaderProvider, Headers, SessionHeaders, StaticHeaders};
pub use requester::Requester;
pub use transport::{HttpResponse, Method, Params, ReqwestTransport, Transport};
