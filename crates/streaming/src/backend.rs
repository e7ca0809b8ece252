use foundation::ids::TextureId;

use crate::request::LoadTicket;
use crate::texture::{DecodedImage, Sampling};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    Network(String),
    Decode(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "image fetch failed: {msg}"),
            LoadError::Decode(msg) => write!(f, "image decode failed: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Completion of a load started with [`TextureBackend::begin_load`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub url: String,
    pub result: Result<DecodedImage, LoadError>,
}

/// The platform side of texture streaming: fetch/decode, GPU upload, disposal.
///
/// Loads are asynchronous: `begin_load` must not block, and results are
/// collected by the stream through `poll_loads` once per frame.
pub trait TextureBackend {
    fn begin_load(&mut self, ticket: LoadTicket, url: &str);

    /// Completed loads since the last poll, in completion order.
    fn poll_loads(&mut self) -> Vec<LoadOutcome>;

    /// Abandon an in-flight load. The backend may still report it; the stream
    /// discards outcomes it no longer tracks.
    fn cancel_load(&mut self, _ticket: LoadTicket) {}

    /// Make a decoded image resident under `id` with the given sampling state.
    fn upload(&mut self, id: TextureId, image: &DecodedImage, sampling: &Sampling);

    /// Release the native resources behind `id`.
    fn dispose(&mut self, id: TextureId);
}
