pub mod backend;
pub mod cache;
pub mod progress;
pub mod request;
pub mod residency;
pub mod stream;
pub mod texture;

pub use backend::*;
pub use cache::*;
pub use progress::*;
pub use request::*;
pub use residency::*;
pub use stream::*;
pub use texture::*;
