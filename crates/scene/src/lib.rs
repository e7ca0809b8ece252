pub mod chunk;
pub mod fade;
pub mod layout;
pub mod media;
pub mod neighborhood;
pub mod plane;
pub mod visibility;

pub use chunk::*;
pub use fade::*;
pub use layout::*;
pub use media::*;
pub use neighborhood::*;
pub use plane::*;
pub use visibility::*;
