pub mod budget;
pub mod frame;
pub mod idle;
pub mod throttle;

pub use budget::*;
pub use frame::*;
pub use idle::*;
pub use throttle::*;
