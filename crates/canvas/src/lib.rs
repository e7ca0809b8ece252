pub mod boundary;
pub mod canvas;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod stats;

pub use boundary::*;
pub use canvas::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use input::*;
pub use stats::*;
