pub mod credential;
pub mod message;
pub mod position;
pub mod strategy;
pub mod symbol;

pub use credential::*;
pub use message::*;
pub use position::*;
pub use strategy::*;
pub use symbol::*;
