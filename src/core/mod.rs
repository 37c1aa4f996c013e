pub mod coordinate;
pub mod route;

pub use coordinate::Coordinate;
pub use route::{InstructionTrigger, Route};
