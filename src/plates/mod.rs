pub mod simulation;
pub mod types;

pub use simulation::{pick_weighted, PlateSimulation};
pub use types::{Plate, PlateId, PlateType};
