mod controller;
mod devices;
mod mode_state;
mod track;

pub use controller::*;
pub use devices::*;
pub use mode_state::*;
pub use track::*;
