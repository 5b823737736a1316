mod relay_state;

pub use relay_state::*;
