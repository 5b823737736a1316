mod frame_log;
mod ws_handler;

pub use frame_log::*;
pub use ws_handler::*;
