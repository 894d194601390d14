pub mod signal;
pub mod time;
