pub mod core;
pub mod input;
pub mod playback;
pub mod sender;
pub mod store;
