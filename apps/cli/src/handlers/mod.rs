pub mod codec;
pub mod defaults;
pub mod diff;
