//! Request handlers.

pub mod analysis;
pub mod chat;
pub mod health;
pub mod playback;
pub mod uploads;

pub use analysis::*;
pub use chat::*;
pub use health::*;
pub use playback::*;
pub use uploads::*;
