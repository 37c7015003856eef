mod app;
pub use app::*;

pub mod input;
pub mod toast;

mod window_resizing;
