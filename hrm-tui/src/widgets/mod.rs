//! Reusable widget components.

pub mod detail;
pub mod progress;

pub use detail::DetailPanel;
pub use progress::ProgressBar;
