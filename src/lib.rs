pub mod config_file;
pub mod display;
pub mod format;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod palette;
pub mod refresh;
pub mod render;
pub mod tui;
pub mod vcs;
