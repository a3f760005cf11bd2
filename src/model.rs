mod config;
mod counts;
mod ids;

pub use self::config::{
    DensityConfig, DisplayMethodConfig, RendererKind, Settings, StylePalette, SuffixEntry,
};
pub use self::counts::{Against, LineDelta, RawCounts};
pub use self::ids::ContextId;
