mod engine;
mod engine_config;
mod snapshot;

pub use engine::{ChartEngine, RenderView};
pub use engine_config::ChartEngineConfig;
pub use snapshot::EngineSnapshot;
