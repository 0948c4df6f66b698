pub mod shaper_pipeline;

pub use shaper_pipeline::ShaperPipeline;
