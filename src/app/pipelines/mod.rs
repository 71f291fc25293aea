pub mod steam_pipeline;

pub use steam_pipeline::SteamPipeline;
