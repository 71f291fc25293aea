// Application layer: concrete pipelines wiring adapters into the core.

pub mod pipelines;
