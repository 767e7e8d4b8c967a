//! # animhub-render
//!
//! Turns an uploaded vector asset into a video: a descriptor is generated
//! from a fixed template, handed to the external renderer under a hard
//! deadline, and the resulting artifact is located by job identifier.

pub mod descriptor;
pub mod error;
pub mod executor;
pub mod models;
pub mod processor;

pub use descriptor::DescriptorGenerator;
pub use error::RenderError;
pub use executor::RenderDispatcher;
pub use models::{RenderOutcome, RenderParameters, RenderedVideo, ScaleHint};
pub use processor::RenderPipeline;
