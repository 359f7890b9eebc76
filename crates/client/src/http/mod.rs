//! HTTP request execution.

mod pipeline;

pub use pipeline::RequestPipeline;
