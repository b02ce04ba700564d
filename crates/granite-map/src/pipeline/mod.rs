//! The execution pipeline: normalize the source, interpret the resolved
//! configuration, construct or populate the destination.

mod factory;
mod normalize;
mod transform;

pub use factory::{ObjectFactory, PopulateWarning};
pub use normalize::SourceNormalizer;
pub use transform::DataTransformer;
