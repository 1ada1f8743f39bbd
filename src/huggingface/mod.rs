pub mod registry;

pub use registry::{HuggingFaceRegistry, NoWeightsRegistry, WeightsRegistry};
