mod normalizer;
mod params;

pub use normalizer::{normalize, Normalizer};
pub use params::{keys, NormalizedParameters, ParamValue};
