pub mod generator;
pub mod prompts;
pub mod validator;

pub use generator::{InsightGenerator, LocationInsights, PropertyInsights};
pub use validator::{validate_analysis, validate_trends, RawOutput};
