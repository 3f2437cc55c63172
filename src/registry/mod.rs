pub mod capabilities;
pub mod model_key;

pub use capabilities::{
    CapabilityRegistry, ConsistencyIssue, ConsistencyPolicy, ModelSummary, RegistrySummary,
    check_consistency,
};
pub use model_key::{ModelKey, ModelKeyParseError};
