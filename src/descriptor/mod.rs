pub mod error;
pub mod flag;
pub mod loader;
pub mod types;

pub use error::{DescriptorError, DescriptorErrorKind};
pub use flag::Flag;
pub use loader::{load_descriptor, parse_descriptor};
pub use types::{Capability, CapabilityTable, Descriptor};

/// Grandstream GXP21xx descriptor for firmware 1.0.11.48, shipped with the binary.
pub const BUNDLED_DESCRIPTOR: &str =
    include_str!("../../plugins/grandstream-1.0.11.48/plugin-info.json");
