pub mod error;
pub mod funckeys;
pub mod plan;
pub mod settings;
pub mod types;

pub use error::{ProvisioningError, ProvisioningErrorKind};
pub use funckeys::{MpkLayout, MpkSlot, build_mpk_params, mpk_layout};
pub use plan::{ProvisioningPlan, config_filename, configure};
pub use settings::ProvisioningSettings;
pub use types::{
    DtmfMode, DtmfSettings, FuncKey, FuncKeyType, PValue, RawConfig, SipLine, SipTransport,
};
