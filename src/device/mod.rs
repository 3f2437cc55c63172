pub mod mac;
pub mod types;
pub mod user_agent;

pub use mac::{MacAddress, MacParseError};
pub use types::{Device, DeviceInfo};
pub use user_agent::extract_device_info;
