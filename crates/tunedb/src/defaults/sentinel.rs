use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Values stamped on derived records to mark them as fallbacks rather than measurements.
#[derive(new, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinels {
    /// Device name of every default.
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Vendor of the defaults over all vendors.
    #[serde(default = "default_vendor")]
    pub vendor: String,
    /// Device type of the defaults over all device types.
    #[serde(default = "default_device_type")]
    pub device_type: String,
}

/// Default device name sentinel.
pub const DEVICE_NAME_DEFAULT: &str = "default";
/// Default vendor sentinel.
pub const VENDOR_DEFAULT: &str = "default";
/// Default device type sentinel.
pub const DEVICE_TYPE_DEFAULT: &str = "All";

fn default_device_name() -> String {
    DEVICE_NAME_DEFAULT.to_string()
}

fn default_vendor() -> String {
    VENDOR_DEFAULT.to_string()
}

fn default_device_type() -> String {
    DEVICE_TYPE_DEFAULT.to_string()
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            vendor: default_vendor(),
            device_type: default_device_type(),
        }
    }
}

impl Sentinels {
    /// Stamp the device identity and the time of a device type/vendor default.
    pub fn stamp_default(&self, mut record: Record) -> Record {
        record.device.name = self.device_name.clone();
        record.device.compute_units = 0;
        record.device.core_clock = 0;
        record.time = 0.0;
        record
    }

    /// Stamp a default valid for every device type and vendor.
    pub fn stamp_global(&self, mut record: Record) -> Record {
        record.device_vendor = self.vendor.clone();
        record.device_type = self.device_type.clone();
        self.stamp_default(record)
    }
}
