#![allow(dead_code)]

use tunedb::config::TuneDbConfig;
use tunedb::record::{Attributes, Device, Record, Table};

/// Builds tuning records for a single kernel.
pub struct RecordBuilder {
    device: Device,
    vendor: String,
    device_type: String,
    kernel: String,
    kernel_attributes: Attributes,
    arguments: Attributes,
}

impl RecordBuilder {
    pub fn new(device: &str, vendor: &str) -> Self {
        Self {
            device: Device::new(device.to_string(), 20, 1000),
            vendor: vendor.to_string(),
            device_type: "GPU".to_string(),
            kernel: "Xgemm".to_string(),
            kernel_attributes: Attributes::from([
                ("precision".to_string(), "32".into()),
                ("kernel_family".to_string(), "xgemm".into()),
            ]),
            arguments: Attributes::new(),
        }
    }

    pub fn device_type(mut self, device_type: &str) -> Self {
        self.device_type = device_type.to_string();
        self
    }

    pub fn kernel(mut self, kernel: &str) -> Self {
        self.kernel = kernel.to_string();
        self
    }

    pub fn argument(mut self, name: &str, value: i64) -> Self {
        self.arguments.insert(name.to_string(), value.into());
        self
    }

    pub fn record(&self, parameters: &[(&str, i64)], time: f64) -> Record {
        Record::new(
            self.device.clone(),
            self.vendor.clone(),
            self.device_type.clone(),
            self.kernel.clone(),
            self.kernel_attributes.clone(),
            self.arguments.clone(),
            parameters
                .iter()
                .map(|(name, val)| (name.to_string(), *val))
                .collect(),
            time,
        )
    }
}

/// A small database with two AMD GPUs and one NVIDIA GPU tuned for the same kernel.
pub fn gemm_database() -> Table {
    let tahiti = RecordBuilder::new("Tahiti", "AMD");
    let hawaii = RecordBuilder::new("Hawaii", "AMD");
    let kepler = RecordBuilder::new("Tesla K40m", "NVIDIA");

    Table::new(vec![
        tahiti.record(&[("MWG", 64), ("NWG", 64), ("VWM", 4)], 3.0),
        tahiti.record(&[("MWG", 32), ("NWG", 64), ("VWM", 2)], 4.0),
        tahiti.record(&[("MWG", 128), ("NWG", 32), ("VWM", 8)], 1.5),
        hawaii.record(&[("MWG", 64), ("NWG", 64), ("VWM", 4)], 2.0),
        hawaii.record(&[("MWG", 32), ("NWG", 64), ("VWM", 2)], 2.5),
        hawaii.record(&[("MWG", 64), ("NWG", 128), ("VWM", 2)], 1.0),
        kepler.record(&[("MWG", 128), ("NWG", 128), ("VWM", 1)], 0.5),
        kepler.record(&[("MWG", 64), ("NWG", 64), ("VWM", 4)], 0.8),
    ])
}

pub fn config() -> TuneDbConfig {
    TuneDbConfig::default()
}
