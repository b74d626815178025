use super::Diagnostic;
use crate::record::{Attributes, Record, Table};

/// The defaults derived from a tuning database.
#[derive(new, Clone, Debug, PartialEq)]
pub struct Defaults {
    /// Defaults per device type and vendor.
    pub tier1: Table,
    /// Defaults over all device types and vendors.
    pub tier2: Table,
    /// Issues found while validating the device type/vendor defaults.
    pub diagnostics: Vec<Diagnostic>,
}

impl Defaults {
    /// Concatenate both tiers into a single table, device type/vendor defaults first.
    pub fn into_table(self) -> Table {
        self.tier1.concat(self.tier2)
    }

    /// Find the default of a kernel for a device type and vendor.
    ///
    /// A device type/vendor default is preferred, the default over all devices is returned
    /// otherwise.
    pub fn lookup(
        &self,
        device_vendor: &str,
        device_type: &str,
        kernel: &str,
        kernel_attributes: &Attributes,
        arguments: &Attributes,
    ) -> Option<&Record> {
        let matches_kernel = |record: &&Record| {
            record.kernel == kernel
                && record.kernel_attributes == *kernel_attributes
                && record.arguments == *arguments
        };

        self.tier1
            .iter()
            .filter(matches_kernel)
            .find(|record| {
                record.device_vendor == device_vendor && record.device_type == device_type
            })
            .or_else(|| self.tier2.iter().find(matches_kernel))
    }
}
