use core::fmt::Display;

use crate::record::Table;
use crate::schema::{Schema, group_by};

/// A non-fatal issue found while computing defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A kernel has more than one device type/vendor default, one per argument value.
    ///
    /// A consumer can't know which one to pick without matching the arguments.
    AmbiguousArguments {
        /// The kernel name.
        kernel: String,
        /// The device vendor.
        device_vendor: String,
        /// The device type.
        device_type: String,
        /// The number of defaults found for that kernel.
        defaults: usize,
    },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Diagnostic::AmbiguousArguments {
                kernel,
                device_vendor,
                device_type,
                defaults,
            } => write!(
                f,
                "Entries for a single kernel with multiple argument values: {kernel} {device_vendor} ({device_type}, {defaults} defaults)"
            ),
        }
    }
}

/// Check that every device type/vendor default is unique for its kernel.
///
/// Returns a diagnostic for each kernel group holding more than one default.
pub fn check_consistency(defaults: &Table, schema: &Schema) -> Vec<Diagnostic> {
    group_by(defaults, &schema.kernel_grouping())
        .into_values()
        .filter(|group| group.len() != 1)
        .map(|group| {
            // Rows of a group share the kernel and the device type/vendor.
            let first = group[0];
            Diagnostic::AmbiguousArguments {
                kernel: first.kernel.clone(),
                device_vendor: first.device_vendor.clone(),
                device_type: first.device_type.clone(),
                defaults: group.len(),
            }
        })
        .collect()
}
