use core::fmt::Display;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{AttributeValue, Record};

/// A column of the tuning database.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// The device name.
    DeviceName,
    /// The device vendor.
    DeviceVendor,
    /// The device type.
    DeviceType,
    /// The number of compute units of the device.
    DeviceComputeUnits,
    /// The core clock of the device.
    DeviceCoreClock,
    /// The kernel name.
    Kernel,
    /// A kernel-defining attribute.
    KernelAttribute(String),
    /// An invocation argument.
    Argument(String),
    /// A tunable parameter.
    Parameter(String),
    /// The measured execution time.
    Time,
}

impl Display for Column {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Column::DeviceName => f.write_str("device"),
            Column::DeviceVendor => f.write_str("device_vendor"),
            Column::DeviceType => f.write_str("device_type"),
            Column::DeviceComputeUnits => f.write_str("device_compute_units"),
            Column::DeviceCoreClock => f.write_str("device_core_clock"),
            Column::Kernel => f.write_str("kernel"),
            Column::KernelAttribute(name) => f.write_str(name),
            Column::Argument(name) => f.write_str(name),
            Column::Parameter(name) => write!(f, "parameters.{name}"),
            Column::Time => f.write_str("time"),
        }
    }
}

/// The fixed attribute sets of the tuning database.
///
/// Device columns are the same for every database, the kernel and argument attribute names
/// depend on the library that produced the database.
#[derive(new, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Names of the kernel-defining attributes.
    #[serde(default = "default_kernel_attributes")]
    pub kernel_attributes: Vec<String>,
    /// Names of the argument attributes that partition tuning results.
    #[serde(default = "default_argument_attributes")]
    pub argument_attributes: Vec<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            kernel_attributes: default_kernel_attributes(),
            argument_attributes: default_argument_attributes(),
        }
    }
}

fn default_kernel_attributes() -> Vec<String> {
    ["precision", "kernel_family"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_argument_attributes() -> Vec<String> {
    [
        "arg_m",
        "arg_n",
        "arg_k",
        "arg_alpha",
        "arg_beta",
        "arg_from",
        "arg_to",
        "arg_step",
        "arg_channels",
        "arg_height",
        "arg_width",
        "arg_kernel_h",
        "arg_kernel_w",
        "arg_num_kernels",
        "arg_batch_count",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Schema {
    /// Columns identifying a single device.
    pub fn device_columns() -> Vec<Column> {
        vec![
            Column::DeviceName,
            Column::DeviceCoreClock,
            Column::DeviceComputeUnits,
        ]
    }

    /// Columns identifying a device family, e.g. AMD GPUs.
    pub fn device_type_columns() -> Vec<Column> {
        vec![Column::DeviceVendor, Column::DeviceType]
    }

    /// Kernel attribute columns followed by the kernel name.
    pub fn kernel_columns(&self) -> Vec<Column> {
        self.kernel_attributes
            .iter()
            .cloned()
            .map(Column::KernelAttribute)
            .chain([Column::Kernel])
            .collect()
    }

    /// Argument attribute columns.
    pub fn argument_columns(&self) -> Vec<Column> {
        self.argument_attributes
            .iter()
            .cloned()
            .map(Column::Argument)
            .collect()
    }

    /// Every column identifying a measurement except its parameters.
    pub fn identity_columns(&self) -> Vec<Column> {
        let mut columns = Self::device_columns();
        columns.extend(Self::device_type_columns());
        columns.extend(self.kernel_columns());
        columns.extend(self.argument_columns());
        columns
    }

    /// Grouping used for the device type/vendor defaults.
    pub fn type_vendor_grouping(&self) -> Vec<Column> {
        let mut columns = Self::device_type_columns();
        columns.extend(self.kernel_columns());
        columns.extend(self.argument_columns());
        columns
    }

    /// Grouping used to validate that a kernel has a single default per device type/vendor.
    pub fn kernel_grouping(&self) -> Vec<Column> {
        let mut columns = Self::device_type_columns();
        columns.extend(self.kernel_columns());
        columns
    }

    /// Grouping used for the defaults over all device types and vendors.
    pub fn global_grouping(&self) -> Vec<Column> {
        let mut columns = self.kernel_columns();
        columns.extend(self.argument_columns());
        columns
    }
}

/// The composite key of a group: the value of every grouping column, in grouping order.
///
/// A column a record doesn't populate is part of the key as `None`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    entries: Vec<(Column, Option<AttributeValue>)>,
}

impl GroupKey {
    /// Compute the key of a record for the given columns.
    pub fn of(record: &Record, columns: &[Column]) -> Self {
        Self {
            entries: columns
                .iter()
                .map(|column| (column.clone(), record.get(column)))
                .collect(),
        }
    }

    /// The value of a column in this key.
    pub fn get(&self, column: &Column) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(col, _)| col == column)
            .and_then(|(_, val)| val.as_ref())
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (column, value) in self.entries.iter() {
            // Unpopulated columns only add noise.
            let Some(value) = value else {
                continue;
            };
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{column}={value}")?;
            first = false;
        }

        Ok(())
    }
}

/// Group records by the values of the given columns.
///
/// Groups are returned in key order so that iteration is deterministic.
pub fn group_by<'a, I>(records: I, columns: &[Column]) -> BTreeMap<GroupKey, Vec<&'a Record>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups = BTreeMap::<GroupKey, Vec<&'a Record>>::new();

    for record in records {
        groups
            .entry(GroupKey::of(record, columns))
            .or_default()
            .push(record);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Attributes, Device};

    fn record(vendor: &str, kernel: &str, arg_m: Option<i64>) -> Record {
        let mut arguments = Attributes::new();
        if let Some(arg_m) = arg_m {
            arguments.insert("arg_m".to_string(), arg_m.into());
        }

        Record::new(
            Device::new("device".to_string(), 8, 1000),
            vendor.to_string(),
            "GPU".to_string(),
            kernel.to_string(),
            Attributes::from([("precision".to_string(), "32".into())]),
            arguments,
            Default::default(),
            1.0,
        )
    }

    #[test]
    fn group_by_splits_on_every_column() {
        let records = [
            record("AMD", "Xgemm", Some(256)),
            record("AMD", "Xgemm", Some(256)),
            record("AMD", "Xgemm", Some(1024)),
            record("NVIDIA", "Xgemm", Some(256)),
        ];
        let schema = Schema::default();

        let groups = group_by(&records, &schema.type_vendor_grouping());

        let sizes = groups.values().map(Vec::len).collect::<Vec<_>>();
        assert_eq!(sizes, vec![2, 1, 1]);
    }

    #[test]
    fn missing_attributes_form_their_own_group() {
        let records = [
            record("AMD", "Xgemm", Some(256)),
            record("AMD", "Xgemm", None),
        ];
        let schema = Schema::default();

        let groups = group_by(&records, &schema.global_grouping());

        assert_eq!(groups.len(), 2);
        let first = groups.keys().next().unwrap();
        assert_eq!(first.get(&Column::Argument("arg_m".to_string())), None);
    }

    #[test]
    fn group_key_display_skips_missing_columns() {
        let record = record("AMD", "Xgemm", Some(256));
        let schema = Schema::new(
            vec!["precision".to_string()],
            vec!["arg_m".to_string(), "arg_n".to_string()],
        );

        let key = GroupKey::of(&record, &schema.type_vendor_grouping());

        assert_eq!(
            key.to_string(),
            "device_vendor=AMD, device_type=GPU, precision=32, kernel=Xgemm, arg_m=256"
        );
    }
}
