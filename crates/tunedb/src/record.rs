use core::cmp::Ordering;
use core::fmt::Display;
use core::hash::{Hash, Hasher};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::Column;

/// Named attributes of a record, such as kernel attributes or invocation arguments.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Tunable parameter values of a record, keyed without the `parameters.` prefix.
///
/// A parameter that a kernel doesn't expose is simply absent from the map.
pub type Parameters = BTreeMap<String, i64>;

/// A single attribute value of a tuning record.
///
/// Values are totally ordered so they can be used in grouping keys: integers sort before
/// floats, floats before text, and floats compare with [f64::total_cmp].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// An integer value, e.g. a matrix size or a tunable parameter.
    Int(i64),
    /// A floating point value, e.g. a scalar argument.
    Float(f64),
    /// A textual value, e.g. a kernel family or a precision.
    Text(String),
}

impl AttributeValue {
    fn rank(&self) -> u8 {
        match self {
            AttributeValue::Int(_) => 0,
            AttributeValue::Float(_) => 1,
            AttributeValue::Text(_) => 2,
        }
    }
}

impl Ord for AttributeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (AttributeValue::Int(lhs), AttributeValue::Int(rhs)) => lhs.cmp(rhs),
            (AttributeValue::Float(lhs), AttributeValue::Float(rhs)) => lhs.total_cmp(rhs),
            (AttributeValue::Text(lhs), AttributeValue::Text(rhs)) => lhs.cmp(rhs),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for AttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AttributeValue {}

impl Hash for AttributeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            AttributeValue::Int(val) => val.hash(state),
            AttributeValue::Float(val) => val.to_bits().hash(state),
            AttributeValue::Text(val) => val.hash(state),
        }
    }
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AttributeValue::Int(val) => write!(f, "{val}"),
            AttributeValue::Float(val) => write!(f, "{val:.2}"),
            AttributeValue::Text(val) => f.write_str(val),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Int(value as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

/// The identity of a single tuned device.
#[derive(new, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Device {
    /// The device name as reported by the driver.
    #[serde(rename = "device")]
    pub name: String,
    /// The number of compute units.
    #[serde(rename = "device_compute_units")]
    pub compute_units: u32,
    /// The core clock in MHz.
    #[serde(rename = "device_core_clock")]
    pub core_clock: u32,
}

/// One measured tuning result.
#[derive(new, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The device the measurement was taken on.
    #[serde(flatten)]
    pub device: Device,
    /// The device vendor, e.g. `NVIDIA`.
    pub device_vendor: String,
    /// The device type, e.g. `GPU`.
    pub device_type: String,
    /// The kernel name.
    pub kernel: String,
    /// Kernel-defining attributes such as the precision and the kernel family.
    #[serde(default)]
    pub kernel_attributes: Attributes,
    /// Invocation arguments partitioning the tuning results.
    #[serde(default)]
    pub arguments: Attributes,
    /// The tuned parameter values.
    #[serde(default)]
    pub parameters: Parameters,
    /// The measured execution time, lower is better.
    pub time: f64,
}

impl Record {
    /// The value of the given column, or `None` when the record doesn't populate it.
    pub fn get(&self, column: &Column) -> Option<AttributeValue> {
        match column {
            Column::DeviceName => Some(self.device.name.as_str().into()),
            Column::DeviceVendor => Some(self.device_vendor.as_str().into()),
            Column::DeviceType => Some(self.device_type.as_str().into()),
            Column::DeviceComputeUnits => Some(self.device.compute_units.into()),
            Column::DeviceCoreClock => Some(self.device.core_clock.into()),
            Column::Kernel => Some(self.kernel.as_str().into()),
            Column::KernelAttribute(name) => self.kernel_attributes.get(name).cloned(),
            Column::Argument(name) => self.arguments.get(name).cloned(),
            Column::Parameter(name) => self.parameters.get(name).map(|val| (*val).into()),
            Column::Time => Some(self.time.into()),
        }
    }

    /// Take the column-wise minimum of two records.
    ///
    /// Every column is reduced independently, so the result may combine values that never
    /// appeared together in a single record. Missing values are skipped.
    pub fn column_min(mut self, other: &Record) -> Record {
        self.device.name = min_by_ref(self.device.name, &other.device.name);
        self.device.compute_units = self.device.compute_units.min(other.device.compute_units);
        self.device.core_clock = self.device.core_clock.min(other.device.core_clock);
        self.device_vendor = min_by_ref(self.device_vendor, &other.device_vendor);
        self.device_type = min_by_ref(self.device_type, &other.device_type);
        self.kernel = min_by_ref(self.kernel, &other.kernel);
        merge_min(&mut self.kernel_attributes, &other.kernel_attributes);
        merge_min(&mut self.arguments, &other.arguments);
        merge_min(&mut self.parameters, &other.parameters);
        self.time = self.time.min(other.time);
        self
    }

    /// Whether both records describe the same configuration, ignoring the device identity and
    /// the measured time.
    pub fn same_configuration(&self, other: &Record) -> bool {
        self.device_vendor == other.device_vendor
            && self.device_type == other.device_type
            && self.kernel == other.kernel
            && self.kernel_attributes == other.kernel_attributes
            && self.arguments == other.arguments
            && self.parameters == other.parameters
    }
}

fn min_by_ref<T: Ord + Clone>(current: T, other: &T) -> T {
    if *other < current {
        other.clone()
    } else {
        current
    }
}

fn merge_min<V: Ord + Clone>(target: &mut BTreeMap<String, V>, other: &BTreeMap<String, V>) {
    for (name, value) in other.iter() {
        match target.get_mut(name) {
            Some(current) => {
                if value < current {
                    *current = value.clone();
                }
            }
            None => {
                target.insert(name.clone(), value.clone());
            }
        }
    }
}

/// An unordered collection of [records](Record).
#[derive(new, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// The records of the table.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over the records of the table.
    pub fn iter(&self) -> core::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// The number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record to the table.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Row-wise concatenation of two tables.
    pub fn concat(mut self, other: Table) -> Table {
        self.records.extend(other.records);
        self
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Table {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = core::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
