//! Model of a VM type offered by a datacenter.

use serde::{Deserialize, Serialize};

/// VM type offered by a datacenter at a fixed hourly price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VmType {
    /// Name of the type, unique within a datacenter.
    pub name: String,
    /// Price of one instance per hour.
    pub cost_per_hour: f64,
    /// Processing speed in millions of instructions per second.
    pub mips: f64,
    /// Bandwidth available to an instance, in megabytes per second.
    pub bandwidth: f64,
}

impl VmType {
    /// Creates new VM type.
    pub fn new(name: impl Into<String>, cost_per_hour: f64, mips: f64, bandwidth: f64) -> Self {
        VmType {
            name: name.into(),
            cost_per_hour,
            mips,
            bandwidth,
        }
    }
}
