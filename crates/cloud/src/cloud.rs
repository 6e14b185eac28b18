//! Snapshot of all datacenters available to the provisioning policies.

use serde::{Deserialize, Serialize};

use crate::{
    datacenter::{PrivateCloudDatacenter, PublicCloudDatacenter},
    error::CatalogError,
    vm_type::VmType,
};

/// Resource catalog. Read-only for the policies, so one snapshot can be shared between concurrent requests.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cloud {
    #[serde(default)]
    pub public_datacenters: Vec<PublicCloudDatacenter>,
    #[serde(default)]
    pub private_datacenters: Vec<PrivateCloudDatacenter>,
}

impl Cloud {
    /// Checks that every VM type has a finite non-negative price and positive speed and bandwidth.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let all_vm_types = self
            .public_datacenters
            .iter()
            .flat_map(|dc| dc.vm_types.iter().map(move |vm_type| (&dc.name, vm_type)))
            .chain(
                self.private_datacenters
                    .iter()
                    .flat_map(|dc| dc.vm_types.iter().map(move |vm_type| (&dc.name, vm_type))),
            );
        for (datacenter, vm_type) in all_vm_types {
            if let Some(reason) = invalid_reason(vm_type) {
                return Err(CatalogError::InvalidVmType {
                    datacenter: datacenter.clone(),
                    name: vm_type.name.clone(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

fn invalid_reason(vm_type: &VmType) -> Option<&'static str> {
    if !vm_type.cost_per_hour.is_finite() || vm_type.cost_per_hour < 0.0 {
        Some("cost per hour must be finite and non-negative")
    } else if vm_type.mips.is_nan() || vm_type.mips <= 0.0 {
        Some("mips must be positive")
    } else if vm_type.bandwidth.is_nan() || vm_type.bandwidth <= 0.0 {
        Some("bandwidth must be positive")
    } else {
        None
    }
}
