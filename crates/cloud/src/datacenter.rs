//! Datacenters of a hybrid cloud.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{user_class::UserClass, vm_type::VmType};

/// Datacenter which can provision any number of instances of each of its VM types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicCloudDatacenter {
    pub name: String,
    pub vm_types: Vec<VmType>,
}

/// Datacenter with a limited number of instances available to each user class.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrivateCloudDatacenter {
    pub name: String,
    pub vm_types: Vec<VmType>,
    /// Maximum number of instances a single request of a given class can use.
    #[serde(default)]
    pub max_vms: BTreeMap<UserClass, usize>,
}

impl PrivateCloudDatacenter {
    /// The first declared VM type, the only one offered to requests.
    pub fn first_vm_type(&self) -> Option<&VmType> {
        self.vm_types.first()
    }

    /// Number of instances of `vm_type` a request of `user_class` can get from this datacenter.
    ///
    /// Returns 0 for VM types the datacenter doesn't offer and for classes without a quota.
    pub fn max_available_resource(&self, vm_type: &VmType, user_class: UserClass) -> usize {
        if !self.vm_types.contains(vm_type) {
            return 0;
        }
        self.max_vms.get(&user_class).copied().unwrap_or(0)
    }
}
