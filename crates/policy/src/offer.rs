//! Assignable instances of VM types.

use mrprov_cloud::vm_type::VmType;
use serde::{Deserialize, Serialize};

pub type OfferId = u64;

/// Where an offer comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OfferSource {
    /// Public datacenter with unlimited capacity.
    Public { datacenter: String },
    /// Private datacenter with a per-class quota.
    Private { datacenter: String },
}

/// One instance of a VM type which can be provisioned for a single task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceOffer {
    pub id: OfferId,
    pub vm_type: VmType,
    pub source: OfferSource,
}

impl ResourceOffer {
    pub fn cost_per_hour(&self) -> f64 {
        self.vm_type.cost_per_hour
    }
}
