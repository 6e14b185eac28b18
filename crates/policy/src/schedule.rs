//! Result of a provisioning policy for a single request.

use std::collections::BTreeMap;

use mrprov_cloud::vm_type::VmType;
use serde::{Deserialize, Serialize};

use crate::{
    offer::{OfferId, ResourceOffer},
    task::TaskId,
};

/// Scheduling plan of a request together with the offers it provisions.
///
/// Either covers every task of the job or is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Offer assigned to each task.
    pub scheduling_plan: BTreeMap<TaskId, OfferId>,
    /// Provisioned offers in the order they were assigned.
    pub provision_list: Vec<ResourceOffer>,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.scheduling_plan.is_empty() && self.provision_list.is_empty()
    }

    pub fn clear(&mut self) {
        self.scheduling_plan.clear();
        self.provision_list.clear();
    }

    /// Returns provisioned offer by id.
    pub fn offer(&self, offer_id: OfferId) -> Option<&ResourceOffer> {
        self.provision_list.iter().find(|offer| offer.id == offer_id)
    }

    /// Returns VM type of the offer assigned to a task.
    pub fn vm_type_of(&self, task_id: TaskId) -> Option<&VmType> {
        self.scheduling_plan
            .get(&task_id)
            .and_then(|&offer_id| self.offer(offer_id))
            .map(|offer| &offer.vm_type)
    }

    /// Total price of all provisioned offers per hour.
    pub fn hourly_cost(&self) -> f64 {
        self.provision_list.iter().map(|offer| offer.cost_per_hour()).sum()
    }
}
