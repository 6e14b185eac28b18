//! Candidate pool of offers considered for a request.

use mrprov_cloud::{cloud::Cloud, user_class::UserClass, vm_type::VmType};

use crate::offer::{OfferId, OfferSource, ResourceOffer};

/// Offers sorted ascending by hourly cost.
///
/// Pruning only ever removes the front, so the remaining offers stay sorted and are never re-sorted.
#[derive(Clone, Debug)]
pub struct CandidatePool {
    offers: Vec<ResourceOffer>,
    front: usize,
}

impl CandidatePool {
    /// Builds the pool for a request of `user_class` with `total_tasks` tasks and ranks it by cost.
    pub fn build(cloud: &Cloud, user_class: UserClass, total_tasks: usize) -> Self {
        let mut offers = collect_offers(cloud, user_class, total_tasks);
        rank_by_cost(&mut offers);
        CandidatePool { offers, front: 0 }
    }

    /// Number of offers left.
    pub fn len(&self) -> usize {
        self.offers.len() - self.front
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining offers, cheapest first.
    pub fn offers(&self) -> &[ResourceOffer] {
        &self.offers[self.front..]
    }

    /// Price of the cheapest remaining offer.
    pub fn cheapest_cost(&self) -> Option<f64> {
        self.offers().first().map(ResourceOffer::cost_per_hour)
    }

    /// Removes the cheapest offer.
    pub fn prune_front(&mut self) -> Option<&ResourceOffer> {
        if self.is_empty() {
            return None;
        }
        self.front += 1;
        self.offers.get(self.front - 1)
    }
}

/// Replicates every public VM type `total_tasks` times, and the first VM type of every private datacenter
/// up to the quota of `user_class`. Offer ids follow this order.
pub fn collect_offers(cloud: &Cloud, user_class: UserClass, total_tasks: usize) -> Vec<ResourceOffer> {
    let mut offers = Vec::new();
    let mut add_offers = |vm_type: &VmType, source: OfferSource, count: usize| {
        for _ in 0..count {
            offers.push(ResourceOffer {
                id: offers.len() as OfferId,
                vm_type: vm_type.clone(),
                source: source.clone(),
            });
        }
    };

    for datacenter in cloud.public_datacenters.iter() {
        for vm_type in datacenter.vm_types.iter() {
            let source = OfferSource::Public {
                datacenter: datacenter.name.clone(),
            };
            add_offers(vm_type, source, total_tasks);
        }
    }

    for datacenter in cloud.private_datacenters.iter() {
        let Some(vm_type) = datacenter.first_vm_type() else {
            log::warn!("private datacenter {} offers no VM types, skipping", datacenter.name);
            continue;
        };
        let available = datacenter.max_available_resource(vm_type, user_class);
        let source = OfferSource::Private {
            datacenter: datacenter.name.clone(),
        };
        add_offers(vm_type, source, total_tasks.min(available));
    }

    offers
}

/// Stable sort by hourly cost, ties keep insertion order.
pub fn rank_by_cost(offers: &mut [ResourceOffer]) {
    offers.sort_by(|a, b| a.cost_per_hour().total_cmp(&b.cost_per_hour()));
}
