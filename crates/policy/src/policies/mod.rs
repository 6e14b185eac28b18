//! Implementations of provisioning policies.

pub mod lff_cost;
