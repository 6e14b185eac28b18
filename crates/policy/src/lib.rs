#![doc = include_str!("../../../README.md")]

pub mod allocation_stats;
pub mod allocator;
pub mod error;
pub mod experiment;
pub mod feasibility;
pub mod offer;
pub mod parser;
pub mod policies;
pub mod policy;
pub mod pool;
pub mod request;
pub mod schedule;
pub mod task;
