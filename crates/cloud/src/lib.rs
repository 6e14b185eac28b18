//! Resource catalog of a hybrid cloud: public datacenters with unbounded capacity and
//! private datacenters whose capacity depends on the class of the requester.

pub mod cloud;
pub mod datacenter;
pub mod error;
pub mod parser;
pub mod user_class;
pub mod vm_type;
