pub mod metrics;
pub mod mqtt;
pub mod obs;
