mod obs_endpoint;
mod obs_gateway;

pub use obs_endpoint::ObsEndpoint;
pub use obs_gateway::ObsGateway;
