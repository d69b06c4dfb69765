pub mod api;
pub mod gateway;

pub use api::ApiError;
pub use gateway::GatewayError;
