pub mod api;
pub mod gateway;

pub use api::{ApiService, Backend};
pub use gateway::{ConnectionState, GatewayMessage, PushGateway};
