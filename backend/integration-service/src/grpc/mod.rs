pub mod server;

pub use server::{IntegrationServiceImpl, INTEGRATION_CREATED_TOPIC};
