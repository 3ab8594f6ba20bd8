mod server;

pub use server::WorkflowServiceImpl;
