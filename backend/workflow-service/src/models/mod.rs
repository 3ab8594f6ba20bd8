mod project;
mod workflow;

pub use project::Project;
pub use workflow::Workflow;
