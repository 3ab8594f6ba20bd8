pub mod jwt;

pub use jwt::{AuthenticatedUser, JwtAuth};
