pub mod user;

pub use user::{User, SIGNIN_METHOD_LOCAL};
