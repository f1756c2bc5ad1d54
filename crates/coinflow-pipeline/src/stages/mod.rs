//! The five concrete pipeline stages, in execution order.

mod authenticate;
mod fee;
mod persist;
mod quote;
mod validate;

pub use authenticate::Authenticate;
pub use fee::Fee;
pub use persist::Persist;
pub use quote::Quote;
pub use validate::Validate;
