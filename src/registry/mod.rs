pub mod user_registry;

pub use user_registry::{AuthFailure, UserRecord, UserRegistry};
