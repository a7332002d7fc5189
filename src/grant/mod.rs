pub mod body;
pub mod error;
pub mod processor;
pub mod response;

pub use error::GrantError;
pub use processor::{GrantProcessor, TokenRequest};
pub use response::{TokenResponse, ValidationResponse};
