pub mod candidate;
pub mod extractor;

pub use candidate::{CredentialCandidate, Userinfo};
pub use extractor::resolve;
