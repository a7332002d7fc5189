pub mod clock;
pub mod housekeeping;
pub mod token;
pub mod token_authority;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use token::{InvalidReason, IssuedToken, TokenStatus};
pub use token_authority::TokenAuthority;
