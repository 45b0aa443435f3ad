//! Domain models for the PulseCare matching core.

mod blood_group;
mod donor;
mod matching;
mod request;

pub use blood_group::*;
pub use donor::*;
pub use matching::*;
pub use request::*;
