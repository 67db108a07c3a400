pub mod account;
pub mod media;

pub use account::{Account, AccountResponse, Role};
pub use media::{Classification, MediaEvent, MediaRecord, MediaResponse, MediaStatus};
