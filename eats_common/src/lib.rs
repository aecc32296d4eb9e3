mod pkr;

pub mod helpers;
pub mod op;
mod secret;

pub use pkr::{Pkr, PkrConversionError, DEFAULT_CURRENCY_CODE, PAISA_PER_RUPEE};
pub use secret::Secret;
