pub mod verification;

pub use ev_shared::ErrorResponse;
pub use verification::{ConfirmCodeRequest, RequestCodeRequest, SuccessResponse};
