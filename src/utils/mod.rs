pub mod extract;
pub mod responses;
pub mod validation;

pub use extract::Payload;
pub use responses::{ApiError, ErrorResponse, ResponseBuilder};
pub use validation::{ValidationErrors, ValidationResult, Validator};
