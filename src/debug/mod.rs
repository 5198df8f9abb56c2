pub mod gradient_check;
pub mod numerical_check;

pub use gradient_check::{gradient_norm, numerical_gradients, relative_error};
pub use numerical_check::{check_weights, ensure_finite, NumericalIssue};
