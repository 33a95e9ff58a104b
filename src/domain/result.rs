//! Result type alias for Tenderflow

use super::errors::TenderflowError;

/// Result type alias for Tenderflow operations
///
/// # Examples
///
/// ```
/// use tenderflow::domain::result::Result;
/// use tenderflow::domain::errors::TenderflowError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TenderflowError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TenderflowError>;
