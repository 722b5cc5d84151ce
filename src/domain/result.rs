//! Result type alias for medredact

use super::errors::RedactError;

/// Result type alias for medredact operations
///
/// # Examples
///
/// ```
/// use medredact::domain::result::Result;
/// use medredact::domain::errors::RedactError;
///
/// fn failing_function() -> Result<()> {
///     Err(RedactError::Validation("Invalid input".to_string()))
/// }
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, RedactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
