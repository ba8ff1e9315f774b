//! Branch name validation.
//!
//! A valid name is non-empty and contains no whitespace or any of
//! `~ ^ : ? * [ \`. It must not contain `..` or `@{`, must not start or end
//! with `.` or `/`, must not end with `.lock`, and every `/`-separated
//! component must be non-empty and must not start with `.`.

use crate::error::{RefError, Result};

const FORBIDDEN_CHARS: &[char] = &['~', '^', ':', '?', '*', '[', '\\'];

fn invalid(name: &str, reason: impl Into<String>) -> RefError {
    RefError::InvalidBranchName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a branch name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use twig_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("master").is_ok());
/// assert!(validate_branch_name("feature/merge").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("bad..name").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "branch name must not be empty"));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(c))
    {
        return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
    }
    for pattern in ["..", "@{"] {
        if name.contains(pattern) {
            return Err(invalid(name, format!("must not contain '{pattern}'")));
        }
    }
    for edge in ['.', '/'] {
        if name.starts_with(edge) || name.ends_with(edge) {
            return Err(invalid(name, format!("must not start or end with '{edge}'")));
        }
    }
    if name.ends_with(".lock") {
        return Err(invalid(name, "must not end with '.lock'"));
    }
    for component in name.split('/') {
        if component.is_empty() {
            return Err(invalid(name, "path components must not be empty"));
        }
        if component.starts_with('.') {
            return Err(invalid(
                name,
                format!("component must not start with '.': {component:?}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["master", "dev", "my-branch", "v1.0", "feature/auth", "a/b/c"] {
            assert!(validate_branch_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn reject_empty_name() {
        assert!(validate_branch_name("").is_err());
    }

    #[test]
    fn reject_whitespace() {
        assert!(validate_branch_name("has space").is_err());
        assert!(validate_branch_name("has\ttab").is_err());
        assert!(validate_branch_name("has\nnewline").is_err());
    }

    #[test]
    fn reject_forbidden_chars() {
        for name in ["a~b", "a^b", "a:b", "a?b", "a*b", "a[b", "a\\b"] {
            assert!(validate_branch_name(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn reject_sequences() {
        assert!(validate_branch_name("bad..name").is_err());
        assert!(validate_branch_name("ref@{0}").is_err());
    }

    #[test]
    fn reject_boundaries() {
        assert!(validate_branch_name(".hidden").is_err());
        assert!(validate_branch_name("trailing.").is_err());
        assert!(validate_branch_name("/leading").is_err());
        assert!(validate_branch_name("trailing/").is_err());
        assert!(validate_branch_name("master.lock").is_err());
    }

    #[test]
    fn reject_bad_components() {
        assert!(validate_branch_name("a//b").is_err());
        assert!(validate_branch_name("feature/.hidden").is_err());
    }

    #[test]
    fn error_carries_name() {
        let err = validate_branch_name("a b").unwrap_err();
        assert!(matches!(err, RefError::InvalidBranchName { ref name, .. } if name == "a b"));
    }
}
