use crate::error::{Error, Result};

/// Collapses whitespace runs to single spaces and trims the ends.
///
/// Fails with [`Error::EmptyInput`] when nothing is left.
pub fn normalize(raw: &str) -> Result<String> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn collapses_and_trims() {
        assert_eq!(
            normalize("  Hello \n\n  big\tworld.  ").unwrap(),
            "Hello big world."
        );
    }

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(normalize(""), Err(Error::EmptyInput)));
        assert!(matches!(normalize(" \t\r\n "), Err(Error::EmptyInput)));
    }

    proptest! {
        #[test]
        fn whitespace_only_is_always_rejected(ws in "[ \t\r\n]{0,40}") {
            prop_assert!(matches!(normalize(&ws), Err(Error::EmptyInput)));
        }

        #[test]
        fn output_has_no_double_spaces(text in "[a-z \t\n.]{1,80}") {
            if let Ok(out) = normalize(&text) {
                prop_assert!(!out.contains("  "));
                prop_assert_eq!(out.trim(), out.as_str());
            }
        }
    }
}
