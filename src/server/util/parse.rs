use serde_json::Value;

/// Lower-cases and trims an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks the `local@domain.tld` shape of an email address.
///
/// # Arguments
/// - `email` - Address to check, already trimmed
///
/// # Returns
/// - `true` - One `@` with a non-empty local part and a dotted domain
/// - `false` - Anything else, including whitespace inside the address
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Whether a loosely typed request value counts as present.
///
/// Missing, null, `false`, `0` and the empty string are all absent.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Riya@Example.COM "), "riya@example.com");
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(is_valid_email("riya@example.com"));
        assert!(is_valid_email("a.b@mail.example.org"));
        assert!(!is_valid_email("riya"));
        assert!(!is_valid_email("riya@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ri ya@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn presence_treats_falsy_values_as_missing() {
        assert!(!is_present(None));
        assert!(!is_present(Some(&Value::Null)));
        assert!(!is_present(Some(&json!(0))));
        assert!(!is_present(Some(&json!(""))));
        assert!(is_present(Some(&json!(499))));
        assert!(is_present(Some(&json!("499"))));
    }
}
