//! Name validation shared by resources and project configuration.
//!
//! Mirrors the Kubernetes apimachinery rules for DNS names so that every
//! group, kind and project name we scaffold is accepted by an API server.

const DNS1123_LABEL_MAX: usize = 63;
const DNS1123_SUBDOMAIN_MAX: usize = 253;
const DNS1035_LABEL_MAX: usize = 63;

/// Centralized domain validation.
///
/// Each check returns the human-readable reason on failure so callers can
/// wrap it in the [`DomainError`](crate::domain::DomainError) variant that
/// names the offending field.
pub struct DomainValidator;

impl DomainValidator {
    /// RFC 1123 label: lowercase alphanumerics and '-', alphanumeric at both ends.
    pub fn dns1123_label(value: &str) -> Result<(), String> {
        if value.len() > DNS1123_LABEL_MAX {
            return Err(format!("must be no more than {DNS1123_LABEL_MAX} characters"));
        }
        if !is_label(value, |c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(
                "a DNS-1123 label must consist of lower case alphanumeric characters or '-', \
                 and must start and end with an alphanumeric character"
                    .into(),
            );
        }
        Ok(())
    }

    /// RFC 1123 subdomain: dot-separated labels.
    pub fn dns1123_subdomain(value: &str) -> Result<(), String> {
        if value.len() > DNS1123_SUBDOMAIN_MAX {
            return Err(format!(
                "must be no more than {DNS1123_SUBDOMAIN_MAX} characters"
            ));
        }
        let valid = value
            .split('.')
            .all(|label| is_label(label, |c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        if !valid {
            return Err(
                "a DNS-1123 subdomain must consist of lower case alphanumeric characters, '-' \
                 or '.', and must start and end with an alphanumeric character"
                    .into(),
            );
        }
        Ok(())
    }

    /// RFC 1035 label: like a 1123 label but must start with a letter.
    pub fn dns1035_label(value: &str) -> Result<(), String> {
        if value.len() > DNS1035_LABEL_MAX {
            return Err(format!("must be no more than {DNS1035_LABEL_MAX} characters"));
        }
        let starts_with_letter = value.chars().next().is_some_and(|c| c.is_ascii_lowercase());
        if !starts_with_letter
            || !is_label(value, |c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(
                "a DNS-1035 label must consist of lower case alphanumeric characters or '-', \
                 start with an alphabetic character, and end with an alphanumeric character"
                    .into(),
            );
        }
        Ok(())
    }

    /// API version: `v<N>`, optionally followed by `alpha<N>` or `beta<N>`.
    pub fn api_version(value: &str) -> Result<(), String> {
        let invalid = || format!(r"version must match ^v\d+(alpha\d+|beta\d+)?$ (was {value})");

        let rest = value.strip_prefix('v').ok_or_else(invalid)?;
        let major_len = rest.chars().take_while(char::is_ascii_digit).count();
        if major_len == 0 {
            return Err(invalid());
        }
        let suffix = &rest[major_len..];
        if suffix.is_empty() {
            return Ok(());
        }
        let level = suffix
            .strip_prefix("alpha")
            .or_else(|| suffix.strip_prefix("beta"))
            .ok_or_else(invalid)?;
        if level.is_empty() || !level.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        Ok(())
    }
}

fn is_label(value: &str, alnum: impl Fn(char) -> bool) -> bool {
    let (Some(first), Some(last)) = (value.chars().next(), value.chars().last()) else {
        return false;
    };
    alnum(first) && alnum(last) && value.chars().all(|c| alnum(c) || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdomain_accepts_dotted_names() {
        assert!(DomainValidator::dns1123_subdomain("example.org").is_ok());
        assert!(DomainValidator::dns1123_subdomain("ship").is_ok());
        assert!(DomainValidator::dns1123_subdomain("rbac.authorization").is_ok());
    }

    #[test]
    fn subdomain_rejects_bad_names() {
        assert!(DomainValidator::dns1123_subdomain("").is_err());
        assert!(DomainValidator::dns1123_subdomain("Ship").is_err());
        assert!(DomainValidator::dns1123_subdomain("ship.").is_err());
        assert!(DomainValidator::dns1123_subdomain("-ship").is_err());
        assert!(DomainValidator::dns1123_subdomain("sh_ip").is_err());
    }

    #[test]
    fn label_rejects_dots() {
        assert!(DomainValidator::dns1123_label("my-operator").is_ok());
        assert!(DomainValidator::dns1123_label("my.operator").is_err());
        assert!(DomainValidator::dns1123_label(&"a".repeat(64)).is_err());
    }

    #[test]
    fn dns1035_requires_leading_letter() {
        assert!(DomainValidator::dns1035_label("frigate").is_ok());
        assert!(DomainValidator::dns1035_label("1frigate").is_err());
        assert!(DomainValidator::dns1035_label("first-mate").is_ok());
    }

    #[test]
    fn api_version_patterns() {
        for ok in ["v1", "v12", "v1alpha1", "v2beta3"] {
            assert!(DomainValidator::api_version(ok).is_ok(), "{ok}");
        }
        for bad in ["", "1", "v", "valpha1", "v1alpha", "v1gamma1", "V1", "v1beta1x"] {
            assert!(DomainValidator::api_version(bad).is_err(), "{bad}");
        }
    }
}
