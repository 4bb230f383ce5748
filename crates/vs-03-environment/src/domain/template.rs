//! `${VAR}` interpolation for endpoint templates.

use crate::errors::ConfigurationError;
use crate::ports::outbound::SecretSource;

/// Names of the `${VAR}` placeholders in `template`, in order.
pub fn placeholders(template: &str) -> Result<Vec<&str>, ConfigurationError> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| ConfigurationError::MalformedTemplate(template.to_string()))?;
        let name = &after[..end];
        if name.is_empty() {
            return Err(ConfigurationError::MalformedTemplate(template.to_string()));
        }
        names.push(name);
        rest = &after[end + 1..];
    }
    Ok(names)
}

/// Replaces every `${VAR}` in `template` with its value from `secrets`.
///
/// Substituted values are copied verbatim and never rescanned.
pub fn interpolate(template: &str, secrets: &dyn SecretSource) -> Result<String, ConfigurationError> {
    placeholders(template)?;

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| ConfigurationError::MalformedTemplate(template.to_string()))?;
        let name = &after[..end];
        let value = secrets
            .non_empty(name)
            .ok_or_else(|| ConfigurationError::MissingSecret(name.to_string()))?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
