//! Variable substitution engine for templates

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::types::Variables;

lazy_static! {
    /// `{{ name }}`, whitespace around the identifier allowed
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap();

    /// Anything still looking like a placeholder after rendering
    static ref LEFTOVER: Regex = Regex::new(r"\{\{.*?\}\}").unwrap();
}

/// Replace every `{{name}}` placeholder with its binding.
///
/// Unbound placeholders become the empty string. Substitution is a single
/// pass: a bound value that itself contains `{{x}}` is copied verbatim.
pub fn substitute_variables(template: &str, variables: &Variables) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            variables.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Brace sequences left in rendered output
pub fn leftover_placeholders(rendered: &str) -> Vec<String> {
    LEFTOVER
        .find_iter(rendered)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_simple() {
        let result = substitute_variables("Hello, {{name}}!", &vars(&[("name", "World")]));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_missing_variable_becomes_empty() {
        let result = substitute_variables("Hello {{name}}, ref {{ref}}", &vars(&[("name", "Jean")]));
        assert_eq!(result, "Hello Jean, ref ");
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let result = substitute_variables(
            "Mission {{ missionId }} le {{deliveryDate  }}",
            &vars(&[("missionId", "M-42"), ("deliveryDate", "2025-06-24")]),
        );
        assert_eq!(result, "Mission M-42 le 2025-06-24");
    }

    #[test]
    fn test_repeated_placeholder() {
        let result = substitute_variables(
            "Order {{order_id}} shipped. Track {{order_id}}.",
            &vars(&[("order_id", "ORD-123")]),
        );
        assert_eq!(result, "Order ORD-123 shipped. Track ORD-123.");
    }

    #[test]
    fn test_single_pass_no_recursive_expansion() {
        let result = substitute_variables(
            "{{a}} and {{b}}",
            &vars(&[("a", "{{b}}"), ("b", "bee")]),
        );
        assert_eq!(result, "{{b}} and bee");
    }

    #[test]
    fn test_non_identifier_braces_untouched() {
        let result = substitute_variables("{{not valid}} {{}}", &Variables::new());
        assert_eq!(result, "{{not valid}} {{}}");
    }

    #[test]
    fn test_leftover_placeholders() {
        assert!(leftover_placeholders("all done").is_empty());
        assert_eq!(
            leftover_placeholders("oops {{not valid}} here"),
            vec!["{{not valid}}"]
        );
    }
}
