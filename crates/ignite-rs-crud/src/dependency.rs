//! Conditional field visibility.
//!
//! A [`FieldDependency`] makes one field's visibility depend on the value of
//! another field in the same form. The referenced field is stored by id only;
//! the presentation layer resolves it against the rendered form, so a
//! dependency never embeds (or copies) the field it points at.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Value};

use ignite_rs_core::{IgniteError, IgniteResult};

/// The comparison a dependency performs.
///
/// Every plain condition has an `or` variant that is combined disjunctively
/// with the preceding conditions by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    /// Visible when the value equals.
    When,
    /// Visible when the value differs.
    WhenNot,
    /// Visible when the value (a list) contains.
    WhenContains,
    /// Visible when the value is one of.
    WhenIn,
    /// Disjunctive [`When`](Self::When).
    OrWhen,
    /// Disjunctive [`WhenNot`](Self::WhenNot).
    OrWhenNot,
    /// Disjunctive [`WhenContains`](Self::WhenContains).
    OrWhenContains,
    /// Disjunctive [`WhenIn`](Self::WhenIn).
    OrWhenIn,
}

impl Condition {
    /// Every condition, plain ones first.
    pub const ALL: [Self; 8] = [
        Self::When,
        Self::WhenNot,
        Self::WhenContains,
        Self::WhenIn,
        Self::OrWhen,
        Self::OrWhenNot,
        Self::OrWhenContains,
        Self::OrWhenIn,
    ];

    /// Returns the condition token as understood by the renderer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::When => "when",
            Self::WhenNot => "whenNot",
            Self::WhenContains => "whenContains",
            Self::WhenIn => "whenIn",
            Self::OrWhen => "orWhen",
            Self::OrWhenNot => "orWhenNot",
            Self::OrWhenContains => "orWhenContains",
            Self::OrWhenIn => "orWhenIn",
        }
    }

    /// Returns the snake-cased builder method name (`when_not`).
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::When => "when",
            Self::WhenNot => "when_not",
            Self::WhenContains => "when_contains",
            Self::WhenIn => "when_in",
            Self::OrWhen => "or_when",
            Self::OrWhenNot => "or_when_not",
            Self::OrWhenContains => "or_when_contains",
            Self::OrWhenIn => "or_when_in",
        }
    }

    /// Returns `true` if `token` is exactly one of the condition tokens.
    pub fn exists(token: &str) -> bool {
        Self::ALL.iter().any(|condition| condition.as_str() == token)
    }

    /// Looks a condition up by its builder method name, in either the
    /// token (`whenNot`) or the snake-cased (`when_not`) spelling.
    pub fn from_method_name(method: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str() == method || condition.method_name() == method)
    }
}

impl FromStr for Condition {
    type Err = IgniteError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str() == token)
            .ok_or_else(|| {
                IgniteError::InvalidConfiguration(format!(
                    "Condition [{token}] is not available"
                ))
            })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A visibility rule on another field.
///
/// # Examples
///
/// ```
/// use ignite_rs_crud::dependency::FieldDependency;
///
/// let dependency = FieldDependency::new("whenNot", "status", "draft").unwrap();
/// assert_eq!(dependency.get_attribute_name(), "status");
/// assert_eq!(
///     dependency.render(),
///     serde_json::json!({"condition": "whenNot", "attribute": "status", "value": "draft"}),
/// );
///
/// assert!(FieldDependency::new("unless", "status", "draft").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDependency {
    condition: Condition,
    attribute: String,
    value: Value,
}

impl FieldDependency {
    /// Creates a dependency from a condition token.
    ///
    /// `attribute` is the id of the field whose value is compared.
    pub fn new(
        condition: &str,
        attribute: impl Into<String>,
        value: impl Into<Value>,
    ) -> IgniteResult<Self> {
        Ok(Self::with_condition(condition.parse()?, attribute, value))
    }

    /// Creates a dependency from an already parsed [`Condition`].
    pub fn with_condition(
        condition: Condition,
        attribute: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            condition,
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Returns `true` if `token` is a valid condition.
    pub fn condition_exists(token: &str) -> bool {
        Condition::exists(token)
    }

    /// Returns the id of the referenced field.
    pub fn get_attribute_name(&self) -> &str {
        &self.attribute
    }

    /// Returns the condition.
    pub const fn get_condition(&self) -> Condition {
        self.condition
    }

    /// Returns the compared value.
    pub const fn get_value(&self) -> &Value {
        &self.value
    }

    /// Serializes to exactly `{condition, attribute, value}`.
    pub fn render(&self) -> Value {
        json!({
            "condition": self.condition.as_str(),
            "attribute": self.attribute,
            "value": self.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_condition_is_accepted() {
        for token in [
            "when",
            "whenNot",
            "whenContains",
            "whenIn",
            "orWhen",
            "orWhenNot",
            "orWhenContains",
            "orWhenIn",
        ] {
            let dependency = FieldDependency::new(token, "status", "live").unwrap();
            assert_eq!(dependency.get_condition().as_str(), token);
            assert_eq!(dependency.get_attribute_name(), "status");
            assert_eq!(dependency.get_value(), &json!("live"));
        }
    }

    #[test]
    fn test_snake_case_tokens_are_not_conditions() {
        for token in ["when_not", "or_when_in", "when_contains"] {
            assert!(
                matches!(
                    FieldDependency::new(token, "status", 1),
                    Err(IgniteError::InvalidConfiguration(_))
                ),
                "{token} should be rejected"
            );
            assert!(!FieldDependency::condition_exists(token));
            assert!(token.parse::<Condition>().is_err());
        }
    }

    #[test]
    fn test_from_method_name() {
        assert_eq!(Condition::from_method_name("when_not"), Some(Condition::WhenNot));
        assert_eq!(Condition::from_method_name("orWhenIn"), Some(Condition::OrWhenIn));
        assert_eq!(Condition::from_method_name("unless"), None);
    }

    #[test]
    fn test_unknown_condition_is_rejected() {
        for token in ["unless", "whennot", "andWhen", "", "WHEN"] {
            let err = FieldDependency::new(token, "status", 1).unwrap_err();
            assert!(
                matches!(err, IgniteError::InvalidConfiguration(ref msg) if msg.contains(token)),
                "{token} should be rejected"
            );
        }
    }

    #[test]
    fn test_render_has_exactly_three_keys() {
        let rendered = FieldDependency::new("whenIn", "category", json!(["a", "b"]))
            .unwrap()
            .render();
        let object = rendered.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["condition", "attribute", "value"]);
        assert_eq!(object["attribute"], json!("category"));
    }

    #[test]
    fn test_serialize_matches_render() {
        let dependency = FieldDependency::new("orWhen", "active", true).unwrap();
        assert_eq!(serde_json::to_value(&dependency).unwrap(), dependency.render());
    }
}
