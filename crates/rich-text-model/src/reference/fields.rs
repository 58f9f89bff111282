use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Localized field values of a resolved entry or asset.
///
/// Values are keyed by field name, then by locale. Lookups without an explicit
/// locale use the resource's default locale.
///
/// ```rust
/// # use rich_text_model::ResolvedFields;
/// # use serde_json::json;
/// let fields = ResolvedFields::new("en-US")
///     .with_field("title", "en-US", json!("Title"))
///     .with_field("title", "de-DE", json!("Titel"));
///
/// assert_eq!(fields.get("title"), Some(&json!("Title")));
/// assert_eq!(fields.get_in("title", "de-DE"), Some(&json!("Titel")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFields {
    default_locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(default)]
    fields: BTreeMap<String, BTreeMap<String, Value>>,
}

impl ResolvedFields {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            content_type: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_field(
        mut self,
        name: impl Into<String>,
        locale: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.insert(name, locale, value);
        self
    }

    /// Sets a field value, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        locale: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.fields
            .entry(name.into())
            .or_default()
            .insert(locale.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_in(name, &self.default_locale)
    }

    pub fn get_in(&self, name: &str, locale: &str) -> Option<&Value> {
        self.fields.get(name)?.get(locale)
    }

    /// Locales a field has a value in, sorted.
    pub fn locales_of(&self, name: &str) -> Vec<&str> {
        self.fields
            .get(name)
            .map(|values| values.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub(crate) fn set_default_locale(&mut self, locale: &str) {
        self.default_locale = locale.to_string();
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
