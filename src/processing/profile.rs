//! Structured candidate profile returned by the extraction prompt

use crate::error::{Result, ScreenerError};
use crate::processing::sanitize;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedProfile {
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact: Contact,
    #[serde(deserialize_with = "lenient_string_list")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience_by_company: Vec<CompanyExperience>,
    #[serde(deserialize_with = "lenient_string")]
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub linkedin: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyExperience {
    #[serde(deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "lenient_string")]
    pub duration: String,
}

impl ExtractedProfile {
    /// Parse the raw reply of the extraction prompt.
    pub fn from_model_response(raw: &str) -> Result<Self> {
        let value = sanitize::parse_json_object(raw)?;
        serde_json::from_value(value).map_err(|e| ScreenerError::MalformedModelJson(e.to_string()))
    }

    /// `"Company: duration"` lines for the total-experience prompt.
    pub fn duration_lines(&self) -> String {
        self.experience_by_company
            .iter()
            .map(|entry| format!("{}: {}", entry.company, entry.duration))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Strings, numbers and `null` all become strings.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

/// Accepts a list of strings, a list of `{"name": ...}` objects, a single
/// string or `null`.
fn lenient_string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    };

    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut fields) => fields
                .remove("name")
                .or_else(|| fields.remove("title"))
                .map(value_to_string)
                .unwrap_or_else(|| Value::Object(fields).to_string()),
            other => value_to_string(other),
        })
        .filter(|name| !name.trim().is_empty())
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}
