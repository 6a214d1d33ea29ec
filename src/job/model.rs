/*!
 * Translation job model.
 *
 * A job is created and owned by the host. Connectors receive a copy and hand
 * back a modified value; the host decides whether to persist it.
 */

use serde::{Deserialize, Serialize};

use super::state::JobState;

/// How a content field should be treated during export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Plain text, always exported as a single segment
    #[default]
    Text,
    /// Rich text that may be split at block-element boundaries
    Html,
}

/// A single translatable field of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentField {
    /// Field identifier, unique within the job
    pub key: String,

    /// Field kind
    #[serde(default)]
    pub kind: FieldKind,

    /// Current text of the field
    pub value: String,
}

impl ContentField {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: FieldKind::Text,
            value: value.into(),
        }
    }

    pub fn html(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: FieldKind::Html,
            value: value.into(),
        }
    }

    /// Whether the field holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Ordered collection of content fields keyed by field identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct JobContent {
    fields: Vec<ContentField>,
}

impl JobContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any existing field with the same key in place
    pub fn insert(&mut self, field: ContentField) {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, field: ContentField) -> Self {
        self.insert(field);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.field(key).map(|f| f.value.as_str())
    }

    pub fn field(&self, key: &str) -> Option<&ContentField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Overwrite the value of an existing field. Returns false if the key is unknown.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(field) => {
                field.value = value;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<ContentField> for JobContent {
    fn from_iter<I: IntoIterator<Item = ContentField>>(iter: I) -> Self {
        let mut content = JobContent::new();
        for field in iter {
            content.insert(field);
        }
        content
    }
}

/// A unit of content submitted for translation between two locales
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationJob {
    /// Host-assigned identifier
    pub id: u64,

    /// Display name, used in logs
    #[serde(default)]
    pub name: String,

    /// Source locale (e.g. "en-US")
    pub source_locale: String,

    /// Target locale (e.g. "fr-FR")
    pub target_locale: String,

    /// Content to translate
    #[serde(default)]
    pub content: JobContent,

    /// Opaque connector metadata; the host stores it without interpreting it
    #[serde(default)]
    pub provider_properties: Option<String>,

    /// Lifecycle state
    #[serde(default)]
    pub state: JobState,
}

impl TranslationJob {
    /// Create a job in the `Created` state with no content
    pub fn new(id: u64, source_locale: &str, target_locale: &str) -> Self {
        Self {
            id,
            name: format!("job-{}", id),
            source_locale: source_locale.to_string(),
            target_locale: target_locale.to_string(),
            content: JobContent::new(),
            provider_properties: None,
            state: JobState::Created,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_field(mut self, field: ContentField) -> Self {
        self.content.insert(field);
        self
    }

    pub fn with_properties(mut self, properties: &str) -> Self {
        self.provider_properties = Some(properties.to_string());
        self
    }

    pub fn with_state(mut self, state: JobState) -> Self {
        self.state = state;
        self
    }
}
