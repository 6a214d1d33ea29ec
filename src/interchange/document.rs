/*!
 * Bilingual interchange document model.
 *
 * Mirrors the XLIFF 2.0 structure the connector exchanges with vendors:
 * one translation unit per job field, one or more segments per unit.
 */

use serde::{Deserialize, Serialize};

/// A source/target text pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment identifier, unique within the document
    pub id: String,

    /// Source text
    pub source: String,

    /// Target text (None until translated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Segment {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: None,
        }
    }

    /// Target text if it carries anything other than whitespace
    pub fn translated_text(&self) -> Option<&str> {
        self.target.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// All segments belonging to one job field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Key of the job field this unit was exported from
    pub field_key: String,

    /// Segments in document order
    pub segments: Vec<Segment>,
}

impl TranslationUnit {
    pub fn new(field_key: impl Into<String>) -> Self {
        Self {
            field_key: field_key.into(),
            segments: Vec::new(),
        }
    }

    /// Whether any segment carries a non-blank target
    pub fn has_translation(&self) -> bool {
        self.segments.iter().any(|s| s.translated_text().is_some())
    }
}

/// Complete bilingual document for one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterchangeDocument {
    /// Source locale
    pub source_locale: String,

    /// Target locale
    pub target_locale: String,

    /// Reference to the job the document was produced from
    pub original: String,

    /// Whether whitespace in segments is significant
    #[serde(default)]
    pub preserve_space: bool,

    /// Units in field order
    pub units: Vec<TranslationUnit>,
}

impl InterchangeDocument {
    pub fn new(source_locale: &str, target_locale: &str, original: &str) -> Self {
        Self {
            source_locale: source_locale.to_string(),
            target_locale: target_locale.to_string(),
            original: original.to_string(),
            preserve_space: false,
            units: Vec::new(),
        }
    }

    pub fn unit(&self, field_key: &str) -> Option<&TranslationUnit> {
        self.units.iter().find(|u| u.field_key == field_key)
    }

    pub fn unit_mut(&mut self, field_key: &str) -> Option<&mut TranslationUnit> {
        self.units.iter_mut().find(|u| u.field_key == field_key)
    }

    /// Every segment paired with the field key of its unit
    pub fn segments(&self) -> impl Iterator<Item = (&str, &Segment)> {
        self.units
            .iter()
            .flat_map(|u| u.segments.iter().map(move |s| (u.field_key.as_str(), s)))
    }

    pub fn segment_count(&self) -> usize {
        self.units.iter().map(|u| u.segments.len()).sum()
    }

    /// Field keys in document order
    pub fn field_keys(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.field_key.as_str()).collect()
    }

    /// Copy every source into its target; the identity translation
    pub fn fill_targets_from_source(&mut self) {
        for unit in &mut self.units {
            for segment in &mut unit.segments {
                segment.target = Some(segment.source.clone());
            }
        }
    }

    /// Translation progress as a percentage of segments with a target
    pub fn translation_progress(&self) -> f32 {
        let total = self.segment_count();
        if total == 0 {
            return 100.0;
        }
        let translated = self
            .segments()
            .filter(|(_, s)| s.translated_text().is_some())
            .count();
        (translated as f32 / total as f32) * 100.0
    }
}
