/*!
 * Export of job content to interchange documents and import of translated
 * documents back into jobs.
 */

use log::debug;

use crate::errors::{DeserializeError, SerializeError};
use crate::job::{FieldKind, TranslationJob};
use crate::language_utils;

use super::document::{InterchangeDocument, Segment, TranslationUnit};
use super::html;
use super::xliff;

/// Options controlling how content is exported and imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerOptions {
    /// Skip fields whose text is empty or whitespace only
    pub remove_blanks: bool,

    /// Split rich-text fields into one segment per top-level block
    pub split_html: bool,

    /// Write targets verbatim instead of re-using the source's outer whitespace
    pub preserve_white_space: bool,

    /// Reject documents whose locale pair differs from the job's
    pub languages_must_match: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            remove_blanks: false,
            split_html: false,
            preserve_white_space: false,
            languages_must_match: true,
        }
    }
}

/// XLIFF 2.0 serializer for translation jobs
pub struct XliffSerializer;

impl XliffSerializer {
    /// Build the bilingual document for a job
    pub fn export(
        job: &TranslationJob,
        source_locale: &str,
        target_locale: &str,
        options: &SerializerOptions,
    ) -> Result<InterchangeDocument, SerializeError> {
        for locale in [source_locale, target_locale] {
            language_utils::validate_locale(locale)
                .map_err(|_| SerializeError::InvalidLocale(locale.to_string()))?;
        }

        let mut doc = InterchangeDocument::new(source_locale, target_locale, &job.id.to_string());
        doc.preserve_space = options.preserve_white_space;

        for field in job.content.iter() {
            if options.remove_blanks && field.is_blank() {
                debug!("Job {}: skipping blank field '{}'", job.id, field.key);
                continue;
            }

            let mut unit = TranslationUnit::new(field.key.clone());

            if options.split_html && field.kind == FieldKind::Html {
                let chunks = html::split_blocks(&field.value).map_err(|e| {
                    SerializeError::MalformedMarkup {
                        field: field.key.clone(),
                        message: e.0,
                    }
                })?;
                for (index, range) in chunks.into_iter().enumerate() {
                    unit.segments.push(Segment::new(
                        format!("{}.{}", field.key, index),
                        &field.value[range],
                    ));
                }
            } else {
                unit.segments.push(Segment::new(field.key.clone(), field.value.clone()));
            }

            doc.units.push(unit);
        }

        Ok(doc)
    }

    /// Merge the translated segments of a document into a copy of the job
    pub fn import(
        doc: &InterchangeDocument,
        job: &TranslationJob,
        options: &SerializerOptions,
    ) -> Result<TranslationJob, DeserializeError> {
        if options.languages_must_match
            && !(language_utils::locales_match(&doc.source_locale, &job.source_locale)
                && language_utils::locales_match(&doc.target_locale, &job.target_locale))
        {
            return Err(DeserializeError::LanguageMismatch {
                document_source: doc.source_locale.clone(),
                document_target: doc.target_locale.clone(),
                job_source: job.source_locale.clone(),
                job_target: job.target_locale.clone(),
            });
        }

        let matched = doc
            .units
            .iter()
            .filter(|u| job.content.contains(&u.field_key))
            .count();
        if options.languages_must_match && matched == 0 && !doc.units.is_empty() {
            return Err(DeserializeError::NoMatchingFields(job.id));
        }

        let mut updated = job.clone();

        for unit in &doc.units {
            let Some(current) = job.content.get(&unit.field_key) else {
                debug!("Job {}: document unit '{}' has no matching field", job.id, unit.field_key);
                continue;
            };
            if !unit.has_translation() {
                continue;
            }

            let texts: Vec<String> = unit
                .segments
                .iter()
                .map(|segment| {
                    let target = segment.translated_text().unwrap_or(&segment.source);
                    if options.preserve_white_space {
                        target.to_string()
                    } else {
                        reframe(&segment.source, target)
                    }
                })
                .collect();

            let value = if is_split_unit(unit) {
                merge_blocks(current, &texts)
            } else {
                texts.concat()
            };

            updated.content.set(&unit.field_key, value);
        }

        Ok(updated)
    }

    /// Export straight to XLIFF text
    pub fn to_xliff(
        job: &TranslationJob,
        options: &SerializerOptions,
    ) -> Result<String, SerializeError> {
        let doc = Self::export(job, &job.source_locale, &job.target_locale, options)?;
        Ok(xliff::write_document(&doc))
    }

    /// Parse XLIFF text and merge it into a copy of the job
    pub fn from_xliff(
        xml: &str,
        job: &TranslationJob,
        options: &SerializerOptions,
    ) -> Result<TranslationJob, DeserializeError> {
        let doc = xliff::read_document(xml)?;
        Self::import(&doc, job, options)
    }
}

/// Whether the unit was produced by block splitting rather than whole-field export
fn is_split_unit(unit: &TranslationUnit) -> bool {
    match unit.segments.as_slice() {
        [single] => single.id != unit.field_key,
        _ => true,
    }
}

/// Put translated blocks back in place of the field's current blocks, keeping
/// the text between them. Falls back to plain concatenation when the field no
/// longer splits into the same number of blocks.
fn merge_blocks(current: &str, texts: &[String]) -> String {
    match html::split_blocks(current) {
        Ok(chunks) if chunks.len() == texts.len() => html::splice(current, &chunks, texts),
        _ => texts.concat(),
    }
}

/// Give a translated text the leading and trailing whitespace of its source
fn reframe(source: &str, target: &str) -> String {
    let leading = &source[..source.len() - source.trim_start().len()];
    let trailing = &source[source.trim_end().len()..];
    let body = target.trim();
    if body.is_empty() {
        return source.to_string();
    }
    format!("{}{}{}", leading, body, trailing)
}
