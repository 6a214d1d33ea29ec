/*!
 * Bilingual interchange documents.
 *
 * - `document`: in-memory model of a bilingual document
 * - `xliff`: XLIFF 2.0 text form
 * - `html`: block-level splitting of rich-text fields
 * - `serializer`: export of job content and import of translations
 */

pub mod document;
pub mod html;
pub mod serializer;
pub mod xliff;

pub use document::{InterchangeDocument, Segment, TranslationUnit};
pub use serializer::{SerializerOptions, XliffSerializer};
