/*!
 * XLIFF 2.0 reading and writing.
 *
 * Only the core structure is handled: `xliff` > `file` > `unit` > `segment` >
 * `source`/`target`. Metadata and notes are skipped on read. Inline markup
 * elements inside `source`/`target` are rejected; rich text travels as
 * escaped text.
 */

use xmlparser::{ElementEnd, Token, Tokenizer};

use crate::errors::DeserializeError;

use super::document::{InterchangeDocument, Segment, TranslationUnit};

pub const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:2.0";

/// Render a document as XLIFF 2.0
pub fn write_document(doc: &InterchangeDocument) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str(&format!(
        "<xliff xmlns=\"{}\" version=\"2.0\" srcLang=\"{}\" trgLang=\"{}\"",
        XLIFF_NAMESPACE,
        escape_attr(&doc.source_locale),
        escape_attr(&doc.target_locale)
    ));
    if doc.preserve_space {
        out.push_str(" xml:space=\"preserve\"");
    }
    out.push_str(">\n");
    out.push_str(&format!(
        "  <file id=\"f1\" original=\"{}\">\n",
        escape_attr(&doc.original)
    ));

    for unit in &doc.units {
        out.push_str(&format!("    <unit id=\"{}\">\n", escape_attr(&unit.field_key)));
        for segment in &unit.segments {
            out.push_str(&format!("      <segment id=\"{}\">\n", escape_attr(&segment.id)));
            out.push_str(&format!("        <source>{}</source>\n", escape_text(&segment.source)));
            if let Some(target) = &segment.target {
                out.push_str(&format!("        <target>{}</target>\n", escape_text(target)));
            }
            out.push_str("      </segment>\n");
        }
        out.push_str("    </unit>\n");
    }

    out.push_str("  </file>\n");
    out.push_str("</xliff>\n");
    out
}

/// Which text the reader is currently collecting
#[derive(Debug, Clone, Copy, PartialEq)]
enum Capture {
    Source,
    Target,
}

#[derive(Default)]
struct ReaderState {
    doc: Option<InterchangeDocument>,
    stack: Vec<String>,
    unit: Option<TranslationUnit>,
    segment: Option<Segment>,
    capture: Option<Capture>,
    text: String,
}

impl ReaderState {
    fn current(&self) -> &str {
        self.stack.last().map(String::as_str).unwrap_or("")
    }

    fn doc_mut(&mut self) -> Result<&mut InterchangeDocument, DeserializeError> {
        self.doc
            .as_mut()
            .ok_or_else(|| DeserializeError::InvalidStructure("root element is not <xliff>".into()))
    }

    fn start(&mut self, name: &str) -> Result<(), DeserializeError> {
        if self.capture.is_some() {
            return Err(DeserializeError::InvalidStructure(format!(
                "inline element <{}> inside a segment is not supported",
                name
            )));
        }

        match name {
            "xliff" if self.stack.is_empty() => {
                self.doc = Some(InterchangeDocument::new("", "", ""));
            }
            _ if self.stack.is_empty() => {
                return Err(DeserializeError::InvalidStructure(format!(
                    "root element is <{}>, expected <xliff>",
                    name
                )));
            }
            "unit" => self.unit = Some(TranslationUnit::new("")),
            "segment" if self.unit.is_some() => {
                self.segment = Some(Segment::new("", ""));
            }
            "source" | "target" if self.segment.is_some() && self.current() == "segment" => {
                self.capture = Some(if name == "source" { Capture::Source } else { Capture::Target });
                self.text.clear();
            }
            _ => {}
        }

        self.stack.push(name.to_string());
        Ok(())
    }

    fn attribute(&mut self, prefix: &str, name: &str, value: &str) -> Result<(), DeserializeError> {
        let value = unescape(value)?;
        let element = self.current().to_string();
        match (element.as_str(), prefix, name) {
            ("xliff", "", "version") if !value.starts_with("2.") => {
                return Err(DeserializeError::InvalidStructure(format!(
                    "unsupported XLIFF version {}",
                    value
                )));
            }
            ("xliff", "", "srcLang") => self.doc_mut()?.source_locale = value,
            ("xliff", "", "trgLang") => self.doc_mut()?.target_locale = value,
            ("xliff", "xml", "space") => self.doc_mut()?.preserve_space = value == "preserve",
            ("file", "", "original") => {
                let doc = self.doc_mut()?;
                if doc.original.is_empty() {
                    doc.original = value;
                }
            }
            ("unit", "", "id") => {
                if let Some(unit) = self.unit.as_mut() {
                    unit.field_key = value;
                }
            }
            ("segment", "", "id") => {
                if let Some(segment) = self.segment.as_mut() {
                    segment.id = value;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), DeserializeError> {
        match self.stack.pop() {
            Some(open) if open == name => {}
            Some(open) => {
                return Err(DeserializeError::Malformed(format!(
                    "</{}> does not close <{}>",
                    name, open
                )));
            }
            None => {
                return Err(DeserializeError::Malformed(format!("unexpected </{}>", name)));
            }
        }

        match name {
            "source" | "target" if self.capture.is_some() => {
                let text = std::mem::take(&mut self.text);
                if let Some(segment) = self.segment.as_mut() {
                    match self.capture {
                        Some(Capture::Source) => segment.source = text,
                        _ => segment.target = Some(text),
                    }
                }
                self.capture = None;
            }
            "segment" => {
                if let (Some(mut segment), Some(unit)) = (self.segment.take(), self.unit.as_mut()) {
                    if segment.id.is_empty() {
                        segment.id = format!("{}.{}", unit.field_key, unit.segments.len());
                    }
                    unit.segments.push(segment);
                }
            }
            "unit" => {
                if let Some(unit) = self.unit.take() {
                    if unit.field_key.is_empty() {
                        return Err(DeserializeError::InvalidStructure("<unit> without id".into()));
                    }
                    self.doc_mut()?.units.push(unit);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, raw: &str, escaped: bool) -> Result<(), DeserializeError> {
        if self.capture.is_some() {
            if escaped {
                self.text.push_str(&unescape(raw)?);
            } else {
                self.text.push_str(raw);
            }
        }
        Ok(())
    }
}

/// Parse an XLIFF 2.0 document
pub fn read_document(xml: &str) -> Result<InterchangeDocument, DeserializeError> {
    let mut state = ReaderState::default();

    for token in Tokenizer::from(xml) {
        let token = token.map_err(|e| DeserializeError::Malformed(e.to_string()))?;
        match token {
            Token::ElementStart { local, .. } => state.start(local.as_str())?,
            Token::Attribute { prefix, local, value, .. } => {
                state.attribute(prefix.as_str(), local.as_str(), value.as_str())?
            }
            Token::ElementEnd { end, .. } => match end {
                ElementEnd::Open => {}
                ElementEnd::Close(_, local) => state.end(local.as_str())?,
                ElementEnd::Empty => {
                    let name = state.current().to_string();
                    state.end(&name)?;
                }
            },
            Token::Text { text } => state.text(text.as_str(), true)?,
            Token::Cdata { text, .. } => state.text(text.as_str(), false)?,
            _ => {}
        }
    }

    if !state.stack.is_empty() {
        return Err(DeserializeError::Malformed(format!(
            "<{}> is never closed",
            state.current()
        )));
    }

    let doc = state
        .doc
        .ok_or_else(|| DeserializeError::InvalidStructure("document is empty".into()))?;

    if doc.source_locale.is_empty() {
        return Err(DeserializeError::InvalidStructure("missing srcLang".into()));
    }

    Ok(doc)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text)
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Resolve the predefined entities and character references
fn unescape(text: &str) -> Result<String, DeserializeError> {
    if !text.contains('&') {
        return Ok(text.to_string());
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| DeserializeError::Malformed("unterminated entity reference".into()))?;
        let entity = &after[..semi];

        let resolved = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32).ok_or_else(|| {
                    DeserializeError::Malformed(format!("unknown entity &{};", entity))
                })?
            }
        };

        out.push(resolved);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
