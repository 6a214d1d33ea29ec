use anyhow::{Result, anyhow};
use isolang::Language;

/// Locale utilities
///
/// Jobs carry locale tags such as `en-US`, `fr_FR` or plain `de`. The
/// connector only checks that the primary subtag is a real ISO 639 language
/// and compares tags loosely; region subtags are passed through untouched.

/// ISO 639-2/B codes that differ from their 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Resolve a primary language subtag to an isolang language
fn primary_language(subtag: &str) -> Option<Language> {
    let code = subtag.trim().to_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == code)
                .map(|(_, t)| *t)
                .unwrap_or(code.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Normalize a locale tag: `_` becomes `-`, language lowercased, region uppercased
pub fn normalize_locale(tag: &str) -> String {
    let mut parts = tag.trim().split(['-', '_']).filter(|p| !p.is_empty());
    let mut normalized = match parts.next() {
        Some(language) => language.to_lowercase(),
        None => return String::new(),
    };

    for part in parts {
        normalized.push('-');
        if part.len() == 2 {
            normalized.push_str(&part.to_uppercase());
        } else {
            normalized.push_str(part);
        }
    }

    normalized
}

/// Validate a locale tag and return its normalized form
pub fn validate_locale(tag: &str) -> Result<String> {
    let normalized = normalize_locale(tag);
    let primary = normalized.split('-').next().unwrap_or_default();

    if primary.is_empty() {
        return Err(anyhow!("Locale is empty"));
    }

    if primary_language(primary).is_none() {
        return Err(anyhow!("Invalid locale: {}", tag));
    }

    Ok(normalized)
}

/// Check whether two locale tags denote the same locale
pub fn locales_match(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_locale(a), normalize_locale(b));
    !a.is_empty() && a.eq_ignore_ascii_case(&b)
}

/// Get the English name of the locale's language
pub fn get_language_name(tag: &str) -> Result<String> {
    let normalized = validate_locale(tag)?;
    let primary = normalized.split('-').next().unwrap_or_default();
    let lang = primary_language(primary)
        .ok_or_else(|| anyhow!("Failed to get language from locale: {}", tag))?;

    Ok(lang.to_name().to_string())
}
