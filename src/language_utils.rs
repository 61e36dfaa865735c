//! Track language codes
//!
//! Matroska tracks carry ISO 639-2 codes, often in the bibliographic form
//! (`fre`, `ger`, `chi`), while the config usually says `fr` or `de`. Every
//! comparison goes through one canonical ISO 639-3 code.

use anyhow::{Result, anyhow};
use isolang::Language;

/// ISO 639-2/B codes that differ from their ISO 639-3 counterpart
const BIBLIOGRAPHIC_CODES: [(&str, &str); 18] = [
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("dut", "nld"),
    ("fre", "fra"),
    ("geo", "kat"),
    ("ger", "deu"),
    ("gre", "ell"),
    ("ice", "isl"),
    ("mac", "mkd"),
    ("may", "msa"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

// @returns: The language a 2- or 3-letter code stands for
fn lookup(code: &str) -> Option<Language> {
    let code = code.trim().to_lowercase();

    match code.len() {
        2 => Language::from_639_1(&code),
        3 => Language::from_639_3(&code).or_else(|| {
            BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == code)
                .and_then(|(_, terminological)| Language::from_639_3(terminological))
        }),
        _ => None,
    }
}

/// Canonical three-letter form of a language code, e.g. `fr` and `fre` give `fra`
pub fn canonical_code(code: &str) -> Result<&'static str> {
    lookup(code)
        .map(|language| language.to_639_3())
        .ok_or_else(|| anyhow!("Unknown language code: '{}'", code))
}

/// English name of a language code, for log output
pub fn language_name(code: &str) -> Option<&'static str> {
    lookup(code).map(|language| language.to_name())
}

/// Check that a code is a usable ISO 639-1 or ISO 639-2 language code
pub fn validate_language_code(code: &str) -> Result<()> {
    canonical_code(code).map(|_| ())
}

/// True when both codes name the same language; unknown codes never match
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    matches!((lookup(code1), lookup(code2)), (Some(a), Some(b)) if a == b)
}
