//! Lexical fragments shared by the Topic Maps grammars.
//!
//! Every fragment uses non-capturing groups only, so it can be embedded in a
//! multi-group rule without shifting the group numbering.

use std::sync::OnceLock;

/// Characters that may start an identifier
const IDENT_START_CLASS: &str = concat!(
    r"a-zA-Z_",
    r"\x{C0}-\x{D6}\x{D8}-\x{F6}",
    r"\x{F8}-\x{2FF}\x{370}-\x{37D}",
    r"\x{37F}-\x{1FFF}\x{200C}-\x{200D}",
    r"\x{2070}-\x{218F}\x{2C00}-\x{2FEF}",
    r"\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}",
    r"\x{FDF0}-\x{FFFD}\x{10000}-\x{EFFFF}",
);

/// Extra characters allowed after the first one
const IDENT_PART_EXTRA: &str = r"\-0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

pub fn ident_start() -> String {
    format!("[{}]", IDENT_START_CLASS)
}

pub fn ident_part() -> String {
    format!("[{}{}]", IDENT_START_CLASS, IDENT_PART_EXTRA)
}

/// Identifier with optional single internal dots: `a.b`, never `a..b`
pub fn ident() -> &'static str {
    static IDENT: OnceLock<String> = OnceLock::new();
    IDENT.get_or_init(|| format!(r"{}+(?:\.?{})*", ident_start(), ident_part()))
}

/// `prefix:local`, where the local part may also start with digits
pub fn qname() -> String {
    format!(
        r"{ident}:(?:[0-9]+{part}*|{ident})",
        ident = ident(),
        part = ident_part()
    )
}

/// Bracketed compact IRI: `[prefix:local]`
pub fn curie() -> String {
    format!(r#"\[{}:[^<>"{{}}`\\\] ]+\]"#, ident())
}

/// A run of digits continued like an identifier, as used for numeric names
pub fn numeric_name() -> String {
    format!(r"[0-9]+(?:\.?{})*", ident_part())
}

pub const DATE: &str = concat!(
    r"-?(?:000[1-9]|00[1-9][0-9]|0[1-9][0-9][0-9]|[1-9][0-9][0-9][0-9]+)",
    r"-(?:0[1-9]|1[0-2])",
    r"-(?:0[1-9]|1[0-9]|2[0-9]|3[0-1])",
);

pub const TIME: &str = r"[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?(?:Z|[+\-][0-9]{2}:[0-9]{2})?";

pub fn date_time() -> String {
    format!("{}T{}", DATE, TIME)
}

/// Angle-bracket IRI
pub const IRI: &str = r#"<[^<>"{}`\\ ]+>"#;

/// Bare `scheme://...` IRI
pub const SCHEME_IRI: &str = r"[a-zA-Z]+[a-zA-Z0-9+\-.]*://(?:[;.)]*[^\s;\].()]+)+";

pub const FLOAT: &str = r"[\-+]?(?:[0-9]+\.[0-9]+|\.[0-9]+)";

pub const INTEGER: &str = r"[\-+]?[0-9]+";
