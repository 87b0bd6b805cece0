//! Compact RDF to Topic Maps (CRTM) mapping syntax.
//!
//! Keywords such as `name` or `isa` are only keywords on the right-hand side
//! of a `:` or `;`. The `rhs` state is entered on the separator and left again
//! after the first significant token.

use super::patterns::{ident, numeric_name, qname, IRI};
use crate::entries;
use crate::error::TmlexResult;
use crate::lexer::{groups, kind, rule, Grammar, GrammarBuilder, TokenKind};

const RHS_KEYWORDS: &[&str] = &[
    "association",
    "assoc",
    "occurrence",
    "occ",
    "name",
    "-",
    "isa",
    "ako",
    "item-identifier",
    "iid",
    "subject-identifier",
    "sid",
    "subject-locator",
    "slo",
    "true",
    "false",
];

pub fn build() -> TmlexResult<Grammar> {
    let name = format!("{}|{}", ident(), numeric_name());
    let keywords = RHS_KEYWORDS
        .iter()
        .map(|kw| regex::escape(kw))
        .collect::<Vec<_>>()
        .join("|");

    GrammarBuilder::new("CRTM", "root")
        .state(
            "root",
            entries![
                rule(r"\s+", TokenKind::Text),
                rule(r"#[^\n]*", TokenKind::CommentSingle),
                groups(
                    format!(r"(%prefix)(\s+)({})(\s+)(\S+)", ident()),
                    [
                        kind(TokenKind::Keyword),
                        kind(TokenKind::Text),
                        kind(TokenKind::NameNamespace),
                        kind(TokenKind::Text),
                        kind(TokenKind::LiteralIri),
                    ],
                ),
                groups(
                    r"(%langtoscope)(\s+)(true|false)",
                    [
                        kind(TokenKind::Keyword),
                        kind(TokenKind::Text),
                        kind(TokenKind::Keyword),
                    ],
                ),
                rule(r"%include\b", TokenKind::Keyword),
                rule(IRI, TokenKind::LiteralIri),
                rule(qname(), TokenKind::Name),
                rule(name.as_str(), TokenKind::Name),
                rule(r"[:;]", TokenKind::Punctuation).push("rhs"),
                rule(r"[=(),{}@]+", TokenKind::Punctuation),
            ],
        )
        .state(
            "rhs",
            entries![
                rule(r"\s+", TokenKind::Text),
                rule(r"lang", TokenKind::Keyword),
                rule(keywords, TokenKind::Keyword).pop(),
                rule(IRI, TokenKind::LiteralIri).pop(),
                rule(qname(), TokenKind::Name).pop(),
                rule(name.as_str(), TokenKind::Name).pop(),
                rule(r"=", TokenKind::Punctuation),
                rule(r"[()@]", TokenKind::Punctuation).pop(),
            ],
        )
        .build()
}
