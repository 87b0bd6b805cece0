//! tolog query language, including the tolog+ update statements.
//!
//! The body of an `insert` clause is CTM, so it is handed to the CTM grammar
//! up to the keyword that ends the clause.

use super::patterns::{curie, date_time, ident, qname, DATE, FLOAT, INTEGER, IRI};
use super::GrammarId;
use crate::entries;
use crate::error::TmlexResult;
use crate::lexer::{groups, include, kind, rule, using, Grammar, GrammarBuilder, TokenKind};
use std::sync::Arc;

const BUILTINS: &[&str] = &[
    "association",
    "association-role",
    "base-locator",
    "datatype",
    "direct-instance-of",
    "instance-of",
    "item-identifier",
    "object-id",
    "occurrence",
    "reifies",
    "resource",
    "role-player",
    "scope",
    "source-locator",
    "subject-identifier",
    "subject-locator",
    "topic",
    "topicmap",
    "topic-name",
    "type",
    "value",
    "value-like",
    "variant",
];

/// Build the grammar. `ctm` is the handle `insert` bodies are delegated to.
pub fn build(ctm: Arc<Grammar>) -> TmlexResult<Grammar> {
    let ident = ident();
    let call = [
        kind(TokenKind::NameFunction),
        kind(TokenKind::Text),
        kind(TokenKind::Punctuation),
    ];

    GrammarBuilder::new("tolog", "root")
        .delegate(GrammarId::Ctm, ctm)
        .state(
            "root",
            entries![
                rule(r"\s+", TokenKind::Text),
                rule(r"#[^\n]*", TokenKind::CommentSingle),
                rule(r"/\*", TokenKind::CommentMultiline).push("multiline-comments"),
                include("builtins"),
                rule(
                    r"(?i)(?:select|delete|update|from|merge|order|by|asc|desc|count|not)\b",
                    TokenKind::Keyword,
                ),
                rule(r"(?i)(?:create|load|drop|into|where)\b", TokenKind::Keyword),
                groups(
                    format!(r#"(?i)(import)(\s+)("(?:[^"]|"{{2}})*")(\s+)(as)(\s+)({})"#, ident),
                    [
                        kind(TokenKind::Keyword),
                        kind(TokenKind::Text),
                        kind(TokenKind::LiteralIri),
                        kind(TokenKind::Text),
                        kind(TokenKind::Keyword),
                        kind(TokenKind::Text),
                        kind(TokenKind::NameNamespace),
                    ],
                ),
                groups(
                    format!(r#"(?i)(using)(\s+)({})(\s+)(for)(\s+)([ias]"(?:[^"]|"{{2}})*")"#, ident),
                    [
                        kind(TokenKind::Keyword),
                        kind(TokenKind::Text),
                        kind(TokenKind::NameNamespace),
                        kind(TokenKind::Text),
                        kind(TokenKind::Keyword),
                        kind(TokenKind::Text),
                        kind(TokenKind::LiteralIri),
                    ],
                ),
                groups(
                    format!(r"(%prefix|%import)(\s+)({})(\s+)(\S+)", ident),
                    [
                        kind(TokenKind::Keyword),
                        kind(TokenKind::Text),
                        kind(TokenKind::NameNamespace),
                        kind(TokenKind::Text),
                        kind(TokenKind::LiteralIri),
                    ],
                ),
                rule(r"(?:%version|%base|%x-\S+)\b", TokenKind::Keyword),
                rule(r"(?i)insert\b", TokenKind::Keyword).push("insert"),
                rule(r#"[ias]"(?:[^"]|"{2})*""#, TokenKind::LiteralIri),
                rule(r#""(?:[^"]|"{2})*""#, TokenKind::String),
                rule(
                    format!(r"@(?:[0-9]+|[0-9]*{})", ident),
                    TokenKind::NameVariableInstance,
                ),
                rule(format!(r"\${}", ident), TokenKind::NameVariable),
                rule(format!(r"%{}%", ident), TokenKind::NameVariable),
                rule(date_time(), TokenKind::LiteralDate),
                rule(DATE, TokenKind::LiteralDate),
                rule(FLOAT, TokenKind::NumberFloat),
                rule(INTEGER, TokenKind::NumberInteger),
                // Rule head: `name(...) :- ...`
                groups(format!(r"({})(\s*)(\()", ident), call).followed_by(r".+?:-"),
                // Predicate call, unless the line continues with `: ` (a map key)
                groups(
                    format!(r"((?:{})|(?:{})|(?:{}))(\s*)(\()", ident, qname(), curie()),
                    call,
                )
                .not_followed_by(r".+?:\s+"),
                rule(curie(), TokenKind::Name),
                rule(qname(), TokenKind::Name),
                rule(ident, TokenKind::Name),
                rule(IRI, TokenKind::LiteralIri),
                rule(r"[(),{}|.^:\-?]+", TokenKind::Punctuation),
                rule(r"/?=|<=?|>=?", TokenKind::Operator),
            ],
        )
        .state(
            "builtins",
            entries![groups(
                format!(r"({})(\s*)(\()", BUILTINS.join("|")),
                [
                    kind(TokenKind::NameBuiltin),
                    kind(TokenKind::Text),
                    kind(TokenKind::Punctuation),
                ],
            )
            .at_word_start()],
        )
        .state(
            "insert",
            entries![groups(
                r"(?is)(.+?)(\b(?:into|from|where)\b)",
                [using(GrammarId::Ctm), kind(TokenKind::Keyword)],
            )
            .pop()],
        )
        .state(
            "multiline-comments",
            entries![
                rule(r"/\*", TokenKind::CommentMultiline).push_same(),
                rule(r"\*/", TokenKind::CommentMultiline).pop(),
                rule(r"[^/*]+", TokenKind::CommentMultiline),
                rule(r"[/*]", TokenKind::CommentMultiline),
            ],
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_ctm_delegate() {
        let ctm = Arc::new(super::super::ctm::build().unwrap());
        let grammar = build(Arc::clone(&ctm)).unwrap();
        assert!(grammar.delegate(GrammarId::Ctm).is_some());
        assert!(grammar.delegate(GrammarId::Crtm).is_none());
        assert_eq!(grammar.state_name(grammar.root()), "root");
    }
}
