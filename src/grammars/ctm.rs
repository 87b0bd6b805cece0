//! Compact Topic Maps (CTM) syntax.

use super::patterns::{date_time, ident, qname, DATE, FLOAT, INTEGER, IRI, SCHEME_IRI};
use crate::entries;
use crate::error::TmlexResult;
use crate::lexer::{groups, include, kind, rule, Grammar, GrammarBuilder, TokenKind};

pub fn build() -> TmlexResult<Grammar> {
    let ident = ident();

    GrammarBuilder::new("CTM", "root")
        .state(
            "root",
            entries![
                rule(r"\s+", TokenKind::Text),
                groups(
                    format!(r"(def)(\s+)({})", ident),
                    [
                        kind(TokenKind::Keyword),
                        kind(TokenKind::Text),
                        kind(TokenKind::NameFunction),
                    ],
                ),
                include("iris"),
                rule(r"(?:end|isa|ako)\b", TokenKind::Keyword),
                groups(
                    format!(r"(%prefix)(\s+)({})(\s+)(\S+)", ident),
                    [
                        kind(TokenKind::Keyword),
                        kind(TokenKind::Text),
                        kind(TokenKind::NameNamespace),
                        kind(TokenKind::Text),
                        kind(TokenKind::LiteralIri),
                    ],
                ),
                rule(r"(?:%encoding|%version|%include|%mergemap)\b", TokenKind::Keyword),
                rule(r"\*", TokenKind::KeywordConstant),
                rule(r#""{3}(?:[^"\\]|\\[\\"rntuU]|"|"")*"{3}"#, TokenKind::String),
                rule(r#""(?:[^"\\]|\\[\\"rntuU])*""#, TokenKind::String),
                rule(format!(r"\?{}", ident), TokenKind::NameVariableInstance),
                rule(r"\?", TokenKind::NameVariableInstance),
                rule(format!(r"\${}", ident), TokenKind::NameVariable),
                rule(date_time(), TokenKind::LiteralDate),
                rule(DATE, TokenKind::LiteralDate),
                rule(FLOAT, TokenKind::NumberFloat),
                rule(INTEGER, TokenKind::NumberInteger),
                // A call, unless a later `:` on the line marks it as something else
                groups(
                    format!(r"({})(\s*)(\()", ident),
                    [
                        kind(TokenKind::NameFunction),
                        kind(TokenKind::Text),
                        kind(TokenKind::Punctuation),
                    ],
                )
                .not_followed_by(r".+?:"),
                rule(qname(), TokenKind::Name),
                rule(ident, TokenKind::Name),
                rule(r"#\(", TokenKind::CommentMultiline).push("multiline-comments"),
                rule(r"#[^\n]*", TokenKind::CommentSingle),
                rule(r"[\[\](),;\-.=^@:]+", TokenKind::Punctuation),
            ],
        )
        .state(
            "multiline-comments",
            entries![
                rule(r"\)#", TokenKind::CommentMultiline).pop(),
                rule(r"#\(", TokenKind::CommentMultiline).push_same(),
                rule(r"[^#()]+", TokenKind::CommentMultiline),
                rule(r"[#()]", TokenKind::CommentMultiline),
            ],
        )
        .state(
            "iris",
            entries![
                rule(IRI, TokenKind::LiteralIri),
                rule(SCHEME_IRI, TokenKind::LiteralIri),
            ],
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_flattened_iris() {
        let grammar = build().unwrap();
        let root = grammar.root();
        assert_eq!(grammar.state_name(root), "root");
        // 21 own rules plus the two spliced in from "iris"
        assert_eq!(grammar.rules(root).len(), 23);
        assert!(grammar.state_id("multiline-comments").is_some());
    }
}
