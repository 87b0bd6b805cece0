//! tolog grammar tests

use pretty_assertions::assert_eq;
use test_case::test_case;
use tmlex::lexer::reconstruct;
use tmlex::TokenKind as T;
use tmlex::{tokenize, Token, TokenKind};

fn lex(source: &str) -> Vec<(TokenKind, String)> {
    tokenize("tolog", source)
        .unwrap()
        .map(|t| (t.kind, t.text))
        .collect()
}

fn expect(items: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
    items.iter().map(|(k, s)| (*k, s.to_string())).collect()
}

#[test]
fn test_simple_select() {
    assert_eq!(
        lex("select $A from instance-of($A, person)?"),
        expect(&[
            (T::Keyword, "select"),
            (T::Text, " "),
            (T::NameVariable, "$A"),
            (T::Text, " "),
            (T::Keyword, "from"),
            (T::Text, " "),
            (T::NameBuiltin, "instance-of"),
            (T::Punctuation, "("),
            (T::NameVariable, "$A"),
            (T::Punctuation, ","),
            (T::Text, " "),
            (T::Name, "person"),
            (T::Punctuation, ")?"),
        ])
    );
}

#[test]
fn test_keywords_ignore_case() {
    assert_eq!(
        lex("SELECT $A FROM"),
        expect(&[
            (T::Keyword, "SELECT"),
            (T::Text, " "),
            (T::NameVariable, "$A"),
            (T::Text, " "),
            (T::Keyword, "FROM"),
        ])
    );
}

#[test]
fn test_count_is_a_keyword() {
    let tokens = lex("select count($A) from");
    assert_eq!(tokens[2], (T::Keyword, "count".to_string()));
    assert_eq!(tokens[3], (T::Punctuation, "(".to_string()));
}

#[test]
fn test_rule_definition() {
    assert_eq!(
        lex("ancestor($A, $D) :- parent($A, $D)."),
        expect(&[
            (T::NameFunction, "ancestor"),
            (T::Punctuation, "("),
            (T::NameVariable, "$A"),
            (T::Punctuation, ","),
            (T::Text, " "),
            (T::NameVariable, "$D"),
            (T::Punctuation, ")"),
            (T::Text, " "),
            (T::Punctuation, ":-"),
            (T::Text, " "),
            (T::NameFunction, "parent"),
            (T::Punctuation, "("),
            (T::NameVariable, "$A"),
            (T::Punctuation, ","),
            (T::Text, " "),
            (T::NameVariable, "$D"),
            (T::Punctuation, ")."),
        ])
    );
}

#[test]
fn test_import_declaration() {
    assert_eq!(
        lex(r#"import "http://psi.ontopia.net/tolog/string/" as str"#),
        expect(&[
            (T::Keyword, "import"),
            (T::Text, " "),
            (T::LiteralIri, r#""http://psi.ontopia.net/tolog/string/""#),
            (T::Text, " "),
            (T::Keyword, "as"),
            (T::Text, " "),
            (T::NameNamespace, "str"),
        ])
    );
}

#[test]
fn test_using_declaration() {
    assert_eq!(
        lex(r#"using o for i"http://psi.ontopia.net/""#),
        expect(&[
            (T::Keyword, "using"),
            (T::Text, " "),
            (T::NameNamespace, "o"),
            (T::Text, " "),
            (T::Keyword, "for"),
            (T::Text, " "),
            (T::LiteralIri, r#"i"http://psi.ontopia.net/""#),
        ])
    );
}

#[test]
fn test_qualified_predicate_call() {
    assert_eq!(
        lex(r#"str:concat($A, "x")"#),
        expect(&[
            (T::NameFunction, "str:concat"),
            (T::Punctuation, "("),
            (T::NameVariable, "$A"),
            (T::Punctuation, ","),
            (T::Text, " "),
            (T::String, r#""x""#),
            (T::Punctuation, ")"),
        ])
    );
}

#[test]
fn test_nested_block_comment() {
    let mut lexer = tokenize("tolog", "/* a /* b */ c */ select").unwrap();
    let tokens: Vec<Token> = lexer.by_ref().collect();
    assert_eq!(
        tokens.iter().map(|t| t.pair()).collect::<Vec<_>>(),
        vec![
            (T::CommentMultiline, "/*"),
            (T::CommentMultiline, " a "),
            (T::CommentMultiline, "/*"),
            (T::CommentMultiline, " b "),
            (T::CommentMultiline, "*/"),
            (T::CommentMultiline, " c "),
            (T::CommentMultiline, "*/"),
            (T::Text, " "),
            (T::Keyword, "select"),
        ]
    );
    assert!(lexer.is_at_root());
}

#[test]
fn test_insert_body_is_lexed_as_ctm() {
    assert_eq!(
        lex("insert john isa person into tm"),
        expect(&[
            (T::Keyword, "insert"),
            (T::Text, " "),
            (T::Name, "john"),
            (T::Text, " "),
            (T::Keyword, "isa"),
            (T::Text, " "),
            (T::Name, "person"),
            (T::Text, " "),
            (T::Keyword, "into"),
            (T::Text, " "),
            (T::Name, "tm"),
        ])
    );
}

#[test]
fn test_insert_with_from_clause() {
    let source = "INSERT wine:merlot isa wine:red-wine . FROM $x";
    let tokens: Vec<Token> = tokenize("tolog", source).unwrap().collect();

    assert_eq!(
        tokens.iter().map(|t| t.pair()).collect::<Vec<_>>(),
        vec![
            (T::Keyword, "INSERT"),
            (T::Text, " "),
            (T::Name, "wine:merlot"),
            (T::Text, " "),
            (T::Keyword, "isa"),
            (T::Text, " "),
            (T::Name, "wine:red-wine"),
            (T::Text, " "),
            (T::Punctuation, "."),
            (T::Text, " "),
            (T::Keyword, "FROM"),
            (T::Text, " "),
            (T::NameVariable, "$x"),
        ]
    );

    // Delegated tokens carry offsets into the outer text
    assert_eq!(tokens[2].span, 7..18);
    assert_eq!(&source[tokens[2].span.clone()], "wine:merlot");
    assert_eq!(reconstruct(&tokens), source);
}

#[test]
fn test_unterminated_insert_reports_errors() {
    let mut lexer = tokenize("tolog", "insert a").unwrap();
    let tokens: Vec<Token> = lexer.by_ref().collect();
    assert_eq!(tokens[0].pair(), (T::Keyword, "insert"));
    assert!(tokens[1..].iter().all(|t| t.is_error()));
    assert_eq!(lexer.state_stack(), vec!["root", "insert"]);
}

#[test_case("@123", T::NameVariableInstance ; "numeric object id")]
#[test_case("@topic1", T::NameVariableInstance ; "named object id")]
#[test_case("%param%", T::NameVariable ; "parameter")]
#[test_case(r#"s"http://example.org/""#, T::LiteralIri ; "subject indicator")]
#[test_case(r#""say ""hi""""#, T::String ; "doubled quote escape")]
#[test_case("2008-01-01", T::LiteralDate ; "date")]
#[test_case("12.5", T::NumberFloat ; "float")]
#[test_case("42", T::NumberInteger ; "integer")]
#[test_case("[o:topic]", T::Name ; "curie")]
#[test_case("<http://example.org/>", T::LiteralIri ; "iri")]
#[test_case("/=", T::Operator ; "not equal")]
#[test_case("<=", T::Operator ; "less or equal")]
#[test_case("%version", T::Keyword ; "version directive")]
#[test_case("# note", T::CommentSingle ; "line comment")]
fn test_single_token(source: &str, kind: TokenKind) {
    assert_eq!(lex(source), vec![(kind, source.to_string())]);
}

#[test]
fn test_unrecognized_characters_are_errors() {
    assert_eq!(
        lex("a ~ b"),
        expect(&[(T::Name, "a"), (T::Text, " "), (T::Error, "~"), (T::Text, " "), (T::Name, "b")])
    );
}

#[test]
fn test_query_round_trips() {
    let source = r#"using o for i"http://psi.ontopia.net/"
import "http://psi.ontopia.net/tolog/string/" as str

/* composers and their operas */
composed-by($C, $O) :- o:composed-by($O : o:work, $C : o:composer).

select $C, count($O) from
  instance-of($C, o:composer),
  composed-by($C, $O),
  not(str:starts-with($C, "A"))
order by $O desc?
"#;
    let tokens: Vec<Token> = tokenize("tolog", source).unwrap().collect();
    assert_eq!(reconstruct(&tokens), source);
    assert!(tokens.iter().all(|t| !t.is_error()), "{}", tmlex::lexer::format_tokens(&tokens));
}
