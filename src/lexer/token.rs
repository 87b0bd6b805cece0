//! Token definitions

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;

/// Classification attached to every token.
///
/// The taxonomy is hierarchical (`Name.Variable.Instance` is a kind of
/// `Name.Variable`, which is a kind of `Name`) but closed: the hierarchy is
/// spelled out by [`TokenKind::parent`] rather than built at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Text,
    Error,

    Keyword,
    KeywordConstant,

    Name,
    NameBuiltin,
    NameFunction,
    NameNamespace,
    NameVariable,
    NameVariableInstance,

    Literal,
    LiteralIri,
    LiteralDate,
    String,
    Number,
    NumberInteger,
    NumberFloat,

    Comment,
    CommentSingle,
    CommentMultiline,

    Operator,
    Punctuation,
}

impl TokenKind {
    pub const ALL: [TokenKind; 22] = [
        TokenKind::Text,
        TokenKind::Error,
        TokenKind::Keyword,
        TokenKind::KeywordConstant,
        TokenKind::Name,
        TokenKind::NameBuiltin,
        TokenKind::NameFunction,
        TokenKind::NameNamespace,
        TokenKind::NameVariable,
        TokenKind::NameVariableInstance,
        TokenKind::Literal,
        TokenKind::LiteralIri,
        TokenKind::LiteralDate,
        TokenKind::String,
        TokenKind::Number,
        TokenKind::NumberInteger,
        TokenKind::NumberFloat,
        TokenKind::Comment,
        TokenKind::CommentSingle,
        TokenKind::CommentMultiline,
        TokenKind::Operator,
        TokenKind::Punctuation,
    ];

    /// Stable dotted name, e.g. `Name.Variable.Instance`
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Text => "Text",
            TokenKind::Error => "Error",
            TokenKind::Keyword => "Keyword",
            TokenKind::KeywordConstant => "Keyword.Constant",
            TokenKind::Name => "Name",
            TokenKind::NameBuiltin => "Name.Builtin",
            TokenKind::NameFunction => "Name.Function",
            TokenKind::NameNamespace => "Name.Namespace",
            TokenKind::NameVariable => "Name.Variable",
            TokenKind::NameVariableInstance => "Name.Variable.Instance",
            TokenKind::Literal => "Literal",
            TokenKind::LiteralIri => "Literal.IRI",
            TokenKind::LiteralDate => "Literal.Date",
            TokenKind::String => "String",
            TokenKind::Number => "Number",
            TokenKind::NumberInteger => "Number.Integer",
            TokenKind::NumberFloat => "Number.Float",
            TokenKind::Comment => "Comment",
            TokenKind::CommentSingle => "Comment.Single",
            TokenKind::CommentMultiline => "Comment.Multiline",
            TokenKind::Operator => "Operator",
            TokenKind::Punctuation => "Punctuation",
        }
    }

    /// Inverse of [`TokenKind::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// The enclosing kind, `None` for top-level kinds.
    ///
    /// `String` and `Number` sit under `Literal` even though their names
    /// are not dotted.
    pub fn parent(self) -> Option<Self> {
        match self {
            TokenKind::KeywordConstant => Some(TokenKind::Keyword),
            TokenKind::NameBuiltin
            | TokenKind::NameFunction
            | TokenKind::NameNamespace
            | TokenKind::NameVariable => Some(TokenKind::Name),
            TokenKind::NameVariableInstance => Some(TokenKind::NameVariable),
            TokenKind::LiteralIri
            | TokenKind::LiteralDate
            | TokenKind::String
            | TokenKind::Number => Some(TokenKind::Literal),
            TokenKind::NumberInteger | TokenKind::NumberFloat => Some(TokenKind::Number),
            TokenKind::CommentSingle | TokenKind::CommentMultiline => Some(TokenKind::Comment),
            TokenKind::Text
            | TokenKind::Error
            | TokenKind::Keyword
            | TokenKind::Name
            | TokenKind::Literal
            | TokenKind::Comment
            | TokenKind::Operator
            | TokenKind::Punctuation => None,
        }
    }

    /// Whether `self` equals `ancestor` or is nested somewhere below it
    pub fn is_a(self, ancestor: TokenKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Position tracking for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new() -> Self {
        Position { line: 1, column: 1 }
    }

    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    pub fn advance_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.advance(ch);
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A classified slice of the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact matched text
    pub text: String,
    /// Byte range in the tokenized text
    pub span: Range<usize>,
    /// Line and column of the first character
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        let text = text.into();
        let span = 0..text.len();
        Self {
            kind,
            text,
            span,
            position: Position::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }

    /// Kind and text only, handy for comparing streams
    pub fn pair(&self) -> (TokenKind, &str) {
        (self.kind, self.text.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.text)
    }
}

/// Debug helper: one `kind "text" @ line:col` entry per line
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{} @ {}", t, t.position))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Concatenate the text of every token in order
pub fn reconstruct(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}
