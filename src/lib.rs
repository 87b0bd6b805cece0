//! Topic Maps syntax tokenizers
//!
//! This library turns CTM, tolog and CRTM text into an ordered stream of
//! classified tokens that covers every byte of the input. It is built for
//! syntax highlighting: malformed input never fails, it shows up as `Error`
//! tokens and tokenization carries on.
//!
//! ```
//! use tmlex::{tokenize, TokenKind};
//!
//! let tokens: Vec<_> = tokenize("CTM", "<http://example.org/x>").unwrap().collect();
//! assert_eq!(tokens[0].kind, TokenKind::LiteralIri);
//! ```

pub mod config;
pub mod error;
pub mod grammars;
pub mod lexer;

// Re-export commonly used types
pub use config::LexOptions;
pub use error::{ErrorKind, TmlexError, TmlexResult};
pub use grammars::{GrammarId, GrammarInfo};
pub use lexer::{Grammar, GrammarBuilder, Lexer, Position, Token, TokenKind};

use std::fs;
use std::path::Path;

/// Tokenize `text` with the grammar registered under `grammar_name`.
///
/// The returned lexer is a lazy, single-pass iterator. Concatenating the
/// text of its tokens reproduces `text` exactly.
pub fn tokenize<'t>(grammar_name: &str, text: &'t str) -> TmlexResult<Lexer<'t>> {
    tokenize_with(grammar_name, text, &LexOptions::default())
}

/// Like [`tokenize`], preparing the text with `options` first
pub fn tokenize_with<'t>(
    grammar_name: &str,
    text: &'t str,
    options: &LexOptions,
) -> TmlexResult<Lexer<'t>> {
    let grammar = grammars::by_name(grammar_name)?;
    Ok(Lexer::with_options(grammar, text, options))
}

/// Read a file and tokenize it with the grammar its file name maps to
pub fn tokenize_file(path: impl AsRef<Path>) -> TmlexResult<Vec<Token>> {
    let path = path.as_ref();
    let id = GrammarId::for_filename(path)
        .ok_or_else(|| TmlexError::UnknownGrammar(path.display().to_string()))?;
    let source = fs::read_to_string(path)?;
    let grammar = grammars::grammar(id)?;
    Ok(Lexer::new(grammar, &source).collect())
}
