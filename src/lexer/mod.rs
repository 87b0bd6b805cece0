//! Lexical analysis engine.
//!
//! This module provides a generic, table-driven tokenizer: grammars are
//! ordered rule lists grouped into named states, and the engine walks a stack
//! of those states over the input. It knows nothing about any particular
//! syntax; the concrete grammars live in [`crate::grammars`].

#[allow(clippy::module_inception)]
pub mod lexer;
pub mod rule;
pub mod state;
pub mod token;

pub use lexer::Lexer;
pub use rule::{
    delegate, groups, kind, rule, using, Action, Emit, LookaheadDef, Rule, RuleDef, RuleMatch,
    StateId, Transition, TransitionDef,
};
pub use state::{include, Entry, Grammar, GrammarBuilder};
pub use token::{format_tokens, reconstruct, Position, Token, TokenKind};
