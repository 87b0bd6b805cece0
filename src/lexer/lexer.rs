//! The tokenizer engine.
//!
//! A [`Lexer`] owns a stack of lexical states and a cursor over its text. Each
//! step tries the effective rules of the state on top of the stack in order,
//! emits the first match, applies its transition and advances. Input that no
//! rule matches is consumed one character at a time as `Error` tokens, so a
//! run always reaches the end of the text.

use crate::config::LexOptions;
use crate::grammars::GrammarId;
use crate::lexer::rule::{Action, Emit, RuleMatch, StateId, Transition};
use crate::lexer::state::Grammar;
use crate::lexer::token::{Position, Token, TokenKind};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::ops::Range;
use std::sync::Arc;

/// A single tokenization run over one text.
///
/// Tokens are produced lazily through [`Iterator`]. The grammar is shared and
/// read-only; the stack, cursor and pending tokens belong to this run alone.
#[derive(Debug)]
pub struct Lexer<'t> {
    grammar: Arc<Grammar>,
    text: Cow<'t, str>,
    cursor: usize,
    stack: Vec<StateId>,
    pending: VecDeque<Token>,
    /// Position of the first byte not yet covered by an emitted token
    position: Position,
    emitted_to: usize,
    /// States that already accepted a zero-length match at `cursor`
    zero_width: Vec<StateId>,
}

impl<'t> Lexer<'t> {
    pub fn new(grammar: Arc<Grammar>, text: &'t str) -> Self {
        Self::with_options(grammar, text, &LexOptions::default())
    }

    pub fn with_options(grammar: Arc<Grammar>, text: &'t str, options: &LexOptions) -> Self {
        let root = grammar.root();
        Self {
            grammar,
            text: options.prepare(text),
            cursor: 0,
            stack: vec![root],
            pending: VecDeque::new(),
            position: Position::new(),
            emitted_to: 0,
            zero_width: Vec::new(),
        }
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// The text being tokenized, after preprocessing
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the next unconsumed character
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current state stack by name, bottom first
    pub fn state_stack(&self) -> Vec<&str> {
        self.stack.iter().map(|&id| self.grammar.state_name(id)).collect()
    }

    /// Whether the stack is back to just the root state, i.e. every nested
    /// construct opened so far has been closed
    pub fn is_at_root(&self) -> bool {
        self.stack == [self.grammar.root()]
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty() && self.cursor >= self.text.len()
    }

    /// Drain the remaining tokens
    pub fn collect_tokens(self) -> Vec<Token> {
        self.collect()
    }

    fn current_state(&self) -> StateId {
        self.stack.last().copied().unwrap_or_else(|| self.grammar.root())
    }

    fn step(&mut self) {
        let state = self.current_state();
        let grammar = Arc::clone(&self.grammar);

        let mut selected = None;
        for rule in grammar.rules(state) {
            let Some(m) = rule.match_at(&self.text, self.cursor) else {
                continue;
            };
            if m.is_empty() {
                if self.zero_width.contains(&state) {
                    continue;
                }
                self.zero_width.push(state);
            }
            selected = Some((rule, m));
            break;
        }

        match selected {
            Some((rule, m)) => {
                log::trace!(
                    "{}[{}] {} matched {:?}",
                    grammar.name(),
                    grammar.state_name(state),
                    rule.pattern(),
                    &self.text[m.span.clone()]
                );
                self.emit_match(rule.action(), &m);
                if m.span.end > self.cursor {
                    self.advance_to(m.span.end);
                }
                self.apply(rule.transition());
            }
            None => {
                let width = self.text[self.cursor..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
                let end = self.cursor + width;
                log::trace!(
                    "{}[{}] no rule matched at byte {}",
                    grammar.name(),
                    grammar.state_name(state),
                    self.cursor
                );
                self.emit(TokenKind::Error, self.cursor..end);
                self.advance_to(end);
            }
        }
    }

    fn advance_to(&mut self, end: usize) {
        self.cursor = end;
        self.zero_width.clear();
    }

    fn emit_match(&mut self, action: &Action, m: &RuleMatch) {
        match action {
            Action::Token(kind) => self.emit(*kind, m.span.clone()),
            Action::Delegate(id) => self.delegate(*id, m.span.clone()),
            Action::Groups(emits) => {
                let mut last = m.span.start;
                for (group, emit) in m.groups.iter().zip(emits) {
                    let (Some(range), Some(emit)) = (group, emit) else {
                        continue;
                    };
                    // Empty groups emit nothing; nested groups were covered by their parent.
                    if range.is_empty() || range.start < last {
                        continue;
                    }
                    if range.start > last {
                        self.emit(TokenKind::Text, last..range.start);
                    }
                    match emit {
                        Emit::Kind(kind) => self.emit(*kind, range.clone()),
                        Emit::Delegate(id) => self.delegate(*id, range.clone()),
                    }
                    last = range.end;
                }
                if last < m.span.end {
                    self.emit(TokenKind::Text, last..m.span.end);
                }
            }
        }
    }

    /// Run `range` through a fresh lexer for another grammar and splice its
    /// tokens into this stream
    fn delegate(&mut self, id: GrammarId, range: Range<usize>) {
        let Some(child) = self.grammar.delegate(id).cloned() else {
            // Builder rejects unresolved targets; keep the text anyway.
            self.emit(TokenKind::Text, range);
            return;
        };
        log::debug!(
            "{} delegating {} bytes to {}",
            self.grammar.name(),
            range.len(),
            child.name()
        );

        let tokens: Vec<Token> = Lexer::new(child, &self.text[range.clone()]).collect();
        for token in tokens {
            let start = range.start + token.span.start;
            let end = range.start + token.span.end;
            self.emit(token.kind, start..end);
        }
    }

    fn emit(&mut self, kind: TokenKind, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        debug_assert_eq!(range.start, self.emitted_to, "tokens must be contiguous");

        let text = self.text[range.clone()].to_string();
        let position = self.position;
        self.position.advance_str(&text);
        self.emitted_to = range.end;
        self.pending.push_back(Token {
            kind,
            text,
            span: range,
            position,
        });
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Push(state) => self.stack.push(state),
            Transition::PushSame => self.stack.push(self.current_state()),
            Transition::Pop => {
                // The bottom state is never popped.
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.cursor >= self.text.len() {
                return None;
            }
            self.step();
        }
    }
}

impl FusedIterator for Lexer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries;
    use crate::lexer::rule::{groups, kind, rule};
    use crate::lexer::state::GrammarBuilder;

    fn pairs(lexer: Lexer<'_>) -> Vec<(TokenKind, String)> {
        lexer.map(|t| (t.kind, t.text)).collect()
    }

    fn words() -> Arc<Grammar> {
        Arc::new(
            GrammarBuilder::new("words", "root")
                .state(
                    "root",
                    entries![
                        rule(r"\s+", TokenKind::Text),
                        rule(r"[a-z]+", TokenKind::Name),
                        rule(r"\{", TokenKind::Punctuation).push("block"),
                    ],
                )
                .state(
                    "block",
                    entries![
                        rule(r"\{", TokenKind::Punctuation).push_same(),
                        rule(r"\}", TokenKind::Punctuation).pop(),
                        rule(r"[^{}]+", TokenKind::String),
                    ],
                )
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_basic_tokenization() {
        let tokens = pairs(Lexer::new(words(), "ab cd"));
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Name, "ab".to_string()),
                (TokenKind::Text, " ".to_string()),
                (TokenKind::Name, "cd".to_string()),
            ]
        );
    }

    #[test]
    fn test_error_fallback_is_one_char() {
        let tokens = pairs(Lexer::new(words(), "a1é"));
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Name, "a".to_string()),
                (TokenKind::Error, "1".to_string()),
                (TokenKind::Error, "é".to_string()),
            ]
        );
    }

    #[test]
    fn test_push_same_and_pop_nest() {
        let mut lexer = Lexer::new(words(), "{a{b}c");
        let tokens: Vec<Token> = lexer.by_ref().collect();
        assert_eq!(tokens.len(), 6);
        assert_eq!(lexer.state_stack(), vec!["root", "block"]);
        assert!(!lexer.is_at_root());

        let mut closed = Lexer::new(words(), "{a{b}c}");
        closed.by_ref().for_each(drop);
        assert!(closed.is_at_root());
    }

    #[test]
    fn test_pop_on_root_is_noop() {
        let grammar = Arc::new(
            GrammarBuilder::new("pop", "root")
                .state("root", entries![rule(r"x", TokenKind::Keyword).pop()])
                .build()
                .unwrap(),
        );
        let mut lexer = Lexer::new(grammar, "xx");
        assert_eq!(lexer.by_ref().count(), 2);
        assert_eq!(lexer.state_stack(), vec!["root"]);
    }

    #[test]
    fn test_group_gaps_become_text() {
        let grammar = Arc::new(
            GrammarBuilder::new("gaps", "root")
                .state(
                    "root",
                    entries![groups(
                        r"<(\w+)=(\w+)>",
                        [kind(TokenKind::NameVariable), None],
                    )],
                )
                .build()
                .unwrap(),
        );
        let tokens = pairs(Lexer::new(grammar, "<k=v>"));
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Text, "<".to_string()),
                (TokenKind::NameVariable, "k".to_string()),
                (TokenKind::Text, "=v>".to_string()),
            ]
        );
    }

    #[test]
    fn test_zero_length_matches_terminate() {
        let grammar = Arc::new(
            GrammarBuilder::new("empty", "root")
                .state(
                    "root",
                    entries![
                        rule(r"", TokenKind::Text).push("other"),
                        rule(r"a", TokenKind::Name),
                    ],
                )
                .state("other", entries![rule(r"", TokenKind::Text).push_same()])
                .build()
                .unwrap(),
        );
        let tokens = pairs(Lexer::new(grammar, "ab"));
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Error, "a".to_string()),
                (TokenKind::Error, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_positions_track_lines() {
        let tokens: Vec<Token> = Lexer::new(words(), "a\n  bc").collect();
        let last = tokens.last().unwrap();
        assert_eq!(last.text, "bc");
        assert_eq!(last.position, Position { line: 2, column: 3 });
        assert_eq!(last.span, 4..6);
    }

    #[test]
    fn test_options_change_tokenized_text() {
        let options = LexOptions::highlighting();
        let lexer = Lexer::with_options(words(), "ab", &options);
        assert_eq!(lexer.text(), "ab\n");
        assert_eq!(lexer.count(), 2);
    }
}
