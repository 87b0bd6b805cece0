//! Pattern rules: an anchored pattern, what to emit, and where to go next.

use crate::grammars::GrammarId;
use crate::lexer::token::TokenKind;
use regex::Regex;
use std::ops::Range;

/// What a single capture group turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    Kind(TokenKind),
    /// Tokenize the group's text from scratch with another grammar
    Delegate(GrammarId),
}

/// What a matching rule emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The whole match as one token
    Token(TokenKind),
    /// One entry per capture group, in group order. `None` entries (and any
    /// unclaimed text around the groups) come out as `Text`.
    Groups(Vec<Option<Emit>>),
    /// The whole match handed to another grammar
    Delegate(GrammarId),
}

impl Action {
    pub(crate) fn delegates(&self) -> impl Iterator<Item = GrammarId> + '_ {
        let (whole, groups): (Option<GrammarId>, &[Option<Emit>]) = match self {
            Action::Token(_) => (None, &[]),
            Action::Groups(groups) => (None, groups.as_slice()),
            Action::Delegate(id) => (Some(*id), &[]),
        };
        whole.into_iter().chain(groups.iter().filter_map(|g| match g {
            Some(Emit::Delegate(id)) => Some(*id),
            _ => None,
        }))
    }

    fn needs_groups(&self) -> bool {
        matches!(self, Action::Groups(_))
    }
}

/// State-stack change applied after a rule fires, before state names are
/// resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionDef {
    None,
    Push(String),
    Pop,
    PushSame,
}

/// Resolved index of a lexical state inside its grammar
pub type StateId = usize;

/// State-stack change applied after a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(StateId),
    Pop,
    PushSame,
}

/// Condition on the text right after a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookaheadDef {
    FollowedBy(String),
    NotFollowedBy(String),
}

impl LookaheadDef {
    pub fn pattern(&self) -> &str {
        match self {
            LookaheadDef::FollowedBy(p) | LookaheadDef::NotFollowedBy(p) => p,
        }
    }
}

/// A rule as written in a grammar definition, before compilation.
///
/// Built with [`rule`] or [`groups`] and the chained modifiers below.
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub pattern: String,
    pub action: Action,
    pub transition: TransitionDef,
    pub lookahead: Option<LookaheadDef>,
    pub word_start: bool,
}

/// Emit the whole match as `kind`
pub fn rule(pattern: impl Into<String>, kind: TokenKind) -> RuleDef {
    RuleDef::new(pattern, Action::Token(kind))
}

/// Emit each capture group as the matching entry of `kinds`
pub fn groups<I>(pattern: impl Into<String>, kinds: I) -> RuleDef
where
    I: IntoIterator<Item = Option<Emit>>,
{
    RuleDef::new(pattern, Action::Groups(kinds.into_iter().collect()))
}

/// Hand the whole match to `grammar`
pub fn delegate(pattern: impl Into<String>, grammar: GrammarId) -> RuleDef {
    RuleDef::new(pattern, Action::Delegate(grammar))
}

/// Shorthand for a group entry emitted as `kind`
pub fn kind(kind: TokenKind) -> Option<Emit> {
    Some(Emit::Kind(kind))
}

/// Shorthand for a group entry delegated to `grammar`
pub fn using(grammar: GrammarId) -> Option<Emit> {
    Some(Emit::Delegate(grammar))
}

impl RuleDef {
    pub fn new(pattern: impl Into<String>, action: Action) -> Self {
        Self {
            pattern: pattern.into(),
            action,
            transition: TransitionDef::None,
            lookahead: None,
            word_start: false,
        }
    }

    pub fn push(mut self, state: impl Into<String>) -> Self {
        self.transition = TransitionDef::Push(state.into());
        self
    }

    pub fn pop(mut self) -> Self {
        self.transition = TransitionDef::Pop;
        self
    }

    pub fn push_same(mut self) -> Self {
        self.transition = TransitionDef::PushSame;
        self
    }

    /// Only match when the remaining text starts with `pattern`
    pub fn followed_by(mut self, pattern: impl Into<String>) -> Self {
        self.lookahead = Some(LookaheadDef::FollowedBy(pattern.into()));
        self
    }

    /// Only match when the remaining text does not start with `pattern`
    pub fn not_followed_by(mut self, pattern: impl Into<String>) -> Self {
        self.lookahead = Some(LookaheadDef::NotFollowedBy(pattern.into()));
        self
    }

    /// Only match when the previous character is not a word character
    pub fn at_word_start(mut self) -> Self {
        self.word_start = true;
        self
    }
}

/// Wrap a pattern so it can only match at the start of the haystack
pub(crate) fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\A(?:{})", pattern))
}

#[derive(Debug, Clone)]
pub(crate) enum Lookahead {
    FollowedBy(Regex),
    NotFollowedBy(Regex),
}

impl Lookahead {
    pub(crate) fn compile(def: &LookaheadDef) -> Result<Self, regex::Error> {
        Ok(match def {
            LookaheadDef::FollowedBy(p) => Lookahead::FollowedBy(anchored(p)?),
            LookaheadDef::NotFollowedBy(p) => Lookahead::NotFollowedBy(anchored(p)?),
        })
    }

    fn admits(&self, rest: &str) -> bool {
        match self {
            Lookahead::FollowedBy(re) => re.is_match(rest),
            Lookahead::NotFollowedBy(re) => !re.is_match(rest),
        }
    }
}

/// A compiled rule. Immutable once its grammar is built.
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) regex: Regex,
    pub(crate) action: Action,
    pub(crate) transition: Transition,
    pub(crate) lookahead: Option<Lookahead>,
    pub(crate) word_start: bool,
}

/// A successful anchored match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Absolute byte range of the whole match
    pub span: Range<usize>,
    /// Absolute byte ranges of each capture group, `None` when a group didn't
    /// participate. Empty for whole-match actions.
    pub groups: Vec<Option<Range<usize>>>,
}

impl RuleMatch {
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

impl Rule {
    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Try to match exactly at byte offset `pos` of `text`.
    ///
    /// `pos` must lie on a char boundary. The left context before `pos` is
    /// only consulted for the word-start guard.
    pub fn match_at(&self, text: &str, pos: usize) -> Option<RuleMatch> {
        if self.word_start && text[..pos].chars().next_back().is_some_and(is_word_char) {
            return None;
        }

        let rest = &text[pos..];
        let m = if self.action.needs_groups() {
            let caps = self.regex.captures(rest)?;
            let groups = (1..caps.len())
                .map(|i| caps.get(i).map(|g| pos + g.start()..pos + g.end()))
                .collect();
            let whole = caps.get(0)?;
            RuleMatch {
                span: pos + whole.start()..pos + whole.end(),
                groups,
            }
        } else {
            let whole = self.regex.find(rest)?;
            RuleMatch {
                span: pos + whole.start()..pos + whole.end(),
                groups: Vec::new(),
            }
        };

        if let Some(lookahead) = &self.lookahead {
            if !lookahead.admits(&text[m.span.end..]) {
                return None;
            }
        }
        Some(m)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(def: RuleDef) -> Rule {
        Rule {
            regex: anchored(&def.pattern).unwrap(),
            action: def.action,
            transition: Transition::None,
            lookahead: def.lookahead.as_ref().map(|l| Lookahead::compile(l).unwrap()),
            word_start: def.word_start,
        }
    }

    #[test]
    fn test_match_is_anchored() {
        let r = compile(rule(r"[0-9]+", TokenKind::NumberInteger));
        assert_eq!(r.match_at("ab12", 0), None);
        assert_eq!(r.match_at("ab12", 2).map(|m| m.span), Some(2..4));
    }

    #[test]
    fn test_group_spans_are_absolute() {
        let r = compile(groups(
            r"(def)(\s+)(\w+)",
            [kind(TokenKind::Keyword), kind(TokenKind::Text), kind(TokenKind::NameFunction)],
        ));
        let m = r.match_at("x def foo", 2).unwrap();
        assert_eq!(m.span, 2..9);
        assert_eq!(m.groups, vec![Some(2..5), Some(5..6), Some(6..9)]);
    }

    #[test]
    fn test_lookahead_guards() {
        let call = compile(
            groups(r"(\w+)(\()", [kind(TokenKind::NameFunction), kind(TokenKind::Punctuation)])
                .not_followed_by(r".+?:"),
        );
        assert!(call.match_at("f(x)", 0).is_some());
        assert!(call.match_at("f(x) :- y", 0).is_none());

        let head = compile(rule(r"\w+", TokenKind::NameFunction).followed_by(r"\s*\("));
        assert!(head.match_at("f (x)", 0).is_some());
        assert!(head.match_at("f x", 0).is_none());
    }

    #[test]
    fn test_word_start_guard() {
        let r = compile(rule(r"topic", TokenKind::NameBuiltin).at_word_start());
        assert!(r.match_at("topic", 0).is_some());
        assert!(r.match_at(" topic", 1).is_some());
        assert!(r.match_at("xtopic", 1).is_none());
    }

    #[test]
    fn test_delegates_lists_every_target() {
        let action = Action::Groups(vec![using(GrammarId::Ctm), kind(TokenKind::Keyword)]);
        assert_eq!(action.delegates().collect::<Vec<_>>(), vec![GrammarId::Ctm]);
        assert_eq!(
            Action::Delegate(GrammarId::Crtm).delegates().collect::<Vec<_>>(),
            vec![GrammarId::Crtm]
        );
    }
}
