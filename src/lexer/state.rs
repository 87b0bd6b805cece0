//! Lexical state tables and grammar construction.
//!
//! A grammar is written as named states holding rules and `include`s of other
//! states. [`GrammarBuilder::build`] resolves every include into a flat rule
//! list, resolves push targets and delegation targets, and compiles every
//! pattern. The result is immutable and can be shared across threads.

use crate::error::{TmlexError, TmlexResult};
use crate::grammars::GrammarId;
use crate::lexer::rule::{anchored, Lookahead, Rule, RuleDef, StateId, Transition, TransitionDef};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// One line of a state definition
#[derive(Debug, Clone)]
pub enum Entry {
    Rule(RuleDef),
    /// Splice in the rules of another state at this point
    Include(String),
}

impl From<RuleDef> for Entry {
    fn from(rule: RuleDef) -> Self {
        Entry::Rule(rule)
    }
}

pub fn include(state: impl Into<String>) -> Entry {
    Entry::Include(state.into())
}

/// Build a `Vec<Entry>` from a mix of rules and includes
#[macro_export]
macro_rules! entries {
    ($($entry:expr),* $(,)?) => {
        vec![$($crate::lexer::Entry::from($entry)),*]
    };
}

/// Collects state definitions and delegation handles for one grammar
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    name: String,
    root: String,
    states: IndexMap<String, Vec<Entry>>,
    delegates: IndexMap<GrammarId, Arc<Grammar>>,
}

impl GrammarBuilder {
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            states: IndexMap::new(),
            delegates: IndexMap::new(),
        }
    }

    /// Define (or redefine) a state
    pub fn state(mut self, name: impl Into<String>, entries: Vec<Entry>) -> Self {
        self.states.insert(name.into(), entries);
        self
    }

    /// Register the grammar that delegating rules targeting `id` will run
    pub fn delegate(mut self, id: GrammarId, grammar: Arc<Grammar>) -> Self {
        self.delegates.insert(id, grammar);
        self
    }

    pub fn build(self) -> TmlexResult<Grammar> {
        let root = self
            .states
            .get_index_of(&self.root)
            .ok_or_else(|| self.unknown_state(&self.root))?;

        // Compile each state's own rules once; includes reuse the compiled rules.
        let mut own: Vec<Vec<Option<Rule>>> = Vec::with_capacity(self.states.len());
        for (state, entries) in &self.states {
            let mut compiled = Vec::with_capacity(entries.len());
            for entry in entries {
                compiled.push(match entry {
                    Entry::Rule(def) => Some(self.compile(state, def)?),
                    Entry::Include(_) => None,
                });
            }
            own.push(compiled);
        }

        let mut flat: HashMap<StateId, Vec<Rule>> = HashMap::new();
        for id in 0..self.states.len() {
            let mut visiting = Vec::new();
            self.flatten(id, &own, &mut visiting, &mut flat)?;
        }

        let mut states = Vec::with_capacity(self.states.len());
        for id in 0..self.states.len() {
            states.push(flat.remove(&id).unwrap_or_default());
        }

        let grammar = Grammar {
            name: self.name,
            root,
            state_names: self.states.into_keys().collect(),
            states,
            delegates: self.delegates,
        };
        log::debug!(
            "built grammar {} with {} states and {} effective rules",
            grammar.name,
            grammar.state_count(),
            grammar.rule_count()
        );
        Ok(grammar)
    }

    fn flatten(
        &self,
        id: StateId,
        own: &[Vec<Option<Rule>>],
        visiting: &mut Vec<StateId>,
        flat: &mut HashMap<StateId, Vec<Rule>>,
    ) -> TmlexResult<()> {
        if flat.contains_key(&id) {
            return Ok(());
        }
        if let Some(at) = visiting.iter().position(|&v| v == id) {
            let mut cycle: Vec<String> = visiting[at..]
                .iter()
                .map(|&v| self.state_name(v).to_string())
                .collect();
            cycle.push(self.state_name(id).to_string());
            return Err(TmlexError::CyclicInclusion {
                grammar: self.name.clone(),
                cycle,
            });
        }

        visiting.push(id);
        let mut rules = Vec::new();
        let entries = &self.states[id];
        for (entry, compiled) in entries.iter().zip(&own[id]) {
            match (entry, compiled) {
                (Entry::Include(target), _) => {
                    let target_id = self
                        .states
                        .get_index_of(target)
                        .ok_or_else(|| self.unknown_state(target))?;
                    self.flatten(target_id, own, visiting, flat)?;
                    if let Some(included) = flat.get(&target_id) {
                        rules.extend(included.iter().cloned());
                    }
                }
                (Entry::Rule(_), Some(rule)) => rules.push(rule.clone()),
                (Entry::Rule(_), None) => {}
            }
        }
        visiting.pop();
        flat.insert(id, rules);
        Ok(())
    }

    fn compile(&self, state: &str, def: &RuleDef) -> TmlexResult<Rule> {
        let invalid = |pattern: &str, source: regex::Error| TmlexError::InvalidPattern {
            grammar: self.name.clone(),
            state: state.to_string(),
            pattern: pattern.to_string(),
            source,
        };

        let regex = anchored(&def.pattern).map_err(|e| invalid(&def.pattern, e))?;
        let lookahead = match &def.lookahead {
            Some(la) => Some(Lookahead::compile(la).map_err(|e| invalid(la.pattern(), e))?),
            None => None,
        };

        let transition = match &def.transition {
            TransitionDef::None => Transition::None,
            TransitionDef::Pop => Transition::Pop,
            TransitionDef::PushSame => Transition::PushSame,
            TransitionDef::Push(target) => Transition::Push(
                self.states
                    .get_index_of(target)
                    .ok_or_else(|| self.unknown_state(target))?,
            ),
        };

        if let Some(target) = def.action.delegates().find(|id| !self.delegates.contains_key(id)) {
            return Err(TmlexError::UnresolvedDelegate {
                grammar: self.name.clone(),
                target,
            });
        }

        Ok(Rule {
            regex,
            action: def.action.clone(),
            transition,
            lookahead,
            word_start: def.word_start,
        })
    }

    fn state_name(&self, id: StateId) -> &str {
        self.states.get_index(id).map(|(name, _)| name.as_str()).unwrap_or("?")
    }

    fn unknown_state(&self, state: &str) -> TmlexError {
        TmlexError::UnknownState {
            grammar: self.name.clone(),
            state: state.to_string(),
        }
    }
}

/// An immutable, fully resolved set of lexical states
#[derive(Debug)]
pub struct Grammar {
    name: String,
    root: StateId,
    state_names: Vec<String>,
    states: Vec<Vec<Rule>>,
    delegates: IndexMap<GrammarId, Arc<Grammar>>,
}

impl Grammar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.state_names.iter().position(|n| n == name)
    }

    pub fn state_name(&self, id: StateId) -> &str {
        &self.state_names[id]
    }

    /// Effective rules of a state, includes already spliced in
    pub fn rules(&self, id: StateId) -> &[Rule] {
        &self.states[id]
    }

    pub fn delegate(&self, id: GrammarId) -> Option<&Arc<Grammar>> {
        self.delegates.get(&id)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn rule_count(&self) -> usize {
        self.states.iter().map(Vec::len).sum()
    }
}
