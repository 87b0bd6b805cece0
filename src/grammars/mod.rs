//! The Topic Maps grammars and their registration metadata.
//!
//! Each grammar is built once per process on first use and shared as an
//! `Arc<Grammar>`. The metadata (names, aliases, file patterns, MIME types) is
//! what a host application uses to pick a grammar for a document.

pub mod crtm;
pub mod ctm;
pub mod patterns;
pub mod tolog;

use crate::error::{TmlexError, TmlexResult};
use crate::lexer::Grammar;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// The closed set of grammars this crate provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GrammarId {
    Ctm,
    Tolog,
    Crtm,
}

/// Registration metadata consumed by host applications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrammarInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub filenames: &'static [&'static str],
    pub mimetypes: &'static [&'static str],
}

impl GrammarId {
    pub const ALL: [GrammarId; 3] = [GrammarId::Ctm, GrammarId::Tolog, GrammarId::Crtm];

    pub fn info(self) -> GrammarInfo {
        match self {
            GrammarId::Ctm => GrammarInfo {
                name: "CTM",
                aliases: &["ctm"],
                filenames: &["*.ctm", "*.tmcl"],
                mimetypes: &["application/x-tm+ctm"],
            },
            GrammarId::Tolog => GrammarInfo {
                name: "tolog",
                aliases: &["Tolog"],
                filenames: &["*.tl", "*.tolog"],
                mimetypes: &["application/x-tolog"],
            },
            GrammarId::Crtm => GrammarInfo {
                name: "CRTM",
                aliases: &["crtm"],
                filenames: &["*.crtm"],
                mimetypes: &["application/x-tm+crtm"],
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Look up by name or alias, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| {
            let info = id.info();
            info.name.eq_ignore_ascii_case(name)
                || info.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
        })
    }

    /// Look up by matching a file name against the `*.ext` patterns
    pub fn for_filename(path: impl AsRef<Path>) -> Option<Self> {
        let file_name = path.as_ref().file_name()?.to_str()?;
        Self::ALL.into_iter().find(|id| {
            id.info()
                .filenames
                .iter()
                .any(|pattern| glob_match(pattern, file_name))
        })
    }

    pub fn for_mimetype(mimetype: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.info().mimetypes.iter().any(|m| *m == mimetype))
    }
}

impl fmt::Display for GrammarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for GrammarId {
    type Err = TmlexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GrammarId::from_name(s).ok_or_else(|| TmlexError::UnknownGrammar(s.to_string()))
    }
}

/// Only `*` wildcards are needed for the registered patterns
fn glob_match(pattern: &str, name: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == name,
        Some((prefix, rest)) => {
            if !name.starts_with(prefix) {
                return false;
            }
            let tail = &name[prefix.len()..];
            if rest.is_empty() {
                return true;
            }
            (0..=tail.len())
                .filter(|&i| tail.is_char_boundary(i))
                .any(|i| glob_match(rest, &tail[i..]))
        }
    }
}

type Slot = OnceLock<TmlexResult<Arc<Grammar>>>;

static CTM: Slot = OnceLock::new();
static TOLOG: Slot = OnceLock::new();
static CRTM: Slot = OnceLock::new();

/// Shared handle to a built grammar, building it on first use
pub fn grammar(id: GrammarId) -> TmlexResult<Arc<Grammar>> {
    let slot = match id {
        GrammarId::Ctm => &CTM,
        GrammarId::Tolog => &TOLOG,
        GrammarId::Crtm => &CRTM,
    };
    slot.get_or_init(|| build(id).map(Arc::new)).clone()
}

/// Build a fresh, unshared copy of a grammar
pub fn build(id: GrammarId) -> TmlexResult<Grammar> {
    match id {
        GrammarId::Ctm => ctm::build(),
        GrammarId::Tolog => tolog::build(grammar(GrammarId::Ctm)?),
        GrammarId::Crtm => crtm::build(),
    }
}

/// Look up a grammar by name or alias and return its shared handle
pub fn by_name(name: &str) -> TmlexResult<Arc<Grammar>> {
    grammar(name.parse()?)
}
