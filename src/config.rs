//! Input preprocessing options.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How input text is prepared before tokenization.
///
/// The default leaves the text untouched, so the token stream reproduces the
/// caller's input byte for byte. Any active option changes the text that the
/// tokens reproduce; [`crate::Lexer::text`] returns the prepared version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LexOptions {
    /// Rewrite `\r\n` and lone `\r` to `\n`
    pub normalize_newlines: bool,
    /// Drop leading and trailing `\n`
    pub strip_newlines: bool,
    /// Expand tabs to this many spaces (0 keeps tabs)
    pub tab_size: usize,
    /// Append `\n` if the text doesn't already end with one
    pub ensure_newline: bool,
}

impl LexOptions {
    /// Preset for syntax highlighting front ends
    pub fn highlighting() -> Self {
        Self {
            normalize_newlines: true,
            strip_newlines: true,
            tab_size: 0,
            ensure_newline: true,
        }
    }

    pub fn is_lossless(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the options to `text`, borrowing when nothing changes
    pub fn prepare<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let mut text = Cow::Borrowed(text);

        if self.normalize_newlines && text.contains('\r') {
            text = Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"));
        }
        if self.strip_newlines {
            text = match text {
                Cow::Borrowed(s) => Cow::Borrowed(s.trim_matches('\n')),
                Cow::Owned(s) => Cow::Owned(s.trim_matches('\n').to_string()),
            };
        }
        if self.tab_size > 0 && text.contains('\t') {
            text = Cow::Owned(text.replace('\t', &" ".repeat(self.tab_size)));
        }
        if self.ensure_newline && !text.ends_with('\n') {
            let mut owned = text.into_owned();
            owned.push('\n');
            text = Cow::Owned(owned);
        }
        text
    }
}
