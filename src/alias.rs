//! Alias table
//!
//! `alias name='command text'` defines a one-level textual substitution
//! of a line's first token. Definitions keep their insertion order for
//! listing.

use regex::Regex;

use crate::error::{Error, Result};
use crate::models::BuiltinKind;
use crate::parser;

/// Names that can never be aliased, beyond the builtins
const RESERVED_NAMES: &[&str] = &["alias", "unalias", ">"];

const ALIAS_PATTERN: &str = r"^(\w+)='(.*)'$";

#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replacement text for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, text)| text.as_str())
    }

    /// True when `name` may not be (re)defined
    pub fn is_reserved(&self, name: &str) -> bool {
        RESERVED_NAMES.contains(&name)
            || BuiltinKind::from_name(name).is_some()
            || self.get(name).is_some()
    }

    /// Add a definition
    pub fn define(&mut self, name: &str, text: &str) -> Result<()> {
        if self.is_reserved(name) {
            return Err(Error::usage(
                "alias",
                format!("{} already exists or is a reserved command", name),
            ));
        }
        debug!("alias {}='{}'", name, text);
        self.entries.push((name.to_string(), text.to_string()));
        Ok(())
    }

    /// Drop a definition
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|(alias, _)| alias == name)
            .ok_or_else(|| Error::usage("unalias", format!("{} alias does not exist", name)))?;
        self.entries.remove(index);
        Ok(())
    }

    /// Definitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the first token with its alias text, if it has one
    ///
    /// The result is the replacement followed by the remaining tokens, so
    /// runs of whitespace in the rest of the line collapse to one space.
    pub fn expand(&self, line: &str) -> String {
        let tokens = parser::tokenize(line);
        let Some(text) = tokens.first().and_then(|first| self.get(first)) else {
            return line.to_string();
        };

        let mut expanded = text.to_string();
        for token in &tokens[1..] {
            expanded.push(' ');
            expanded.push_str(token);
        }
        trace!("alias expansion: {:?} -> {:?}", line, expanded);
        expanded
    }

    /// `alias` / `alias name='text'`
    ///
    /// `line` is the full line with any background marker removed; the
    /// definition is matched against everything after the word `alias`.
    pub fn alias_command(&mut self, line: &str) -> Result<()> {
        let tokens = parser::tokenize(line);
        if tokens.len() <= 1 {
            for (name, text) in self.iter() {
                println!("{}='{}'", name, text);
            }
            return Ok(());
        }

        let definition = tokens[1..].join(" ");
        let pattern = Regex::new(ALIAS_PATTERN)?;
        let captures = pattern
            .captures(&definition)
            .ok_or_else(|| Error::usage("alias", "invalid alias format"))?;
        let name = captures[1].to_string();
        let text = captures[2].to_string();
        self.define(&name, &text)
    }

    /// `unalias name…`; stops at the first unknown name
    pub fn unalias_command(&mut self, args: &[String]) -> Result<()> {
        if args.len() < 2 {
            return Err(Error::usage("unalias", "not enough arguments"));
        }
        args[1..].iter().try_for_each(|name| self.remove(name))
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new()
    }
}
