use crate::argument::{Argument, ArgumentKind};
use crate::error::{Error, Result};
use log::debug;
use std::collections::HashMap;

/// Owns every declared [`Argument`] in declaration order and indexes them by name.
///
/// Short names, long names and positional names share a single key space, and a key can only be
/// declared once.
#[derive(Debug, Default)]
pub struct Registry {
    arguments: Vec<Argument>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a flag and returns it for further configuration
    pub fn add_flag(&mut self, short: &str, long: &str, description: &str) -> Result<&mut Argument> {
        self.insert(Argument::flag(short, long, description)?)
    }

    /// Declares an option and returns it for further configuration
    pub fn add_option(
        &mut self,
        short: &str,
        long: &str,
        description: &str,
    ) -> Result<&mut Argument> {
        self.insert(Argument::option(short, long, description)?)
    }

    /// Declares a positional argument and returns it for further configuration.
    ///
    /// Positionals receive the non-option tokens in the order they are declared.
    pub fn add_positional(
        &mut self,
        name: &str,
        description: &str,
        required: bool,
    ) -> Result<&mut Argument> {
        self.insert(Argument::positional(name, description, required)?)
    }

    fn insert(&mut self, argument: Argument) -> Result<&mut Argument> {
        if let Some(taken) = argument.keys().find(|k| self.index.contains_key(*k)) {
            return Err(Error::DuplicateName(taken.to_string()));
        }

        let id = self.arguments.len();
        for key in argument.keys() {
            self.index.insert(key.to_string(), id);
        }
        debug!("declared {} {}", argument.kind(), argument.display_name());

        self.arguments.push(argument);
        Ok(&mut self.arguments[id])
    }

    /// Looks up an argument by its exact short, long or positional name
    pub fn find(&self, name: &str) -> Option<&Argument> {
        self.index.get(name).map(|&id| &self.arguments[id])
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Argument> {
        self.index.get(name).map(|&id| &mut self.arguments[id])
    }

    /// Iterates over all arguments in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter()
    }

    pub fn positionals(&self) -> impl Iterator<Item = &Argument> {
        self.iter().filter(|a| a.kind() == ArgumentKind::Positional)
    }

    pub(crate) fn positionals_mut(&mut self) -> impl Iterator<Item = &mut Argument> {
        self.arguments
            .iter_mut()
            .filter(|a| a.kind() == ArgumentKind::Positional)
    }

    /// Iterates over flags and options in declaration order
    pub fn switches(&self) -> impl Iterator<Item = &Argument> {
        self.iter().filter(|a| a.kind() != ArgumentKind::Positional)
    }

    pub(crate) fn reset(&mut self) {
        self.arguments.iter_mut().for_each(Argument::reset);
    }

    /// Fails on the first required argument (in declaration order) that was not set
    pub fn validate_required(&self) -> Result<()> {
        match self.iter().find(|a| a.is_required() && !a.is_set()) {
            Some(missing) => Err(Error::MissingArgument(missing.display_name())),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}
