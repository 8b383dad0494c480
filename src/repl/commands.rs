//! Command table
//!
//! Maps the first word of a cleaned input line to a [`Command`].

use crate::error::{PokedexError, Result};

/// A parsed prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Map,
    Mapb,
    Explore(String),
    Catch(String),
    Inspect(String),
    Pokedex,
    Cache,
}

/// Name and help text of one command.
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

/// Every command, in the order `help` lists them.
pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "help",
        usage: "help",
        description: "Displays a help message",
    },
    CommandInfo {
        name: "map",
        usage: "map",
        description: "Displays the next page of locations in the Pokemon world",
    },
    CommandInfo {
        name: "mapb",
        usage: "mapb",
        description: "Displays the previous page of locations in the Pokemon world",
    },
    CommandInfo {
        name: "explore",
        usage: "explore <location-area>",
        description: "Lists the Pokemon that can be found in a location area",
    },
    CommandInfo {
        name: "catch",
        usage: "catch <pokemon>",
        description: "Throws a Pokeball at a Pokemon",
    },
    CommandInfo {
        name: "inspect",
        usage: "inspect <pokemon>",
        description: "Displays the stats of a caught Pokemon",
    },
    CommandInfo {
        name: "pokedex",
        usage: "pokedex",
        description: "Lists every Pokemon you have caught",
    },
    CommandInfo {
        name: "cache",
        usage: "cache",
        description: "Displays response cache statistics and reaper health",
    },
    CommandInfo {
        name: "exit",
        usage: "exit",
        description: "Exit the Pokedex",
    },
];

impl Command {
    // == Parse ==
    /// Parses cleaned input words.
    ///
    /// Returns `Ok(None)` for an unknown command name and
    /// [`PokedexError::MissingArgument`] when a command needs a name that was
    /// not given. Words after the expected argument are ignored.
    pub fn parse(words: &[String]) -> Result<Option<Command>> {
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };
        let arg = |what: &str| {
            args.first().cloned().ok_or_else(|| {
                PokedexError::MissingArgument(format!("{} needs a {}", name, what))
            })
        };

        let command = match name.as_str() {
            "exit" => Command::Exit,
            "help" => Command::Help,
            "map" => Command::Map,
            "mapb" => Command::Mapb,
            "explore" => Command::Explore(arg("location area name")?),
            "catch" => Command::Catch(arg("pokemon name")?),
            "inspect" => Command::Inspect(arg("pokemon name")?),
            "pokedex" => Command::Pokedex,
            "cache" => Command::Cache,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}
