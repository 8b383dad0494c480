//! Session state and command handlers
//!
//! A [`Session`] holds what one player accumulates while the client runs:
//! the location paging cursor and the caught Pokemon.

use std::collections::BTreeMap;
use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::api::PokeApi;
use crate::error::Result;
use crate::fetch::Transport;
use crate::models::Pokemon;
use crate::repl::{Command, COMMANDS};

// == Capture Chance ==
/// Highest base experience of any Pokemon; maps to the lowest chance.
pub const MAX_BASE_EXPERIENCE: f64 = 635.0;
/// Capture chance floor, in percent.
pub const MIN_CATCH_CHANCE: u32 = 5;
/// Capture chance for a Pokemon with zero base experience, in percent.
pub const MAX_CATCH_CHANCE: u32 = 90;

/// Percent chance of catching a Pokemon with `base_experience`.
///
/// Falls linearly from 90 at zero experience to 5 at 635, and never below 5.
pub fn catch_chance(base_experience: u32) -> u32 {
    let spread = f64::from(MAX_CATCH_CHANCE - MIN_CATCH_CHANCE);
    let penalty = (f64::from(base_experience) / MAX_BASE_EXPERIENCE * spread) as u32;
    MAX_CATCH_CHANCE
        .saturating_sub(penalty)
        .max(MIN_CATCH_CHANCE)
}

/// What the REPL should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

type Roll = Box<dyn FnMut() -> u32 + Send>;

// == Session ==
pub struct Session<T> {
    api: PokeApi<T>,
    /// Uniform draw in `0..100` for catch attempts
    roll: Roll,
    next: Option<String>,
    previous: Option<String>,
    pokedex: BTreeMap<String, Pokemon>,
}

impl<T: Transport> Session<T> {
    /// Creates a session rolling catches with an entropy-seeded RNG.
    pub fn new(api: PokeApi<T>) -> Self {
        let mut rng = StdRng::from_entropy();
        Self::with_roll(api, move || rng.gen_range(0..100))
    }

    /// Creates a session with a custom catch roll.
    pub fn with_roll(api: PokeApi<T>, roll: impl FnMut() -> u32 + Send + 'static) -> Self {
        Self {
            api,
            roll: Box::new(roll),
            next: None,
            previous: None,
            pokedex: BTreeMap::new(),
        }
    }

    pub fn api(&self) -> &PokeApi<T> {
        &self.api
    }

    pub fn pokedex(&self) -> &BTreeMap<String, Pokemon> {
        &self.pokedex
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn previous_page(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    // == Execute ==
    /// Runs one command, writing its output to `out`.
    pub async fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        debug!(?command, "Executing command");

        match command {
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Help => self.help(out)?,
            Command::Map => {
                let url = self
                    .next
                    .clone()
                    .unwrap_or_else(|| self.api.first_location_page_url());
                self.show_location_page(&url, out).await?;
            }
            Command::Mapb => match self.previous.clone() {
                Some(url) => self.show_location_page(&url, out).await?,
                None => writeln!(out, "you're on the first page")?,
            },
            Command::Explore(area) => self.explore(&area, out).await?,
            Command::Catch(name) => self.catch(&name, out).await?,
            Command::Inspect(name) => self.inspect(&name, out)?,
            Command::Pokedex => {
                writeln!(out, "Your Pokedex:")?;
                for name in self.pokedex.keys() {
                    writeln!(out, "- {}", name)?;
                }
            }
            Command::Cache => self.cache_report(out).await?,
        }

        Ok(Flow::Continue)
    }

    fn help(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for info in COMMANDS {
            writeln!(out, "{}: {}", info.usage, info.description)?;
        }
        Ok(())
    }

    async fn show_location_page(&mut self, url: &str, out: &mut impl Write) -> Result<()> {
        let page = self.api.location_areas(url).await?;
        for area in &page.results {
            writeln!(out, "{}", area.name)?;
        }
        self.next = page.next;
        self.previous = page.previous;
        Ok(())
    }

    async fn explore(&self, area: &str, out: &mut impl Write) -> Result<()> {
        let location = self.api.location_area(area).await?;
        writeln!(out, "Exploring {}...", area)?;
        writeln!(out, "Found Pokemon:")?;
        for name in location.pokemon_names() {
            writeln!(out, " - {}", name)?;
        }
        Ok(())
    }

    async fn catch(&mut self, name: &str, out: &mut impl Write) -> Result<()> {
        let pokemon = self.api.pokemon(name).await?;
        writeln!(out, "Throwing a Pokeball at {}...", name)?;

        let chance = catch_chance(pokemon.base_experience.unwrap_or(0));
        let roll = (self.roll)();
        debug!(pokemon = name, chance, roll, "Catch attempt");

        if roll < chance {
            writeln!(out, "{} was caught!", name)?;
            writeln!(out, "You may now inspect it with the inspect command.")?;
            info!(pokemon = name, "Pokemon caught");
            self.pokedex.insert(name.to_string(), pokemon);
        } else {
            writeln!(out, "{} escaped!", name)?;
        }
        Ok(())
    }

    fn inspect(&self, name: &str, out: &mut impl Write) -> Result<()> {
        let Some(pokemon) = self.pokedex.get(name) else {
            writeln!(out, "You have not yet caught this pokemon")?;
            return Ok(());
        };

        writeln!(out, "Name: {}", pokemon.name)?;
        writeln!(out, "Height: {}", pokemon.height)?;
        writeln!(out, "Weight: {}", pokemon.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for kind in &pokemon.types {
            writeln!(out, "  - {}", kind.kind.name)?;
        }
        Ok(())
    }

    async fn cache_report(&self, out: &mut impl Write) -> Result<()> {
        let cache = self.api.cache();
        let stats = cache.stats().await;
        let health = cache.health();

        writeln!(
            out,
            "Cache: {} entries, ttl {:?}, swept every {:?}",
            stats.total_entries,
            cache.ttl(),
            cache.reap_interval()
        )?;
        writeln!(
            out,
            "Lookups: {} hits, {} misses ({:.0}% hit rate), {} expired",
            stats.hits,
            stats.misses,
            stats.hit_rate() * 100.0,
            stats.expirations
        )?;

        let state = if !health.alive {
            "stopped"
        } else if health.stale {
            "stale"
        } else {
            "healthy"
        };
        writeln!(
            out,
            "Reaper: {} ({} sweeps, {} restarts)",
            state, health.sweeps, health.restarts
        )?;
        Ok(())
    }
}
