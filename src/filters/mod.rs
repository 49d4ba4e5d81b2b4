//! Per-chat content filters.
//!
//! Detection mechanisms, each switched on per chat:
//! 1. **antimat**: banned-word matching (Aho-Corasick)
//! 2. **antilinks**: URL detection
//! 3. **anticaps**: mostly-uppercase messages
//! 4. **antiflood**: per (chat, user) token bucket
//!
//! Filters only report a hit; the dispatcher turns it into a deleted message.

mod anticaps;
mod antiflood;
mod antilinks;
mod antimat;

pub use anticaps::CapsFilter;
pub use antiflood::FloodGuard;
pub use antilinks::LinkFilter;
pub use antimat::WordFilter;

use crate::config::{ChatSettings, Config, FiltersConfig, validate};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, info};

/// Filter construction errors.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid link pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid banned word list: {0}")]
    Words(#[from] aho_corasick::BuildError),
}

/// Which filter rejected a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterHit {
    Profanity,
    Link,
    Caps,
    Flood,
}

impl FilterHit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profanity => "antimat",
            Self::Link => "antilinks",
            Self::Caps => "anticaps",
            Self::Flood => "antiflood",
        }
    }
}

/// All content filters, built from one `[filters]` section.
#[derive(Debug)]
pub struct ContentFilters {
    config: FiltersConfig,
    words: WordFilter,
    links: LinkFilter,
    caps: CapsFilter,
    flood: FloodGuard,
}

impl ContentFilters {
    pub fn new(config: &FiltersConfig) -> Result<Self, FilterError> {
        Ok(Self {
            config: config.clone(),
            words: WordFilter::new(&config.banned_words)?,
            links: LinkFilter::new()?,
            caps: CapsFilter::new(config.caps_min_letters, config.caps_ratio),
            flood: FloodGuard::new(config.flood_messages_per_second, config.flood_burst),
        })
    }

    /// Run the filters enabled in `settings` against one message.
    ///
    /// The flood bucket is charged for every checked message, so it runs
    /// first.
    pub fn check(
        &self,
        chat_id: i64,
        user_id: i64,
        text: &str,
        settings: &ChatSettings,
    ) -> Option<FilterHit> {
        let hit = if settings.antiflood && !self.flood.check(chat_id, user_id) {
            Some(FilterHit::Flood)
        } else if settings.antimat && self.words.matches(text) {
            Some(FilterHit::Profanity)
        } else if settings.antilinks && self.links.matches(text) {
            Some(FilterHit::Link)
        } else if settings.anticaps && self.caps.matches(text) {
            Some(FilterHit::Caps)
        } else {
            None
        };

        if let Some(hit) = hit {
            debug!(chat_id, user_id, filter = hit.as_str(), "Content filter hit");
        }
        hit
    }

    /// Forget a user's flood bucket (they left the chat).
    pub fn forget_user(&self, chat_id: i64, user_id: i64) {
        self.flood.remove(chat_id, user_id);
    }

    pub fn config(&self) -> &FiltersConfig {
        &self.config
    }
}

/// The active filters, replaced wholesale by the `reload` command.
#[derive(Debug)]
pub struct FilterSet {
    /// Config file re-read on reload; `None` rebuilds from the current tuning.
    source: Option<PathBuf>,
    current: RwLock<Arc<ContentFilters>>,
}

impl FilterSet {
    pub fn new(filters: ContentFilters, source: Option<PathBuf>) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(filters)),
        }
    }

    /// Snapshot of the filters in effect.
    pub fn current(&self) -> Arc<ContentFilters> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Rebuild the filters, re-reading the config file when there is one.
    ///
    /// Flood buckets start empty afterwards. Returns the banned word count.
    pub fn reload(&self) -> anyhow::Result<usize> {
        let config = match &self.source {
            Some(path) => {
                let config = Config::load(path)?;
                if let Err(errors) = validate(&config) {
                    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
                    anyhow::bail!("invalid config: {}", details.join("; "));
                }
                config.filters
            }
            None => self.current().config().clone(),
        };

        let filters = ContentFilters::new(&config)?;
        match self.current.write() {
            Ok(mut guard) => *guard = Arc::new(filters),
            Err(e) => anyhow::bail!("Failed to acquire write lock on filters: {}", e),
        }

        info!(banned_words = config.banned_words.len(), "Content filters reloaded");
        Ok(config.banned_words.len())
    }
}
