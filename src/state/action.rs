//! Resume policy and terminal run outcomes

use std::fmt;
use std::str::FromStr;

/// What to do with a prior crawl position
///
/// Chosen once per run, and only offered when a previous run left state behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Action {
    /// Start from the last processed page, skipping notices already collected
    Continue,
    /// Start from page 1 and stop at the first notice already collected
    Update,
}

/// How the crawl loop treats a notice whose URL is already in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeenUrl {
    /// Skip this notice and move to the next link
    Skip,
    /// The update frontier was reached; end the run successfully
    Stop,
}

impl Action {
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update)
    }

    /// Policy for a notice that was collected by an earlier run
    pub fn on_seen_url(&self) -> SeenUrl {
        match self {
            Self::Continue => SeenUrl::Skip,
            Self::Update => SeenUrl::Stop,
        }
    }

    /// First listing page visited under this action
    pub fn start_page(&self, last_processed_page: u32) -> u32 {
        if self.is_update() {
            1
        } else {
            last_processed_page.max(1)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" | "1" => Ok(Self::Continue),
            "update" | "2" => Ok(Self::Update),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every listing page in range was visited
    Completed,
    /// Update run reached a notice that was already collected
    CaughtUp { page: u32, url: String },
    /// Operator cancelled the run
    Interrupted,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::CaughtUp { page, url } => {
                write!(f, "caught up at {} on page {}", url, page)
            }
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}
