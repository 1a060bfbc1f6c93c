#![warn(clippy::all, missing_docs)]

//! Core logic for the loadout builder.
//!
//! This crate hosts the catalog index, the selection and funds rules, the
//! page navigation gate, teammate generation, configuration handling and the
//! remote feed loaders used by the terminal UI.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod navigation;
pub mod resource;
pub mod selection;
pub mod session;
pub mod teammates;

pub use catalog::{Catalog, SkinIndex};
pub use crate::config::AppConfig;
pub use error::{GenerationError, SelectionError, ValidationError};
pub use ledger::{FundsLedger, MAX_FUNDS};
pub use models::{Category, Operator, Skin, Team, TeamAffiliation, TeamChoice, Teammate, Weapon};
pub use navigation::{Navigation, Navigator, Page};
pub use resource::{FeedLoader, LoadEvent};
pub use selection::{Affordability, SelectionEvent, SelectionState};
pub use session::LoadoutSession;
