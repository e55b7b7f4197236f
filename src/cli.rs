//! Command-line argument definitions and their mapping to store actions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Accouchement, Complication, Grossesse, Naissance, Vaccin};
use crate::entity::{
    Entity, EntityAction, EntityState, RelationKind, Subaction, ValidationError,
};
use crate::store::{AppAction, AppState};

#[derive(Debug, Parser)]
#[command(
    name = "perinatal",
    version,
    about = "Perinatal records client - query and edit pregnancy, delivery, birth, complication and vaccination records"
)]
pub struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides `[api] base_url`).
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub resource: Resource,
}

#[derive(Debug, Subcommand)]
pub enum Resource {
    /// Complications attached to a grossesse, accouchement or naissance.
    Complications {
        #[command(subcommand)]
        command: Command,
    },
    /// Vaccinations of a patiente or a newborn.
    Vaccins {
        #[command(subcommand)]
        command: Command,
    },
    /// Births.
    Naissances {
        #[command(subcommand)]
        command: Command,
    },
    /// Deliveries.
    Accouchements {
        #[command(subcommand)]
        command: Command,
    },
    /// Pregnancies.
    Grossesses {
        #[command(subcommand)]
        command: Command,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch one record.
    Get { id: String },
    /// Fetch every record.
    List,
    /// Fetch the records attached to a parent (e.g. `by-parent grossesse g1`).
    ByParent { kind: String, parent_id: String },
    /// Create a record from a JSON payload.
    Create { json: String },
    /// Replace a record with a JSON payload.
    Update { id: String, json: String },
    /// Apply a sub-action (e.g. `patch v1 administrer`).
    Patch { id: String, subaction: String },
    /// Delete a record.
    Delete { id: String },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{resource} cannot be loaded by '{kind}' (expected one of: {expected})")]
    UnknownRelation {
        resource: &'static str,
        kind: String,
        expected: String,
    },

    #[error("{resource} has no sub-action '{name}' (expected one of: {expected})")]
    UnknownSubaction {
        resource: &'static str,
        name: String,
        expected: String,
    },
}

impl Resource {
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Complications { .. } => Complication::RESOURCE,
            Resource::Vaccins { .. } => Vaccin::RESOURCE,
            Resource::Naissances { .. } => Naissance::RESOURCE,
            Resource::Accouchements { .. } => Accouchement::RESOURCE,
            Resource::Grossesses { .. } => Grossesse::RESOURCE,
        }
    }

    /// Validate the arguments and build the trigger to dispatch.
    pub fn to_action(&self) -> Result<AppAction, CliError> {
        match self {
            Resource::Complications { command } => {
                entity_action::<Complication>(command).map(AppAction::from)
            }
            Resource::Vaccins { command } => entity_action::<Vaccin>(command).map(AppAction::from),
            Resource::Naissances { command } => {
                entity_action::<Naissance>(command).map(AppAction::from)
            }
            Resource::Accouchements { command } => {
                entity_action::<Accouchement>(command).map(AppAction::from)
            }
            Resource::Grossesses { command } => {
                entity_action::<Grossesse>(command).map(AppAction::from)
            }
        }
    }

    /// The targeted slice as pretty-printed JSON.
    pub fn render(&self, state: &AppState) -> serde_json::Result<String> {
        match self {
            Resource::Complications { .. } => render(&state.complications),
            Resource::Vaccins { .. } => render(&state.vaccins),
            Resource::Naissances { .. } => render(&state.naissances),
            Resource::Accouchements { .. } => render(&state.accouchements),
            Resource::Grossesses { .. } => render(&state.grossesses),
        }
    }

    /// Error left in the targeted slice, if any.
    pub fn error<'a>(&self, state: &'a AppState) -> Option<&'a str> {
        match self {
            Resource::Complications { .. } => state.complications.error(),
            Resource::Vaccins { .. } => state.vaccins.error(),
            Resource::Naissances { .. } => state.naissances.error(),
            Resource::Accouchements { .. } => state.accouchements.error(),
            Resource::Grossesses { .. } => state.grossesses.error(),
        }
    }
}

fn entity_action<E: Entity>(command: &Command) -> Result<EntityAction<E>, CliError> {
    let action = match command {
        Command::Get { id } => EntityAction::load(id)?,
        Command::List => EntityAction::LoadAll,
        Command::ByParent { kind, parent_id } => {
            let relation = <E::Relation as RelationKind>::from_segment(kind).ok_or_else(|| {
                CliError::UnknownRelation {
                    resource: E::RESOURCE,
                    kind: kind.clone(),
                    expected: expected(<E::Relation as RelationKind>::ALL.iter().map(|k| k.path_segment())),
                }
            })?;
            EntityAction::load_by_parent(relation, parent_id)?
        }
        Command::Create { json } => EntityAction::create(serde_json::from_str(json)?)?,
        Command::Update { id, json } => EntityAction::update(id, serde_json::from_str(json)?)?,
        Command::Patch { id, subaction } => {
            let parsed = <E::Subaction as Subaction>::from_segment(subaction).ok_or_else(|| {
                CliError::UnknownSubaction {
                    resource: E::RESOURCE,
                    name: subaction.clone(),
                    expected: expected(<E::Subaction as Subaction>::ALL.iter().map(|s| s.path_segment())),
                }
            })?;
            EntityAction::patch(id, parsed)?
        }
        Command::Delete { id } => EntityAction::delete(id)?,
    };
    Ok(action)
}

fn expected<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let list: Vec<&str> = segments.collect();
    if list.is_empty() {
        "none".to_string()
    } else {
        list.join(", ")
    }
}

fn render<E: Entity>(slice: &EntityState<E>) -> serde_json::Result<String>
where
    EntityState<E>: Serialize,
{
    serde_json::to_string_pretty(slice)
}
