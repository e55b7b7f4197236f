//! Aggregate of every entity slice.

use std::sync::Arc;

use serde::Serialize;

use crate::api::ApiGateway;
use crate::domain::{Accouchement, Complication, Grossesse, Naissance, Vaccin};
use crate::entity::{Entity, EntityAction, EntityEffects, EntityReducer, EntityState};
use crate::mvi::{Action, Reducer, SliceState};
use crate::notify::Notifier;

/// State of the whole process: one slice per record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub complications: EntityState<Complication>,
    pub vaccins: EntityState<Vaccin>,
    pub naissances: EntityState<Naissance>,
    pub accouchements: EntityState<Accouchement>,
    pub grossesses: EntityState<Grossesse>,
}

impl SliceState for AppState {}

impl AppState {
    /// True while any slice has a request in flight.
    pub fn any_loading(&self) -> bool {
        self.complications.loading
            || self.vaccins.loading
            || self.naissances.loading
            || self.accouchements.loading
            || self.grossesses.loading
    }
}

/// An action routed to one slice, or a store-wide reset.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Complications(EntityAction<Complication>),
    Vaccins(EntityAction<Vaccin>),
    Naissances(EntityAction<Naissance>),
    Accouchements(EntityAction<Accouchement>),
    Grossesses(EntityAction<Grossesse>),
    /// Return every slice to its baseline.
    ResetAll,
}

macro_rules! route {
    ($variant:ident, $entity:ty) => {
        impl From<EntityAction<$entity>> for AppAction {
            fn from(action: EntityAction<$entity>) -> Self {
                AppAction::$variant(action)
            }
        }
    };
}

route!(Complications, Complication);
route!(Vaccins, Vaccin);
route!(Naissances, Naissance);
route!(Accouchements, Accouchement);
route!(Grossesses, Grossesse);

impl AppAction {
    /// Resource of the slice this action is routed to.
    pub fn resource(&self) -> Option<&'static str> {
        match self {
            AppAction::Complications(_) => Some(Complication::RESOURCE),
            AppAction::Vaccins(_) => Some(Vaccin::RESOURCE),
            AppAction::Naissances(_) => Some(Naissance::RESOURCE),
            AppAction::Accouchements(_) => Some(Accouchement::RESOURCE),
            AppAction::Grossesses(_) => Some(Grossesse::RESOURCE),
            AppAction::ResetAll => None,
        }
    }
}

impl Action for AppAction {
    fn name(&self) -> &'static str {
        match self {
            AppAction::Complications(action) => action.name(),
            AppAction::Vaccins(action) => action.name(),
            AppAction::Naissances(action) => action.name(),
            AppAction::Accouchements(action) => action.name(),
            AppAction::Grossesses(action) => action.name(),
            AppAction::ResetAll => "reset_all",
        }
    }

    fn is_trigger(&self) -> bool {
        match self {
            AppAction::Complications(action) => action.is_trigger(),
            AppAction::Vaccins(action) => action.is_trigger(),
            AppAction::Naissances(action) => action.is_trigger(),
            AppAction::Accouchements(action) => action.is_trigger(),
            AppAction::Grossesses(action) => action.is_trigger(),
            AppAction::ResetAll => false,
        }
    }
}

/// Routes each action to its slice reducer. Other slices are untouched.
pub struct AppReducer;

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;

    fn reduce(state: AppState, action: AppAction) -> AppState {
        match action {
            AppAction::Complications(action) => AppState {
                complications: EntityReducer::<Complication>::reduce(state.complications, action),
                ..state
            },
            AppAction::Vaccins(action) => AppState {
                vaccins: EntityReducer::<Vaccin>::reduce(state.vaccins, action),
                ..state
            },
            AppAction::Naissances(action) => AppState {
                naissances: EntityReducer::<Naissance>::reduce(state.naissances, action),
                ..state
            },
            AppAction::Accouchements(action) => AppState {
                accouchements: EntityReducer::<Accouchement>::reduce(state.accouchements, action),
                ..state
            },
            AppAction::Grossesses(action) => AppState {
                grossesses: EntityReducer::<Grossesse>::reduce(state.grossesses, action),
                ..state
            },
            AppAction::ResetAll => AppState::default(),
        }
    }
}

/// Effect handlers of every slice, sharing one gateway and notifier.
#[derive(Clone)]
pub struct AppEffects {
    complications: EntityEffects<Complication>,
    vaccins: EntityEffects<Vaccin>,
    naissances: EntityEffects<Naissance>,
    accouchements: EntityEffects<Accouchement>,
    grossesses: EntityEffects<Grossesse>,
}

impl AppEffects {
    pub fn new(gateway: Arc<dyn ApiGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            complications: EntityEffects::new(Arc::clone(&gateway), Arc::clone(&notifier)),
            vaccins: EntityEffects::new(Arc::clone(&gateway), Arc::clone(&notifier)),
            naissances: EntityEffects::new(Arc::clone(&gateway), Arc::clone(&notifier)),
            accouchements: EntityEffects::new(Arc::clone(&gateway), Arc::clone(&notifier)),
            grossesses: EntityEffects::new(gateway, notifier),
        }
    }

    pub async fn run(&self, action: AppAction) -> Option<AppAction> {
        match action {
            AppAction::Complications(action) => {
                self.complications.run(action).await.map(AppAction::from)
            }
            AppAction::Vaccins(action) => self.vaccins.run(action).await.map(AppAction::from),
            AppAction::Naissances(action) => {
                self.naissances.run(action).await.map(AppAction::from)
            }
            AppAction::Accouchements(action) => {
                self.accouchements.run(action).await.map(AppAction::from)
            }
            AppAction::Grossesses(action) => {
                self.grossesses.run(action).await.map(AppAction::from)
            }
            AppAction::ResetAll => None,
        }
    }
}
