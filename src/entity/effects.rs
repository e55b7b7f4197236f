//! Effect handler for entity slices.
//!
//! Answers each trigger with exactly one gateway call and returns the
//! success or failure action to dispatch. No retries, no de-duplication.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiError, ApiGateway};
use crate::notify::{Notification, Notifier};

use super::action::EntityAction;
use super::{Entity, EntityId, RelationKind, Subaction};

/// Gateway operation behind a trigger, used for messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    LoadAll,
    LoadByParent,
    Create,
    Update,
    Patch,
    Delete,
}

impl Operation {
    fn verb(self) -> &'static str {
        match self {
            Operation::Load | Operation::LoadAll | Operation::LoadByParent => "load",
            Operation::Create => "create",
            Operation::Update | Operation::Patch => "update",
            Operation::Delete => "delete",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Operation::Load | Operation::LoadAll | Operation::LoadByParent => "loaded",
            Operation::Create => "created",
            Operation::Update | Operation::Patch => "updated",
            Operation::Delete => "deleted",
        }
    }
}

/// Bridges [`EntityAction`] triggers to the [`ApiGateway`].
pub struct EntityEffects<E> {
    gateway: Arc<dyn ApiGateway>,
    notifier: Arc<dyn Notifier>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityEffects<E> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            notifier: Arc::clone(&self.notifier),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityEffects<E> {
    pub fn new(gateway: Arc<dyn ApiGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            _entity: PhantomData,
        }
    }

    /// Run the effect for `action`.
    ///
    /// Returns the follow-up action for triggers and `None` for everything
    /// else. Never returns a trigger.
    pub async fn run(&self, action: EntityAction<E>) -> Option<EntityAction<E>> {
        let follow_up = match action {
            EntityAction::Load { id } => {
                match self.get::<E>(&item_path::<E>(&id)).await {
                    Ok(item) => EntityAction::LoadSuccess { item },
                    Err(err) => EntityAction::LoadFailure {
                        error: self.fail(Operation::Load, &err),
                    },
                }
            }

            EntityAction::LoadAll => match self.get::<Vec<E>>(&collection_path::<E>()).await {
                Ok(items) => EntityAction::LoadAllSuccess { items },
                Err(err) => EntityAction::LoadAllFailure {
                    error: self.fail(Operation::LoadAll, &err),
                },
            },

            EntityAction::LoadByParent {
                relation,
                parent_id,
            } => {
                let path = parent_path::<E>(relation, &parent_id);
                match self.get::<Vec<E>>(&path).await {
                    Ok(items) => EntityAction::LoadByParentSuccess { relation, items },
                    Err(err) => EntityAction::LoadByParentFailure {
                        relation,
                        error: self.fail(Operation::LoadByParent, &err),
                    },
                }
            }

            EntityAction::Create { payload } => {
                let result = match serde_json::to_value(&payload) {
                    Ok(body) => self.gateway.post(&collection_path::<E>(), body).await,
                    Err(err) => Err(ApiError::from(err)),
                };
                match result.and_then(decode::<E>) {
                    Ok(item) => {
                        self.succeed(Operation::Create);
                        EntityAction::CreateSuccess { item }
                    }
                    Err(err) => EntityAction::CreateFailure {
                        error: self.fail(Operation::Create, &err),
                    },
                }
            }

            EntityAction::Update { id, payload } => {
                let result = match serde_json::to_value(&payload) {
                    Ok(body) => self.gateway.put(&item_path::<E>(&id), body).await,
                    Err(err) => Err(ApiError::from(err)),
                };
                match result.and_then(decode::<E>) {
                    Ok(item) => {
                        self.succeed(Operation::Update);
                        EntityAction::UpdateSuccess { item }
                    }
                    Err(err) => EntityAction::UpdateFailure {
                        error: self.fail(Operation::Update, &err),
                    },
                }
            }

            EntityAction::Patch { id, subaction } => {
                let path = format!("{}/{}", item_path::<E>(&id), subaction.path_segment());
                match self.gateway.patch(&path, None).await.and_then(decode::<E>) {
                    Ok(item) => {
                        self.succeed(Operation::Patch);
                        EntityAction::PatchSuccess { item }
                    }
                    Err(err) => EntityAction::PatchFailure {
                        error: self.fail(Operation::Patch, &err),
                    },
                }
            }

            EntityAction::Delete { id } => match self.gateway.delete(&item_path::<E>(&id)).await {
                Ok(()) => {
                    self.succeed(Operation::Delete);
                    EntityAction::DeleteSuccess { id }
                }
                Err(err) => EntityAction::DeleteFailure {
                    error: self.fail(Operation::Delete, &err),
                },
            },

            _ => return None,
        };

        Some(follow_up)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.gateway.get(path).await.and_then(decode::<T>)
    }

    /// Only mutations announce their success to the user.
    fn succeed(&self, operation: Operation) {
        tracing::debug!(
            resource = E::RESOURCE,
            operation = ?operation,
            "Gateway call succeeded"
        );
        self.notifier.notify(Notification::success(format!(
            "{} {}",
            E::LABEL,
            operation.past_tense()
        )));
    }

    /// Log the failure, notify the user and return the message for the state.
    fn fail(&self, operation: Operation, err: &ApiError) -> String {
        let subject = match operation {
            Operation::LoadAll | Operation::LoadByParent => E::RESOURCE.to_string(),
            _ => E::LABEL.to_lowercase(),
        };
        let fallback = format!("Failed to {} {}", operation.verb(), subject);
        let message = err.user_message(&fallback);
        tracing::warn!(
            resource = E::RESOURCE,
            operation = ?operation,
            error = %err,
            "Gateway call failed"
        );
        self.notifier.notify(Notification::error(message.clone()));
        message
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(ApiError::from)
}

fn collection_path<E: Entity>() -> String {
    format!("/{}", E::RESOURCE)
}

fn item_path<E: Entity>(id: &EntityId) -> String {
    format!("/{}/{}", E::RESOURCE, id)
}

fn parent_path<E: Entity>(relation: E::Relation, parent_id: &EntityId) -> String {
    format!(
        "/{}/{}/{}",
        E::RESOURCE,
        relation.path_segment(),
        parent_id
    )
}
