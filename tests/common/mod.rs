//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use async_trait::async_trait;
use parking_lot::Mutex;
use perinatal::api::{ApiError, ApiGateway};
use perinatal::domain::{
    Accouchement, Complication, ComplicationParent, Grossesse, ModeAccouchement, Naissance, Sexe,
    StatutGrossesse, Vaccin,
};
use perinatal::entity::EntityId;
use perinatal::notify::{ChannelNotifier, Notification};
use perinatal::store::{AppEffects, Store};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// HTTP verb seen by the [`MockGateway`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// One call made against the [`MockGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCall {
    pub verb: Verb,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct Reply {
    outcome: Result<Value, (u16, Option<String>)>,
    delay: Duration,
}

/// In-memory [`ApiGateway`] answering from per-route reply queues.
///
/// Unscripted calls fail with a 500 so a missing reply shows up as a
/// failure action instead of a hang.
#[derive(Default)]
pub struct MockGateway {
    replies: Mutex<HashMap<(Verb, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer the next `verb path` call with `body`.
    pub fn reply(&self, verb: Verb, path: &str, body: Value) {
        self.reply_after(verb, path, body, Duration::ZERO);
    }

    /// Answer the next `verb path` call with `body` once `delay` has elapsed.
    pub fn reply_after(&self, verb: Verb, path: &str, body: Value, delay: Duration) {
        self.push(
            verb,
            path,
            Reply {
                outcome: Ok(body),
                delay,
            },
        );
    }

    /// Fail the next `verb path` call with an HTTP status.
    pub fn fail(&self, verb: Verb, path: &str, status: u16, message: Option<&str>) {
        self.push(
            verb,
            path,
            Reply {
                outcome: Err((status, message.map(str::to_string))),
                delay: Duration::ZERO,
            },
        );
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    fn push(&self, verb: Verb, path: &str, reply: Reply) {
        self.replies
            .lock()
            .entry((verb, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    async fn answer(&self, verb: Verb, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.calls.lock().push(GatewayCall {
            verb,
            path: path.to_string(),
            body,
        });
        let reply = self
            .replies
            .lock()
            .get_mut(&(verb, path.to_string()))
            .and_then(VecDeque::pop_front);

        let Some(reply) = reply else {
            return Err(ApiError::Status {
                status: 500,
                message: Some(format!("no scripted reply for {verb:?} {path}")),
            });
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply
            .outcome
            .map_err(|(status, message)| ApiError::Status { status, message })
    }
}

#[async_trait]
impl ApiGateway for MockGateway {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.answer(Verb::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.answer(Verb::Post, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.answer(Verb::Put, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.answer(Verb::Patch, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.answer(Verb::Delete, path, None).await.map(|_| ())
    }
}

/// Store wired to a [`MockGateway`], with notifications captured on a channel.
pub fn mock_store() -> (Store, Arc<MockGateway>, mpsc::UnboundedReceiver<Notification>) {
    let gateway = MockGateway::new();
    let (notifier, notifications) = ChannelNotifier::new();
    let effects = AppEffects::new(gateway.clone(), Arc::new(notifier));
    (Store::start(effects), gateway, notifications)
}

/// Drain every notification received so far.
pub fn drain(receiver: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut received = Vec::new();
    while let Ok(notification) = receiver.try_recv() {
        received.push(notification);
    }
    received
}

pub fn id(value: &str) -> EntityId {
    EntityId::parse(value).expect("valid id")
}

pub fn at(timestamp: &str) -> chrono::DateTime<chrono::Utc> {
    timestamp.parse().expect("RFC 3339 timestamp")
}

pub fn complication(record_id: &str, parent: Option<ComplicationParent>) -> Complication {
    Complication {
        id: id(record_id),
        nature: "Hémorragie".to_string(),
        date: at("2026-09-14T10:30:00Z"),
        lieu: "Salle 3".to_string(),
        observation: String::new(),
        parent,
    }
}

pub fn vaccin(record_id: &str, nom: &str) -> Vaccin {
    Vaccin {
        id: id(record_id),
        nom: nom.to_string(),
        date: at("2026-10-01T09:00:00Z"),
        patiente_id: Some(id("p1")),
        naissance_id: None,
        administre: false,
    }
}

pub fn naissance(record_id: &str, accouchement_id: &str, poids: u32) -> Naissance {
    Naissance {
        id: id(record_id),
        accouchement_id: id(accouchement_id),
        date_naissance: at("2026-09-14T08:05:00Z"),
        prenom: Some("Lina".to_string()),
        sexe: Sexe::Feminin,
        poids,
        taille: Some(49.5),
        apgar1: Some(8),
        apgar5: Some(9),
    }
}

pub fn accouchement(record_id: &str, grossesse_id: &str, mode: ModeAccouchement) -> Accouchement {
    Accouchement {
        id: id(record_id),
        grossesse_id: id(grossesse_id),
        date: at("2026-09-14T07:40:00Z"),
        lieu: "Maternité Nord".to_string(),
        mode,
        observations: None,
    }
}

pub fn grossesse(record_id: &str, patiente_id: &str) -> Grossesse {
    Grossesse {
        id: id(record_id),
        patiente_id: id(patiente_id),
        date_debut: at("2025-12-10T00:00:00Z"),
        date_terme_prevue: None,
        nombre_foetus: 1,
        statut: StatutGrossesse::EnCours,
        observations: None,
    }
}

pub fn json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("serializable")
}
