//! Effect handler: one gateway call per trigger, normalized outcomes.

mod common;

use common::{at, complication, id, json, vaccin, GatewayCall, MockGateway, Verb};
use perinatal::domain::{
    Complication, ComplicationParent, ComplicationRelation, Grossesse, GrossesseSubaction, Vaccin,
    VaccinRequest, VaccinSubaction,
};
use perinatal::entity::{EntityAction, EntityEffects};
use perinatal::notify::{ChannelNotifier, Notification, NotificationLevel};
use std::sync::Arc;
use tokio::sync::mpsc;

fn effects_for<E: perinatal::entity::Entity>(
    gateway: &Arc<MockGateway>,
) -> (EntityEffects<E>, mpsc::UnboundedReceiver<Notification>) {
    let (notifier, receiver) = ChannelNotifier::new();
    (EntityEffects::new(gateway.clone(), Arc::new(notifier)), receiver)
}

fn bcg_request() -> VaccinRequest {
    VaccinRequest {
        nom: "BCG".to_string(),
        date: at("2026-10-01T09:00:00Z"),
        patiente_id: None,
        naissance_id: Some(id("n1")),
    }
}

/// Test that a parent-scoped load hits the relation path and reports the records.
#[tokio::test]
async fn test_load_by_parent_calls_relation_path() {
    let gateway = MockGateway::new();
    let c1 = complication("c1", Some(ComplicationParent::Grossesse(id("g1"))));
    gateway.reply(Verb::Get, "/complications/grossesse/g1", json(&vec![c1.clone()]));
    let (effects, mut notifications) = effects_for::<Complication>(&gateway);

    let action = EntityAction::load_by_parent(ComplicationRelation::Grossesse, "g1").unwrap();
    let follow_up = effects.run(action).await;

    assert_eq!(
        follow_up,
        Some(EntityAction::LoadByParentSuccess {
            relation: ComplicationRelation::Grossesse,
            items: vec![c1],
        })
    );
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall {
            verb: Verb::Get,
            path: "/complications/grossesse/g1".to_string(),
            body: None,
        }]
    );
    // Reads are silent.
    assert!(common::drain(&mut notifications).is_empty());
}

/// Test that a create posts the payload and announces success.
#[tokio::test]
async fn test_create_posts_payload_and_notifies() {
    let gateway = MockGateway::new();
    gateway.reply(Verb::Post, "/vaccins", json(&vaccin("v9", "BCG")));
    let (effects, mut notifications) = effects_for::<Vaccin>(&gateway);

    let follow_up = effects
        .run(EntityAction::create(bcg_request()).unwrap())
        .await;

    assert_eq!(
        follow_up,
        Some(EntityAction::CreateSuccess {
            item: vaccin("v9", "BCG"),
        })
    );
    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    let body = calls[0].body.as_ref().expect("create sends a body");
    assert_eq!(body["nom"], "BCG");
    assert_eq!(body["naissanceId"], "n1");
    assert!(body["patienteId"].is_null());

    let received = common::drain(&mut notifications);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].level, NotificationLevel::Success);
    assert_eq!(received[0].message, "Vaccin created");
}

/// Test that the backend message becomes the failure error and the error notification.
#[tokio::test]
async fn test_update_failure_uses_backend_message() {
    let gateway = MockGateway::new();
    gateway.fail(Verb::Put, "/vaccins/v1", 409, Some("Conflict"));
    let (effects, mut notifications) = effects_for::<Vaccin>(&gateway);

    let follow_up = effects
        .run(EntityAction::update("v1", bcg_request()).unwrap())
        .await;

    assert_eq!(
        follow_up,
        Some(EntityAction::UpdateFailure {
            error: "Conflict".to_string(),
        })
    );
    let received = common::drain(&mut notifications);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].level, NotificationLevel::Error);
    assert_eq!(received[0].message, "Conflict");
}

/// Test that failures without a backend message fall back to a per-operation message.
#[tokio::test]
async fn test_failure_without_message_uses_fallback() {
    let gateway = MockGateway::new();
    gateway.fail(Verb::Get, "/complications", 503, None);
    gateway.fail(Verb::Delete, "/complications/c1", 500, None);
    let (effects, mut notifications) = effects_for::<Complication>(&gateway);

    let load = effects.run(EntityAction::LoadAll).await;
    assert_eq!(
        load,
        Some(EntityAction::LoadAllFailure {
            error: "Failed to load complications".to_string(),
        })
    );

    let delete = effects.run(EntityAction::delete("c1").unwrap()).await;
    assert_eq!(
        delete,
        Some(EntityAction::DeleteFailure {
            error: "Failed to delete complication".to_string(),
        })
    );

    let messages: Vec<_> = common::drain(&mut notifications)
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec!["Failed to load complications", "Failed to delete complication"]
    );
}

/// Test that a malformed success body is reported as a failure.
#[tokio::test]
async fn test_undecodable_body_is_a_failure() {
    let gateway = MockGateway::new();
    gateway.reply(Verb::Get, "/vaccins/v1", serde_json::json!({ "unexpected": true }));
    let (effects, _notifications) = effects_for::<Vaccin>(&gateway);

    let follow_up = effects.run(EntityAction::load("v1").unwrap()).await;

    assert_eq!(
        follow_up,
        Some(EntityAction::LoadFailure {
            error: "Failed to load vaccin".to_string(),
        })
    );
}

/// Test that sub-actions are sent as PATCH without a body.
#[tokio::test]
async fn test_patch_targets_subaction_path() {
    let gateway = MockGateway::new();
    let mut administered = vaccin("v1", "BCG");
    administered.administre = true;
    gateway.reply(Verb::Patch, "/vaccins/v1/administrer", json(&administered));
    let (effects, mut notifications) = effects_for::<Vaccin>(&gateway);

    let follow_up = effects
        .run(EntityAction::patch("v1", VaccinSubaction::Administrer).unwrap())
        .await;

    assert_eq!(
        follow_up,
        Some(EntityAction::PatchSuccess { item: administered })
    );
    assert_eq!(gateway.calls()[0].body, None);
    assert_eq!(common::drain(&mut notifications)[0].message, "Vaccin updated");

    let (grossesse_effects, _rx) = effects_for::<Grossesse>(&gateway);
    gateway.fail(Verb::Patch, "/grossesses/g1/terminer", 404, None);
    let follow_up = grossesse_effects
        .run(EntityAction::patch("g1", GrossesseSubaction::Terminer).unwrap())
        .await;
    assert_eq!(
        follow_up,
        Some(EntityAction::PatchFailure {
            error: "Failed to update grossesse".to_string(),
        })
    );
}

/// Test that a delete reports the deleted id.
#[tokio::test]
async fn test_delete_success_carries_id() {
    let gateway = MockGateway::new();
    gateway.reply(Verb::Delete, "/complications/c1", serde_json::Value::Null);
    let (effects, mut notifications) = effects_for::<Complication>(&gateway);

    let follow_up = effects.run(EntityAction::delete("c1").unwrap()).await;

    assert_eq!(follow_up, Some(EntityAction::DeleteSuccess { id: id("c1") }));
    assert_eq!(common::drain(&mut notifications)[0].message, "Complication deleted");
}

/// Test that synchronous actions never reach the gateway.
#[tokio::test]
async fn test_non_triggers_have_no_effect() {
    let gateway = MockGateway::new();
    let (effects, mut notifications) = effects_for::<Vaccin>(&gateway);

    for action in [
        EntityAction::select(Some("v1")),
        EntityAction::Reset,
        EntityAction::ClearFilters,
        EntityAction::LoadAllSuccess { items: Vec::new() },
        EntityAction::CreateFailure {
            error: "x".to_string(),
        },
    ] {
        assert_eq!(effects.run(action).await, None);
    }
    assert!(gateway.calls().is_empty());
    assert!(common::drain(&mut notifications).is_empty());
}

/// Test that a blank nullable reference does not fail the whole collection.
#[tokio::test]
async fn test_load_all_tolerates_blank_references() {
    let gateway = MockGateway::new();
    gateway.reply(
        Verb::Get,
        "/vaccins",
        serde_json::json!([
            {"id": "v1", "nom": "BCG", "date": "2026-10-01T09:00:00Z",
             "patienteId": "", "naissanceId": "n1"},
            {"id": "v2", "nom": "Hépatite B", "date": "2026-10-02T09:00:00Z",
             "patienteId": "p1", "naissanceId": null}
        ]),
    );
    let (effects, mut notifications) = effects_for::<Vaccin>(&gateway);

    let Some(EntityAction::LoadAllSuccess { items }) = effects.run(EntityAction::LoadAll).await
    else {
        panic!("expected LoadAllSuccess");
    };

    assert_eq!(items.len(), 2);
    assert!(items[0].patiente_id.is_none());
    assert_eq!(items[1].patiente_id, Some(id("p1")));
    assert!(common::drain(&mut notifications).is_empty());
}
