//! Integration of the mock roster loader with a live engine.
//!
//! The host pattern under test: await deliveries on the loader side and
//! forward each one to the engine sequentially. The engine itself never
//! blocks; late deliveries are still applied.

use codelock_core::{ActorId, CodeMatch, KeypadEvent, Token};
use codelock_emulator::{MockRosterLoader, RecordingPanel, RosterDelivery};
use codelock_engine::{Decision, InputOutcome, KeypadConfig, KeypadEngine};
use std::cell::RefCell;
use std::rc::Rc;

fn engine() -> KeypadEngine {
    KeypadEngine::new(
        KeypadConfig::builder()
            .with_primary_code("1234")
            .with_primary_output("door")
            .with_auto_grant_allowed(true)
            .build(),
    )
}

#[tokio::test]
async fn chunk_deliveries_rederive_roster_in_order() {
    let (mut loader, handle) = MockRosterLoader::new();
    let mut engine = engine();

    tokio::spawn(async move {
        handle.send_chunk("a,b,c").await.unwrap();
        handle.send_chunk("d").await.unwrap();
    });

    while let Ok(delivery) = loader.recv().await {
        delivery.apply(&mut engine);
    }

    assert_eq!(engine.roster().entries(), ["a", "b", "c", "d"]);
}

#[tokio::test]
async fn delivery_auto_grants_present_actor() {
    let (mut loader, handle) = MockRosterLoader::new();
    let mut engine = engine();
    engine.set_actor(ActorId::from("carol"));

    let panel = Rc::new(RefCell::new(RecordingPanel::new()));
    engine.add_relay(KeypadEvent::Granted, &panel);

    handle.send_chunk("alice,bob").await.unwrap();
    handle.send_chunk("carol").await.unwrap();
    drop(handle);

    let mut granted = false;
    while let Ok(delivery) = loader.recv().await {
        granted |= delivery.apply(&mut engine);
    }

    assert!(granted);
    assert!(engine.is_granted());
    assert_eq!(engine.last_match(), CodeMatch::AllowList);
    assert_eq!(panel.borrow().last().unwrap().marker, -2);
    assert!(engine.primary_outputs()[0].is_released());
}

#[tokio::test]
async fn failed_delivery_leaves_engine_state_intact() {
    let (mut loader, handle) = MockRosterLoader::new();
    let mut engine = engine();
    engine.set_actor(ActorId::from("dave"));

    handle.send_chunk("alice").await.unwrap();
    handle.send_failure("http 404").await.unwrap();
    drop(handle);

    while let Ok(delivery) = loader.recv().await {
        delivery.apply(&mut engine);
    }

    // The failure neither crashed anything nor touched the derived roster.
    assert_eq!(engine.roster().entries(), ["alice"]);
    assert!(!engine.is_granted());
}

#[tokio::test]
async fn late_delivery_after_evaluation_is_still_applied() {
    let (mut loader, handle) = MockRosterLoader::new();
    let mut engine = engine();
    engine.set_actor(ActorId::from("erin"));

    // Actor evaluates (and fails) before the roster ever arrives.
    for c in "0000".chars() {
        engine.submit_input(Token::Key(c));
    }
    assert_eq!(
        engine.submit_input(Token::Confirm),
        InputOutcome::Decided(Decision::Denied)
    );

    handle.send_chunk("erin").await.unwrap();
    let delivery = loader.recv().await.unwrap();
    assert_eq!(delivery, RosterDelivery::Chunk("erin".to_string()));
    assert!(delivery.apply(&mut engine));
    assert!(engine.is_granted());
}
