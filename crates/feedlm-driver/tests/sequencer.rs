mod common;

use common::{Action, FakeNotebook, config, items};
use feedlm_driver::{BatchContext, DriverError, InsertionState, Sequencer, Stage};
use std::time::Duration;

use InsertionState::*;

#[tokio::test(start_paused = true)]
async fn test_insert_walks_every_state() {
    let fake = FakeNotebook::new();
    let ctx = BatchContext::new(1);
    let config = config();
    let item = &items(1)[0];

    let mut sequencer = Sequencer::new(&fake, &ctx, &config);
    sequencer.insert(item).await.unwrap();

    assert_eq!(
        sequencer.trail(),
        &[
            Idle,
            OpeningComposer,
            SelectingKind,
            EnteringValue,
            Confirming,
            AwaitingCompletion,
            Succeeded
        ]
    );
    assert_eq!(
        fake.actions(),
        vec![
            Action::Click("add-source"),
            Action::Click("youtube-chip"),
            Action::Fill("url-input", item.link.clone()),
            Action::Click("insert"),
        ]
    );
    assert_eq!(fake.inserted(), vec![item.link.clone()]);
}

#[tokio::test(start_paused = true)]
async fn test_attribute_profile_falls_back_to_content() {
    let fake = FakeNotebook::new().without_chip_icons();
    let ctx = BatchContext::new(1);
    let mut config = config();
    config.selectors = feedlm_driver::SelectorProfile::attribute();
    let item = &items(1)[0];

    Sequencer::new(&fake, &ctx, &config)
        .insert(item)
        .await
        .unwrap();

    assert_eq!(fake.clicks("youtube-chip"), 1);
    assert_eq!(fake.clicks("website-chip"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_missing_open_control_fails_first_step() {
    let fake = FakeNotebook::new().without_add_button();
    let ctx = BatchContext::new(1);
    let config = config();

    let mut sequencer = Sequencer::new(&fake, &ctx, &config);
    let err = sequencer.insert(&items(1)[0]).await.unwrap_err();

    assert!(matches!(
        err,
        DriverError::Timeout {
            stage: Stage::OpeningComposer,
            ..
        }
    ));
    assert_eq!(sequencer.trail(), &[Idle, OpeningComposer, Failed]);
    assert!(fake.actions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_completion_gate_times_out() {
    let fake = FakeNotebook::new().never_accepts();
    let ctx = BatchContext::new(1);
    let config = config();

    let mut sequencer = Sequencer::new(&fake, &ctx, &config);
    let started = tokio::time::Instant::now();
    let err = sequencer.insert(&items(1)[0]).await.unwrap_err();

    assert!(err.to_string().contains("still present"));
    assert_eq!(sequencer.state(), Failed);
    assert!(started.elapsed() >= config.timeouts.completion());
}

#[tokio::test(start_paused = true)]
async fn test_stop_while_selecting_kind() {
    let fake = FakeNotebook::new();
    let ctx = BatchContext::new(1);
    let config = config();
    let token = ctx.token().clone();
    // After the composer opens (500ms pause) but before the link is entered.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(600)).await;
        token.cancel();
    });

    let mut sequencer = Sequencer::new(&fake, &ctx, &config);
    let err = sequencer.insert(&items(1)[0]).await.unwrap_err();

    assert!(matches!(
        err,
        DriverError::Cancelled {
            stage: Stage::SelectingKind
        }
    ));
    assert_eq!(sequencer.trail().last(), Some(&Cancelled));
    assert_eq!(sequencer.trail()[sequencer.trail().len() - 2], SelectingKind);
    assert!(
        !fake
            .actions()
            .iter()
            .any(|a| matches!(a, Action::Fill(..)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_reused_sequencer_restarts_from_idle() {
    let fake = FakeNotebook::new();
    let ctx = BatchContext::new(2);
    let config = config();
    let batch = items(2);

    let mut sequencer = Sequencer::new(&fake, &ctx, &config);
    sequencer.insert(&batch[0]).await.unwrap();
    sequencer.insert(&batch[1]).await.unwrap();

    assert_eq!(sequencer.trail().first(), Some(&Idle));
    assert_eq!(sequencer.trail().len(), 7);
    assert_eq!(fake.inserted().len(), 2);
}
