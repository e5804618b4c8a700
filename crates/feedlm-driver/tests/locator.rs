mod common;

use common::FakeNotebook;
use feedlm_driver::{
    BatchContext, DriverError, HostPage, Locator, LocatorStrategy, Poller, Scope, Stage,
};
use std::time::Duration;

const BUDGET: Duration = Duration::from_millis(1000);

async fn open_dialog(fake: &FakeNotebook) {
    let buttons = fake
        .query_all(&Scope::Document, "button.add-source-button")
        .await
        .unwrap();
    fake.click(&buttons[0].handle).await.unwrap();
}

fn dialog() -> Scope {
    Scope::within("mat-dialog-container")
}

#[tokio::test(start_paused = true)]
async fn test_marker_finds_clickable_ancestor() {
    let fake = FakeNotebook::new();
    open_dialog(&fake).await;
    let ctx = BatchContext::new(1);
    let locator = Locator::new(&fake, Poller::new(&ctx, Duration::from_millis(250)));

    let chip = locator
        .by_distinguishing_child(
            Stage::SelectingKind,
            &dialog(),
            "mat-icon",
            "video_youtube",
            "mat-chip[tabindex=\"0\"]",
            BUDGET,
        )
        .await
        .unwrap();

    assert_eq!(chip.as_str(), "node-2");
}

#[tokio::test(start_paused = true)]
async fn test_content_falls_back_to_nested_label() {
    let fake = FakeNotebook::new().without_chip_icons();
    open_dialog(&fake).await;
    let ctx = BatchContext::new(1);
    let locator = Locator::new(&fake, Poller::new(&ctx, Duration::from_millis(100)));
    let roles = vec!["button".to_string(), "mat-chip".to_string()];

    let youtube = locator
        .by_content(Stage::SelectingKind, &dialog(), &roles, "youtube", BUDGET)
        .await
        .unwrap();
    let website = locator
        .by_content(Stage::SelectingKind, &dialog(), &roles, "Website", BUDGET)
        .await
        .unwrap();

    assert_eq!(youtube.as_str(), "node-2");
    assert_eq!(website.as_str(), "node-5");
}

#[tokio::test(start_paused = true)]
async fn test_ladder_uses_first_strategy_that_hits() {
    let fake = FakeNotebook::new().without_chip_icons();
    open_dialog(&fake).await;
    let ctx = BatchContext::new(1);
    let locator = Locator::new(&fake, Poller::new(&ctx, Duration::from_millis(100)));
    let ladder = vec![
        LocatorStrategy::marker("mat-icon", "video_youtube", "mat-chip"),
        LocatorStrategy::content("YouTube"),
    ];

    let chip = locator
        .locate(Stage::SelectingKind, &dialog(), &ladder, BUDGET)
        .await
        .unwrap();

    assert_eq!(chip.as_str(), "node-2");
}

#[tokio::test(start_paused = true)]
async fn test_hidden_element_times_out() {
    let fake = FakeNotebook::new();
    open_dialog(&fake).await;
    let ctx = BatchContext::new(1);
    let locator = Locator::new(&fake, Poller::new(&ctx, Duration::from_millis(100)));

    let err = locator
        .by_attribute(
            Stage::EnteringValue,
            &dialog(),
            "input[formcontrolname=\"newUrl\"]",
            BUDGET,
        )
        .await
        .unwrap_err();

    match err {
        DriverError::Timeout { stage, target, .. } => {
            assert_eq!(stage, Stage::EnteringValue);
            assert!(target.contains("newUrl"));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_hidden_scope_yields_nothing() {
    let fake = FakeNotebook::new();
    let ctx = BatchContext::new(1);
    let locator = Locator::new(&fake, Poller::new(&ctx, Duration::from_millis(100)));

    let probe = locator
        .probe_ladder(&dialog(), &[LocatorStrategy::content("YouTube")])
        .await
        .unwrap();

    assert!(probe.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_scope_excludes_outside_elements() {
    let fake = FakeNotebook::new();
    open_dialog(&fake).await;
    let ctx = BatchContext::new(1);
    let locator = Locator::new(&fake, Poller::new(&ctx, Duration::from_millis(100)));

    // The add button lives outside the dialog.
    let inside = locator
        .probe_ladder(
            &dialog(),
            &[LocatorStrategy::attribute("button.add-source-button")],
        )
        .await
        .unwrap();
    let anywhere = locator
        .probe_ladder(
            &Scope::Document,
            &[LocatorStrategy::attribute("button.add-source-button")],
        )
        .await
        .unwrap();

    assert!(inside.is_none());
    assert!(anywhere.is_some());
}
