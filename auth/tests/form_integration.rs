//! Integration tests for the credential forms driven through a Store
//!
//! Time is paused: every simulated delay elapses as soon as the test sleeps.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use octomarket_auth::constants::{effect_ids, messages};
use octomarket_auth::screens::{self, FormStore};
use octomarket_auth::{
    Field, FormAction, FormState, FormStatus, MockEnvironment, Navigation, Route,
};
use octomarket_auth::mocks::{InMemoryKeyValueStore, RecordingFocus, RecordingNavigator};
use octomarket_core::environment::SystemClock;
use octomarket_testing::{advance, init_tracing, settle};
use std::time::Duration;

type Store = FormStore<InMemoryKeyValueStore, RecordingNavigator, RecordingFocus, SystemClock>;

async fn fill(store: &Store, values: &[(Field, &str)]) {
    for (field, value) in values {
        store
            .send(FormAction::SetField {
                field: *field,
                value: (*value).to_string(),
            })
            .await
            .unwrap();
    }
}

async fn snapshot(store: &Store) -> FormState {
    store.state(FormState::clone).await
}

#[tokio::test(start_paused = true)]
async fn test_login_always_reports_account_not_found() {
    init_tracing();
    let env = MockEnvironment::in_memory();
    let store = screens::login(env.clone());

    fill(&store, &[(Field::Email, "jane@market.io"), (Field::Password, "secret12")]).await;
    store.send(FormAction::Submit).await.unwrap();
    assert_eq!(snapshot(&store).await.status, FormStatus::Submitting);

    advance(Duration::from_millis(1900)).await;
    assert_eq!(snapshot(&store).await.status, FormStatus::Submitting);

    advance(Duration::from_millis(200)).await;
    let state = snapshot(&store).await;
    assert_eq!(state.status, FormStatus::Failed);
    assert_eq!(state.error_message.as_deref(), Some(messages::ACCOUNT_NOT_FOUND));
    assert!(state.can_submit());
    assert!(env.navigator.navigations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_login_error_clears_once_form_is_valid() {
    let store = screens::login(MockEnvironment::in_memory());

    fill(&store, &[(Field::Email, "jane@market.io"), (Field::Password, "secret12")]).await;
    store.send(FormAction::Submit).await.unwrap();

    advance(Duration::from_millis(2100)).await;
    assert_eq!(snapshot(&store).await.error_message.as_deref(), Some(messages::ACCOUNT_NOT_FOUND));
    assert_eq!(store.in_flight_for(effect_ids::FORM_ERROR_CLEAR), 1);

    advance(Duration::from_millis(1800)).await;
    assert!(snapshot(&store).await.error_message.is_some());

    advance(Duration::from_millis(200)).await;
    let state = snapshot(&store).await;
    assert_eq!(state.error_message, None);
    assert!(state.can_submit());
    assert_eq!(store.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_double_submit_runs_one_delay() {
    let store = screens::login(MockEnvironment::in_memory());

    fill(&store, &[(Field::Email, "jane@market.io"), (Field::Password, "secret12")]).await;
    store.send(FormAction::Submit).await.unwrap();
    store.send(FormAction::Submit).await.unwrap();

    let state = snapshot(&store).await;
    assert_eq!(state.attempt, 1);
    assert_eq!(state.value(Field::Email), "jane@market.io");
    assert_eq!(store.in_flight_for(effect_ids::FORM_SUBMIT), 1);

    settle(&store).await;
    assert_eq!(snapshot(&store).await.status, FormStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_login_never_submits() {
    let store = screens::login(MockEnvironment::in_memory());

    fill(&store, &[(Field::Email, "jane@market"), (Field::Password, "secret12")]).await;
    store.send(FormAction::Submit).await.unwrap();

    let state = snapshot(&store).await;
    assert_eq!(state.status, FormStatus::Failed);
    assert_eq!(state.error_message.as_deref(), Some("Provide a valid email address."));
    assert_eq!(store.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_signup_hands_off_to_code_entry_after_notice() {
    let env = MockEnvironment::in_memory();
    let store = screens::signup(env.clone());

    fill(
        &store,
        &[
            (Field::FirstName, "Jane"),
            (Field::LastName, "Doe"),
            (Field::Email, " jane@market.io "),
            (Field::Password, "secret12"),
            (Field::ConfirmPassword, "secret12"),
            (Field::Birthday, "1990-04-01"),
        ],
    )
    .await;
    store.send(FormAction::Submit).await.unwrap();

    advance(Duration::from_millis(1300)).await;
    let state = snapshot(&store).await;
    assert_eq!(state.status, FormStatus::Succeeded);
    assert!(state.notice.visible);
    assert_eq!(state.notice.message, messages::SIGNUP_SUCCESS);
    assert!(env.navigator.navigations().is_empty());

    settle(&store).await;
    assert!(!snapshot(&store).await.notice.visible);
    assert_eq!(
        env.navigator.navigations(),
        vec![Navigation::push(Route::VerifyCode).with_email("jane@market.io")]
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_new_password_returns_to_login() {
    let env = MockEnvironment::in_memory();
    let store = screens::create_new_password(Some("jane@market.io".into()), env.clone());

    fill(&store, &[(Field::Password, "newpass99"), (Field::ConfirmPassword, "newpass99")]).await;
    store.send(FormAction::Submit).await.unwrap();
    settle(&store).await;

    assert_eq!(snapshot(&store).await.notice.message, messages::PASSWORD_RESET);
    assert_eq!(env.navigator.current_route(), Some(Route::Login));
}

#[tokio::test(start_paused = true)]
async fn test_teardown_during_submit_drops_result() {
    let env = MockEnvironment::in_memory();
    let store = screens::reset_password(env.clone());

    fill(&store, &[(Field::Email, "jane@market.io")]).await;
    store.send(FormAction::Submit).await.unwrap();
    assert_eq!(store.teardown(), 1);

    advance(Duration::from_secs(5)).await;

    assert_eq!(snapshot(&store).await.status, FormStatus::Submitting);
    assert!(env.navigator.navigations().is_empty());
    assert!(store.send(FormAction::Submit).await.is_err());
}
