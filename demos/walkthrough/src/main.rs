//! Walkthrough binary
//!
//! Plays a first-time user against the in-memory ports: launch gate,
//! onboarding, landing, signup and email confirmation. Every screen is its own
//! Store and is torn down when the walkthrough leaves it.
//!
//! Timings come from `OCTOMARKET_*` environment variables (see `FlowConfig`).

use anyhow::Context;
use octomarket_auth::mocks::NavigationRecord;
use octomarket_auth::{
    Field, FlowConfig, FormAction, LandingAction, LaunchAction, MockEnvironment,
    OnboardingAction, VerificationAction, screens,
};
use octomarket_core::reducer::Reducer;
use octomarket_runtime::Store;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Wait until `store` has no effect in flight.
async fn wait_idle<S, A, E, R>(store: &Store<S, A, E, R>)
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    while store.in_flight() > 0 {
        tracing::trace!(in_flight = store.in_flight(), "Waiting for effects");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Log where the navigator is now.
fn report(env: &MockEnvironment) {
    match env.navigator.history().last() {
        Some(NavigationRecord::Navigated(navigation)) => {
            tracing::info!(mode = ?navigation.mode, route = %navigation.route, "Navigated");
        },
        Some(NavigationRecord::Back) => tracing::info!("Navigated back"),
        None => tracing::warn!("Still on splash"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walkthrough=debug,octomarket_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = FlowConfig::from_env().context("invalid OCTOMARKET_* configuration")?;
    let env = MockEnvironment::in_memory().with_config(config);

    println!("=== OctoMarket walkthrough ===\n");

    // Launch gate
    println!(">>> Launch");
    let launch = screens::launch(env.clone());
    launch.send(LaunchAction::Start).await?;
    wait_idle(&launch).await;
    println!("    phase: {:?}", launch.state(|s| s.phase).await);
    report(&env);
    launch.teardown();

    // Onboarding
    println!("\n>>> Onboarding");
    let onboarding = screens::onboarding(env.clone());
    for _ in 0..3 {
        onboarding.send(OnboardingAction::Next).await?;
    }
    wait_idle(&onboarding).await;
    report(&env);
    onboarding.teardown();

    // Landing
    println!("\n>>> Landing: Get started");
    let landing = screens::landing(env.clone());
    landing.send(LandingAction::GetStarted).await?;
    wait_idle(&landing).await;
    report(&env);
    landing.teardown();

    // Signup, first with a weak password
    println!("\n>>> Signup");
    let signup = screens::signup(env.clone());
    let email = "jane@octomarket.io";
    for (field, value) in [
        (Field::FirstName, "Jane"),
        (Field::LastName, "Doe"),
        (Field::Email, email),
        (Field::Password, "password"),
        (Field::ConfirmPassword, "password"),
        (Field::Birthday, "1990-04-01"),
    ] {
        signup
            .send(FormAction::SetField {
                field,
                value: value.to_string(),
            })
            .await?;
    }
    signup.send(FormAction::Submit).await?;
    if let Some(message) = signup.state(|s| s.error_message.clone()).await {
        tracing::info!(%message, "Signup rejected");
    }

    for field in [Field::Password, Field::ConfirmPassword] {
        signup
            .send(FormAction::SetField {
                field,
                value: "password1".to_string(),
            })
            .await?;
    }
    signup.send(FormAction::Submit).await?;
    wait_idle(&signup).await;
    println!("    status: {:?}", signup.state(|s| s.status).await);
    report(&env);
    signup.teardown();

    // Email confirmation, one typo then the right code
    println!("\n>>> Verify email");
    let verify = screens::verify_code(Some(email.to_string()), env.clone());
    for (index, digit) in "1239".chars().enumerate() {
        verify
            .send(VerificationAction::SetDigit {
                index,
                value: digit.to_string(),
            })
            .await?;
    }
    verify.send(VerificationAction::Verify).await?;
    if let Some(message) = verify.state(|s| s.error_message.clone()).await {
        tracing::info!(%message, "Code rejected");
    }

    verify
        .send(VerificationAction::SetDigit {
            index: 3,
            value: "4".to_string(),
        })
        .await?;
    verify.send(VerificationAction::Verify).await?;
    wait_idle(&verify).await;
    println!("    phase: {:?}", verify.state(|s| s.phase).await);
    println!("    focus requests: {:?}", env.focus.requests());
    report(&env);
    verify.teardown();

    println!("\n=== Walkthrough complete: {} navigations ===", env.navigator.history().len());

    Ok(())
}
