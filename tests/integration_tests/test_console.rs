use crate::setup::{Session, fixture_config};
use anyhow::Result;
use controller::{ControllerError, Intent, OperationError};
use model::SessionState;
use model::table::CreateTable;
use std::time::Duration;
use test_utils::{TestHarness, test_identity, test_principal};

#[tokio::test]
async fn recovered_session_is_published_on_start() -> Result<()> {
    let harness = TestHarness::with_stored_credential();
    harness
        .service
        .create_table_for(&test_identity(), CreateTable::new("t1").with_column("a"))?;
    let session = Session::start(harness);

    let mut snapshots = session.console.subscribe();
    let snapshot = snapshots
        .wait_for(|s| !s.tables.is_empty())
        .await?
        .clone();

    assert_eq!(snapshot.session, SessionState::Authenticated);
    assert_eq!(snapshot.principal, Some(test_principal()));
    assert_eq!(snapshot.tables, vec!["t1".to_string()]);
    Ok(())
}

#[tokio::test]
async fn table_lifecycle_through_the_console() -> Result<()> {
    let session = Session::logged_in().await;
    let console = &session.console;

    console
        .create_table(CreateTable::new("t1").with_columns(["a", "", "b"]))
        .await?;
    console.select_table("t1").await?;
    console.set_draft_value("a", "1").await?;
    console.set_draft_value("b", "2").await?;
    console.insert_row().await?;
    console.set_draft_value("a", "3").await?;
    console.insert_row().await?;

    let snapshot = console.snapshot().await?;
    assert_eq!(snapshot.selected.as_ref().map(|d| d.row_count), Some(2));
    assert_eq!(
        snapshot.selected.map(|d| d.columns),
        Some(vec!["a".to_string(), "b".to_string()])
    );

    console.query_column("a").await?;
    let snapshot = console.snapshot().await?;
    assert_eq!(
        snapshot.column_result.map(|r| r.values),
        Some(vec!["1".to_string(), "3".to_string()])
    );

    console.query_all().await?;
    let snapshot = console.snapshot().await?;
    assert!(snapshot.column_result.is_none());
    assert_eq!(
        snapshot.table_result,
        vec![
            vec!["1".to_string(), "2".to_string()],
            vec!["3".to_string(), "".to_string()],
        ]
    );

    console.drop_table("t1").await?;
    let snapshot = console.snapshot().await?;
    assert!(snapshot.tables.is_empty());
    assert!(snapshot.selected.is_none());
    assert!(!snapshot.busy);
    assert!(session.harness.service.tables_of(&test_principal()).is_empty());
    Ok(())
}

#[tokio::test]
async fn unauthenticated_intents_are_rejected() -> Result<()> {
    let session = Session::start(TestHarness::new());

    assert_eq!(
        session.console.refresh_tables().await,
        Err(ControllerError::NotAuthenticated)
    );
    assert_eq!(
        session.console.submit(Intent::QueryAll).await,
        Err(ControllerError::NotAuthenticated)
    );
    let snapshot = session.console.snapshot().await?;
    assert_eq!(snapshot.session, SessionState::Unauthenticated);
    assert!(snapshot.notification.is_none());
    Ok(())
}

#[tokio::test]
async fn logout_resets_everything() -> Result<()> {
    let session = Session::logged_in().await;
    let console = &session.console;
    console
        .create_table(CreateTable::new("t1").with_column("a"))
        .await?;
    console.select_table("t1").await?;
    console.query_all().await?;

    console.logout().await?;

    let snapshot = console.snapshot().await?;
    assert_eq!(snapshot.session, SessionState::Unauthenticated);
    assert!(snapshot.is_cleared());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn duplicate_create_raises_one_expiring_notification() -> Result<()> {
    let session = Session::logged_in().await;
    let console = &session.console;
    console
        .create_table(CreateTable::new("t1").with_column("a"))
        .await?;

    let result = console
        .create_table(CreateTable::new("t1").with_column("a"))
        .await;
    let err = match result {
        Err(ControllerError::Failed(err @ OperationError::CreateTable(_))) => err,
        other => panic!("duplicate create should fail remotely, got {other:?}"),
    };

    let snapshot = console.snapshot().await?;
    let notification = snapshot.notification.expect("failure should be shown");
    assert_eq!(notification.message, err.to_string());
    assert_eq!(snapshot.tables, vec!["t1".to_string()]);
    assert!(!snapshot.busy);

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(console.snapshot().await?.notification.is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn console_on_its_own_thread() -> Result<()> {
    test_utils::init_tracing();
    let harness = TestHarness::new();
    let console = console::start(
        fixture_config(),
        harness.service.clone(),
        harness.provider.clone(),
    )?;

    console.login().await?;
    console
        .create_table(CreateTable::new("t1").with_column("a"))
        .await?;

    let snapshot = console.snapshot().await?;
    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.tables, vec!["t1".to_string()]);
    Ok(())
}
