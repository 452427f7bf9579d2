use catalog::DraftError;
use controller::{Controller, ControllerError, OperationError, RemoteError};
use model::query::ColumnResult;
use model::table::{InsertInto, RowDraft};
use model::testing::arb_row_draft;
use test_utils::proptest::prelude::*;
use test_utils::{ReceivedCall, TestHarness, init_tracing, test_prop};

async fn with_rows(harness: &TestHarness, rows: &[[&str; 2]]) -> Controller {
    let mut controller = harness.logged_in().await;
    controller.create_table("t1", ["a", "b"]).await.unwrap();
    controller.select_table("t1").await.unwrap();
    for [a, b] in rows {
        controller.set_draft_value("a", *a).await.unwrap();
        controller.set_draft_value("b", *b).await.unwrap();
        controller.insert_row().await.unwrap();
    }
    controller
}

#[tokio::test]
async fn test_draft_requires_selection() {
    let harness = TestHarness::new();
    let mut controller = harness.logged_in().await;

    assert_eq!(
        controller.set_draft_value("a", "1").await,
        Err(ControllerError::Draft(DraftError::NoTableSelected))
    );
}

#[tokio::test]
async fn test_draft_rejects_unknown_column() {
    let harness = TestHarness::new();
    let mut controller = with_rows(&harness, &[]).await;

    assert_eq!(
        controller.set_draft_value("zz", "1").await,
        Err(ControllerError::Draft(DraftError::UnknownColumn {
            table: "t1".into(),
            column: "zz".into(),
        }))
    );
    assert!(controller.catalog().tables.draft().is_empty());
}

#[tokio::test]
async fn test_insert_pads_missing_values_and_reselects() -> anyhow::Result<()> {
    init_tracing();
    let harness = TestHarness::new();
    let mut controller = with_rows(&harness, &[]).await;
    controller.set_draft_value("b", "2").await?;

    controller.insert_row().await?;

    let received = harness.service.received();
    assert_eq!(
        received[received.len() - 2..],
        [
            ReceivedCall::InsertInto(InsertInto {
                table: "t1".into(),
                values: vec!["".into(), "2".into()],
            }),
            ReceivedCall::GetTableDetails(model::table::GetTableDetails::new("t1")),
        ]
    );
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.selected.map(|d| d.row_count), Some(1));
    assert!(snapshot.draft.is_empty());
    assert!(!snapshot.busy);
    Ok(())
}

#[tokio::test]
async fn test_failed_insert_keeps_draft() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    let mut controller = with_rows(&harness, &[]).await;
    controller.set_draft_value("a", "1").await?;
    harness
        .service
        .fail_next(RemoteError::Rejected("Expected 2 values, got 1".into()));

    let result = controller.insert_row().await;

    assert!(matches!(
        result,
        Err(ControllerError::Failed(OperationError::InsertRow(_)))
    ));
    assert_eq!(controller.catalog().tables.draft().get("a"), "1");
    assert_eq!(
        controller.notification().map(|n| n.message),
        Some("Failed to insert row: Expected 2 values, got 1".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_row_intents_require_selection() {
    let harness = TestHarness::new();
    let mut controller = harness.logged_in().await;
    let calls = harness.service.received().len();

    assert_eq!(controller.insert_row().await, Err(ControllerError::NoTableSelected));
    assert_eq!(
        controller.query_column("a").await,
        Err(ControllerError::NoTableSelected)
    );
    assert_eq!(controller.query_all().await, Err(ControllerError::NoTableSelected));
    assert_eq!(harness.service.received().len(), calls);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_column_query_returns_values_in_row_order() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    let mut controller = with_rows(&harness, &[["1", "x"], ["2", "y"]]).await;

    controller.query_column("b").await?;

    assert_eq!(
        controller.catalog().results.column(),
        Some(&ColumnResult {
            column: "b".into(),
            values: vec!["x".into(), "y".into()],
        })
    );
    assert!(controller.catalog().results.table().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_query_modes_are_exclusive() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    let mut controller = with_rows(&harness, &[["1", "2"]]).await;

    controller.query_column("a").await?;
    controller.query_all().await?;
    let snapshot = controller.snapshot();
    assert!(snapshot.column_result.is_none());
    assert_eq!(snapshot.table_result, vec![vec!["1".to_string(), "2".to_string()]]);

    controller.query_column("a").await?;
    let snapshot = controller.snapshot();
    assert!(snapshot.table_result.is_empty());
    assert_eq!(snapshot.column_result.map(|r| r.values), Some(vec!["1".to_string()]));
    Ok(())
}

#[tokio::test]
async fn test_failed_query_still_clears_other_mode() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    let mut controller = with_rows(&harness, &[["1", "2"]]).await;
    controller.query_column("a").await?;

    harness
        .service
        .fail_next(RemoteError::Transport("timed out".into()));
    let result = controller.query_all().await;

    assert_eq!(
        result,
        Err(ControllerError::Failed(OperationError::QueryAll(
            RemoteError::Transport("timed out".into())
        )))
    );
    assert!(controller.catalog().results.is_empty());
    assert_eq!(
        controller.notification().map(|n| n.message),
        Some("Failed to query all data: transport error: timed out".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_unknown_column_query_fails_remotely() {
    let harness = TestHarness::new();
    let mut controller = with_rows(&harness, &[["1", "2"]]).await;

    let result = controller.query_column("zz").await;

    assert_eq!(
        result,
        Err(ControllerError::Failed(OperationError::QueryColumn(
            RemoteError::Rejected("Column 'zz' not found".into())
        )))
    );
    assert_eq!(
        controller.notification().map(|n| n.message),
        Some("Failed to query data: Column 'zz' not found".to_string())
    );
}

/// Create, select, fill, insert, query both ways, drop.
#[tokio::test]
async fn test_full_table_lifecycle() -> anyhow::Result<()> {
    init_tracing();
    let harness = TestHarness::new();
    let mut controller = harness.logged_in().await;

    controller.create_table("t1", ["a", "b"]).await?;
    assert_eq!(controller.snapshot().tables, vec!["t1".to_string()]);

    controller.select_table("t1").await?;
    controller.set_draft_value("a", "1").await?;
    controller.set_draft_value("b", "2").await?;
    controller.insert_row().await?;
    assert_eq!(controller.snapshot().selected.map(|d| d.row_count), Some(1));

    controller.query_column("a").await?;
    assert_eq!(
        controller.snapshot().column_result.map(|r| r.values),
        Some(vec!["1".to_string()])
    );

    controller.query_all().await?;
    assert_eq!(
        controller.snapshot().table_result,
        vec![vec!["1".to_string(), "2".to_string()]]
    );

    controller.drop_table("t1").await?;
    let snapshot = controller.snapshot();
    assert!(snapshot.tables.is_empty());
    assert!(snapshot.selected.is_none());
    assert!(snapshot.notification.is_none());
    assert!(!snapshot.busy);
    Ok(())
}

const DRAFT_COLUMNS: [&str; 3] = ["a", "b", "c"];

async fn prop_insert_sends_draft_in_column_order(draft: RowDraft) {
    let harness = TestHarness::new();
    let mut controller = harness.logged_in().await;
    controller.create_table("t1", DRAFT_COLUMNS).await.unwrap();
    controller.select_table("t1").await.unwrap();

    // fill the columns back to front so entry order differs from schema order
    for column in DRAFT_COLUMNS.iter().rev() {
        let value = draft.get(column);
        if !value.is_empty() {
            controller.set_draft_value(*column, value).await.unwrap();
        }
    }
    controller.insert_row().await.unwrap();

    let expected = draft.values_for(&DRAFT_COLUMNS.map(String::from));
    assert!(harness.service.received().contains(&ReceivedCall::InsertInto(InsertInto {
        table: "t1".into(),
        values: expected.clone(),
    })));

    controller.query_all().await.unwrap();
    assert_eq!(controller.snapshot().table_result, vec![expected]);
    assert!(controller.catalog().tables.draft().is_empty());
}

proptest! {
    #[test]
    fn insert_sends_draft_in_column_order(
        draft in arb_row_draft(DRAFT_COLUMNS.map(String::from).to_vec())
    ) {
        test_prop(|| async move {
            prop_insert_sends_draft_in_column_order(draft).await;
        });
    }
}
