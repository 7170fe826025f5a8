use helpdesk_lib::bridge::{BackendRequest, MemoryBackend};
use helpdesk_lib::error::TableError;
use helpdesk_lib::model::Row;
use helpdesk_lib::table::{Column, DataState, Table, TableConfig, TableView};
use helpdesk_lib::Backend;
use serde_json::json;

fn ticket_table() -> Table {
    Table::new(
        vec![
            Column::new("id", "#"),
            Column::new("title", "Title").filterable(),
            Column::new("status", "Status"),
        ],
        TableConfig::default().with_title("Tickets").with_row_selection(),
    )
}

#[tokio::test]
async fn test_load_ready_rows() {
    let backend = MemoryBackend::new().with_resource(
        "tickets",
        json!([
            {"id": 1, "title": "VPN", "status": "open"},
            {"id": 2, "title": "Printer", "status": "closed"}
        ]),
    );
    let mut table = ticket_table();
    table.load(&backend, "tickets").await;

    assert!(matches!(table.data(), DataState::Ready(rows) if rows.len() == 2));
    let view = table.view();
    let page = view.as_page().unwrap();
    assert_eq!(page.total_rows, 2);
    assert_eq!(page.rows[1].cells[2].as_text(), "Printer");
}

#[tokio::test]
async fn test_load_failure_and_invalid_shape() {
    let backend = MemoryBackend::new().with_resource("stats", json!({"open": 3}));
    let mut table = ticket_table();

    table.load(&backend, "missing").await;
    assert!(matches!(table.view(), TableView::Failed(_)));

    table.load(&backend, "stats").await;
    assert!(matches!(table.view(), TableView::Invalid(_)));
    assert!(table.visible_rows().is_empty());
}

#[tokio::test]
async fn test_row_action_round_trip() {
    let backend = MemoryBackend::new().with_resource(
        "tickets",
        json!([{"id": 7, "title": "Screen", "status": "open"}]),
    );
    let mut table = ticket_table();
    table.load(&backend, "tickets").await;

    table.begin_row_action("7").unwrap();
    assert!(matches!(
        table.begin_row_action("7"),
        Err(TableError::ActionInProgress(id)) if id == "7"
    ));

    let updated = backend
        .send(BackendRequest::patch("tickets/7", json!({"status": "in_progress"})))
        .await
        .unwrap();
    table.finish_row_action("7");
    assert_eq!(updated["status"], "in_progress");

    table.load(&backend, "tickets").await;
    let rows = table.processed_rows();
    assert_eq!(rows[0].get_str("status"), Some("in_progress"));
    assert!(!table.is_processing("7"));
}

#[test]
fn test_selection_survives_reload_of_same_rows() {
    let rows = || {
        vec![
            Row::new().set("id", 1).set("title", "A"),
            Row::new().set("id", 2).set("title", "B"),
        ]
    };
    let mut table = ticket_table();
    table.set_rows(rows());
    table.toggle_row_selection("2");
    table.set_rows(rows());
    assert_eq!(table.selected_ids(), vec!["2"]);
    assert_eq!(table.selected_rows().len(), 1);
}
