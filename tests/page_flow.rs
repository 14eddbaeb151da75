//! End-to-end page flows: `TaskPage` driving `HttpTasksApi` against a mock
//! `/tasks` backend.

use std::sync::Mutex;

use serde_json::json;
use task_manager::{HttpTasksApi, PageUi, TaskPage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn task_json(id: &str, title: &str, description: &str, completed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": description,
        "completed": completed,
    })
}

#[derive(Default)]
struct RecordingUi {
    alerts: Mutex<Vec<String>>,
}

impl PageUi for RecordingUi {
    fn confirm(&self, _message: &str) -> bool {
        true
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

fn make_page(server: &MockServer) -> TaskPage<HttpTasksApi, RecordingUi> {
    TaskPage::new(
        HttpTasksApi::new(server.uri()).unwrap(),
        RecordingUi::default(),
    )
}

#[tokio::test]
async fn load_failure_surfaces_error_and_manual_retry_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([task_json("1", "Old", "Desc", false)])),
        )
        .mount(&server)
        .await;

    let page = make_page(&server);
    assert!(!page.load().await);
    assert!(page.load_error().is_some());
    assert!(page.tasks().is_empty());

    assert!(page.load().await);
    assert_eq!(page.load_error(), None);
    assert_eq!(page.tasks().len(), 1);
}

#[tokio::test]
async fn create_then_update_round_trip_preserves_the_assigned_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(task_json("42", "First title", "First description", false)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(task_json("42", "Second title", "Second description", false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = make_page(&server);

    page.set_title("First title");
    page.set_description("First description");
    assert!(page.submit().await);
    let tasks = page.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "42");

    assert!(page.begin_edit("42"));
    page.set_title("Second title");
    page.set_description("Second description");
    assert!(page.submit().await);

    let tasks = page.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "42");
    assert_eq!(tasks[0].title, "Second title");
    assert_eq!(tasks[0].description, "Second description");
    assert_eq!(page.editing_id(), None);
}

#[tokio::test]
async fn deleted_task_does_not_reappear_after_reload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([task_json("1", "Old", "Desc", false)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let page = make_page(&server);
    assert!(page.load().await);
    assert_eq!(page.tasks().len(), 1);

    assert!(page.delete_task("1").await);
    assert!(page.tasks().is_empty());

    // The deletion is reflected by the backend after a fresh load too.
    assert!(page.load().await);
    assert!(page.tasks().is_empty());
}

#[tokio::test]
async fn toggle_flips_completed_without_touching_other_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([task_json("1", "Old", "Desc", false)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/1/toggle"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_json("1", "Old", "Desc", true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = make_page(&server);
    assert!(page.load().await);
    assert!(page.toggle_task("1").await);

    let tasks = page.tasks();
    assert!(tasks[0].completed);
    assert_eq!(tasks[0].title, "Old");
    assert_eq!(tasks[0].description, "Desc");
}

#[tokio::test]
async fn select_all_then_bulk_delete_empties_list_and_selection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json("1", "Old", "Desc", false),
            task_json("2", "Other", "More", true),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let page = make_page(&server);
    assert!(page.load().await);
    page.select_all();
    assert_eq!(page.selected().len(), 2);

    assert!(page.delete_selected().await);
    assert!(page.tasks().is_empty());
    assert!(page.selected().is_empty());
}

#[tokio::test]
async fn create_failure_is_scoped_to_the_click_and_retry_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(task_json("7", "Valid Title", "Valid Description", false)),
        )
        .mount(&server)
        .await;

    let page = make_page(&server);
    page.set_title("Valid Title");
    page.set_description("Valid Description");

    assert!(!page.submit().await);
    assert!(page.error().is_some());
    assert_eq!(page.title(), "Valid Title");

    // The failure was scoped to the click; the same draft goes through once
    // the backend recovers.
    assert!(page.submit().await);
    assert_eq!(page.error(), None);
    assert_eq!(page.tasks().len(), 1);
}
