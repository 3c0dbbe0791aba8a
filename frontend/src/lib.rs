use chrono::{Local, NaiveDate};
use sauron::{
    html::{attributes, attributes::*, *},
    prelude::*,
};
use shared::{CreateTaskRequest, Filter, Progress, Task, UpdateTaskRequest};
use uuid::Uuid;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Request, RequestInit, Response};

/// Collection endpoint of the backing task service.
const API_URL: &str = "/todos";

#[derive(Debug, Clone)]
pub enum Msg {
    // Load cycle
    Reload,
    TasksLoaded(Vec<Task>),

    // Add form
    SetNewTitle(String),
    SetNewDue(String),
    AddTask,

    // Per-row controls
    ToggleTask(Uuid, bool),
    EditTask(Uuid),
    SetEditTitle(String),
    SaveEdit(Uuid),
    DeleteTask(Uuid),

    // Filter bar
    SetFilter(Filter),

    // A network action failed; the view keeps showing the last good state.
    Failed(String),
}

/// The single owned state object. The rendered view is a pure function of
/// this model; there is no other client-side state.
#[derive(Debug, Clone, Default)]
pub struct Model {
    tasks: Vec<Task>,
    filter: Filter,
    new_title: String,
    new_due: String,
    editing: Option<Uuid>,
    edit_title: String,
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::Reload })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Reload => Cmd::new(async {
                match fetch_tasks().await {
                    Ok(tasks) => Msg::TasksLoaded(tasks),
                    Err(e) => Msg::Failed(e),
                }
            }),
            Msg::TasksLoaded(tasks) => {
                self.tasks = tasks;
                // A fresh load always drops transient edit state; a row that
                // was being edited comes back read-only.
                self.editing = None;
                self.edit_title.clear();
                Cmd::none()
            }
            Msg::SetNewTitle(title) => {
                self.new_title = title;
                Cmd::none()
            }
            Msg::SetNewDue(raw) => {
                self.new_due = raw;
                Cmd::none()
            }
            Msg::AddTask => {
                let title = self.new_title.trim().to_string();
                if title.is_empty() {
                    // Blank titles are a silent no-op: no request, no reload.
                    return Cmd::none();
                }
                let due_date = parse_due(&self.new_due);
                self.new_title.clear();
                self.new_due.clear();
                Cmd::new(async move {
                    match create_task(title, due_date).await {
                        Ok(()) => Msg::Reload,
                        Err(e) => Msg::Failed(e),
                    }
                })
            }
            Msg::ToggleTask(id, completed) => {
                match toggle_payload(&self.tasks, id, completed) {
                    Some(payload) => push_update(id, payload),
                    None => Cmd::none(),
                }
            }
            Msg::EditTask(id) => {
                if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
                    self.editing = Some(id);
                    self.edit_title = task.title.clone();
                }
                Cmd::none()
            }
            Msg::SetEditTitle(title) => {
                self.edit_title = title;
                Cmd::none()
            }
            Msg::SaveEdit(id) => {
                if self.editing != Some(id) {
                    return Cmd::none();
                }
                self.editing = None;
                match save_payload(&self.tasks, id, &self.edit_title) {
                    Some(payload) => push_update(id, payload),
                    None => Cmd::none(),
                }
            }
            Msg::DeleteTask(id) => Cmd::new(async move {
                match delete_task(id).await {
                    Ok(()) => Msg::Reload,
                    Err(e) => Msg::Failed(e),
                }
            }),
            Msg::SetFilter(filter) => {
                self.filter = filter;
                Cmd::new(async { Msg::Reload })
            }
            Msg::Failed(error) => {
                console::error_1(&error.into());
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        let progress = Progress::of(&self.tasks);
        div(
            [class("max-w-xl mx-auto px-4 py-8 space-y-6")],
            [
                h1([class("text-2xl font-bold text-gray-800")], [text("My Tasks")]),
                self.view_add_form(),
                self.view_filter_bar(),
                self.view_progress(&progress),
                self.view_task_list(),
            ],
        )
    }
}

impl Model {
    fn view_add_form(&self) -> Node<Msg> {
        div(
            [class("flex items-center gap-2")],
            [
                input(
                    [
                        r#type("text"),
                        placeholder("What needs doing?"),
                        value(&self.new_title),
                        on_input(|event| Msg::SetNewTitle(event.value())),
                        class("flex-grow px-3 py-2 border border-gray-300 rounded focus:outline-none focus:ring-2 focus:ring-blue-500"),
                    ],
                    [],
                ),
                input(
                    [
                        r#type("date"),
                        value(&self.new_due),
                        on_input(|event| Msg::SetNewDue(event.value())),
                        class("px-3 py-2 border border-gray-300 rounded text-gray-600"),
                    ],
                    [],
                ),
                button(
                    [
                        on_click(|_| Msg::AddTask),
                        class("bg-blue-500 hover:bg-blue-600 text-white font-medium px-4 py-2 rounded"),
                    ],
                    [text("Add")],
                ),
            ],
        )
    }

    fn view_filter_bar(&self) -> Node<Msg> {
        div(
            [class("flex gap-2")],
            Filter::ALL
                .iter()
                .map(|&filter| {
                    button(
                        [
                            on_click(move |_| Msg::SetFilter(filter)),
                            class(&filter_button_class(filter, self.filter)),
                        ],
                        [text(filter.label())],
                    )
                })
                .collect::<Vec<_>>(),
        )
    }

    fn view_progress(&self, progress: &Progress) -> Node<Msg> {
        div(
            [class("space-y-1")],
            [
                p([class("text-sm text-gray-600")], [text(&progress.summary())]),
                div(
                    [class("w-full bg-gray-200 rounded-full h-2")],
                    [div(
                        [
                            class("bg-blue-500 h-2 rounded-full transition-all duration-300 ease-out"),
                            attributes::styles([("width", progress_bar_width(progress))]),
                        ],
                        [],
                    )],
                ),
            ],
        )
    }

    fn view_task_list(&self) -> Node<Msg> {
        let visible: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect();

        if visible.is_empty() {
            return div(
                [class("text-center py-10 text-gray-400 italic")],
                [text("No tasks to show")],
            );
        }

        let today = Local::now().date_naive();
        ul(
            [class("space-y-2")],
            visible
                .iter()
                .map(|task| self.view_task(task, today))
                .collect::<Vec<_>>(),
        )
    }

    fn view_task(&self, task: &Task, today: NaiveDate) -> Node<Msg> {
        let is_editing = self.editing == Some(task.id);

        li(
            [key(task.id.to_string()), class(&row_class(task.completed))],
            [
                div(
                    [class("flex items-center gap-2 flex-grow")],
                    [
                        input(
                            [
                                r#type("checkbox"),
                                checked(task.completed),
                                on_click({
                                    let id = task.id;
                                    let next = !task.completed;
                                    move |_| Msg::ToggleTask(id, next)
                                }),
                            ],
                            [],
                        ),
                        if is_editing {
                            input(
                                [
                                    r#type("text"),
                                    value(&self.edit_title),
                                    on_input(|event| Msg::SetEditTitle(event.value())),
                                    class("flex-grow bg-white border border-blue-300 rounded px-1 outline-none"),
                                ],
                                [],
                            )
                        } else {
                            input(
                                [
                                    r#type("text"),
                                    value(&task.title),
                                    disabled(true),
                                    class(&title_class(task.completed)),
                                ],
                                [],
                            )
                        },
                        match task.due_date {
                            Some(due) => p(
                                [class(&due_class(task.is_overdue(today)))],
                                [text(&format!("Due: {}", due.format("%Y-%m-%d")))],
                            ),
                            None => span([], []),
                        },
                    ],
                ),
                div(
                    [class("flex items-center gap-2")],
                    [
                        if is_editing {
                            button(
                                [
                                    on_click({
                                        let id = task.id;
                                        move |_| Msg::SaveEdit(id)
                                    }),
                                    class("hover:text-green-600"),
                                ],
                                [text("\u{1f4be}")],
                            )
                        } else {
                            button(
                                [
                                    on_click({
                                        let id = task.id;
                                        move |_| Msg::EditTask(id)
                                    }),
                                    class("hover:text-blue-600"),
                                ],
                                [text("\u{270f}\u{fe0f}")],
                            )
                        },
                        button(
                            [
                                on_click({
                                    let id = task.id;
                                    move |_| Msg::DeleteTask(id)
                                }),
                                class("text-red-500 hover:text-red-700"),
                            ],
                            [text("\u{1f5d1}")],
                        ),
                    ],
                ),
            ],
        )
    }
}

fn push_update(id: Uuid, payload: UpdateTaskRequest) -> Cmd<Msg> {
    Cmd::new(async move {
        match update_task(id, payload).await {
            Ok(()) => Msg::Reload,
            Err(e) => Msg::Failed(e),
        }
    })
}

/// Payload for a checkbox toggle: only `completed` changes, the title and
/// due date are re-sent as they are.
fn toggle_payload(tasks: &[Task], id: Uuid, completed: bool) -> Option<UpdateTaskRequest> {
    tasks.iter().find(|t| t.id == id).map(|t| UpdateTaskRequest {
        title: t.title.clone(),
        completed,
        due_date: t.due_date,
    })
}

/// Payload for saving an edited title: the completion flag and due date
/// keep their current values.
fn save_payload(tasks: &[Task], id: Uuid, edited_title: &str) -> Option<UpdateTaskRequest> {
    tasks.iter().find(|t| t.id == id).map(|t| UpdateTaskRequest {
        title: edited_title.to_string(),
        completed: t.completed,
        due_date: t.due_date,
    })
}

fn parse_due(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn filter_button_class(filter: Filter, active: Filter) -> String {
    format!(
        "px-3 py-1 rounded text-sm font-medium {}",
        if filter == active {
            "bg-blue-500 text-white"
        } else {
            "bg-gray-300 text-gray-800"
        }
    )
}

fn progress_bar_width(progress: &Progress) -> String {
    format!("{}%", progress.percent())
}

fn row_class(completed: bool) -> String {
    format!(
        "flex justify-between items-center px-3 py-2 rounded {}",
        if completed { "bg-green-100" } else { "bg-gray-200" }
    )
}

fn title_class(completed: bool) -> String {
    format!(
        "flex-grow bg-transparent outline-none {}",
        if completed {
            "line-through text-gray-500"
        } else {
            "text-gray-800"
        }
    )
}

fn due_class(overdue: bool) -> String {
    format!(
        "text-sm {}",
        if overdue { "text-red-500" } else { "text-gray-500" }
    )
}

async fn fetch_tasks() -> Result<Vec<Task>, String> {
    let promise = web_sys::window()
        .ok_or("No window")?
        .fetch_with_str(API_URL);

    let response: Response = JsFuture::from(promise)
        .await
        .map_err(|_| "Failed to fetch tasks")?
        .into();

    let text_promise = response.text().map_err(|_| "Failed to read response")?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|_| "Failed to get text")?
        .as_string()
        .ok_or("Failed to convert to string")?;

    serde_json::from_str(&text).map_err(|e| format!("Failed to parse JSON: {}", e))
}

async fn create_task(title: String, due_date: Option<NaiveDate>) -> Result<(), String> {
    let payload = CreateTaskRequest { title, due_date };
    let body = serde_json::to_string(&payload).map_err(|_| "Failed to serialize request")?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&wasm_bindgen::JsValue::from_str(&body));

    let request =
        Request::new_with_str_and_init(API_URL, &opts).map_err(|_| "Failed to create request")?;

    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|_| "Failed to set header")?;

    send(request).await
}

async fn update_task(id: Uuid, payload: UpdateTaskRequest) -> Result<(), String> {
    let body = serde_json::to_string(&payload).map_err(|_| "Failed to serialize request")?;

    let opts = RequestInit::new();
    opts.set_method("PUT");
    opts.set_body(&wasm_bindgen::JsValue::from_str(&body));

    let url = format!("{}/{}", API_URL, id);
    let request =
        Request::new_with_str_and_init(&url, &opts).map_err(|_| "Failed to create request")?;

    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|_| "Failed to set header")?;

    send(request).await
}

async fn delete_task(id: Uuid) -> Result<(), String> {
    let opts = RequestInit::new();
    opts.set_method("DELETE");

    let url = format!("{}/{}", API_URL, id);
    let request =
        Request::new_with_str_and_init(&url, &opts).map_err(|_| "Failed to create request")?;

    send(request).await
}

// Mutation responses are intentionally ignored; the reload that follows
// every mutation fetches the authoritative state.
async fn send(request: Request) -> Result<(), String> {
    let promise = web_sys::window()
        .ok_or("No window")?
        .fetch_with_request(&request);

    JsFuture::from(promise)
        .await
        .map_err(|_| "Failed to send request")?;

    Ok(())
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::default());
}
