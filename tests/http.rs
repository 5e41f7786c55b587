use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode, header::LOCATION, redirect::Policy};
use serde::Deserialize;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DayView {
    date: String,
    has_record: bool,
    total_calories: u64,
    goal: u32,
    goal_percentage: f64,
    selections: Vec<SelectionEntry>,
}

#[derive(Debug, Deserialize)]
struct SelectionEntry {
    name: String,
    quantity: u32,
    total_calories: u64,
}

#[derive(Debug, Deserialize)]
struct FoodDefinition {
    name: String,
    calories: u32,
}

#[derive(Debug, Deserialize)]
struct CalendarDay {
    is_today: bool,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    ok: bool,
    message: Option<String>,
}

struct TestServer {
    base_url: String,
    remember_path: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.remember_path);
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_remember_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "calorie_counter_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path
}

fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("build client")
}

async fn wait_until_ready(base_url: &str) {
    let client = client();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/login")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let remember_path = unique_remember_path();
    let child = Command::new(env!("CARGO_BIN_EXE_calorie_counter"))
        .env("PORT", port.to_string())
        .env("APP_REMEMBER_PATH", &remember_path)
        .env("APP_LOGIN_DELAY_MS", "0")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        remember_path,
        child,
    }
}

async fn api_login(base_url: &str, username: &str, password: &str, remember: bool) -> reqwest::Response {
    client()
        .post(format!("{base_url}/api/login"))
        .json(&serde_json::json!({
            "username": username,
            "password": password,
            "remember": remember,
        }))
        .send()
        .await
        .unwrap()
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    // The shared server lives in a static and is never dropped.
    #[cfg(unix)]
    cleanup::register(server.child.id());
    let response = api_login(&server.base_url, "cc", "password", false).await;
    assert!(response.status().is_success());
    *guard = Some(Arc::clone(&server));
    server
}

async fn select(server: &TestServer, date: &str, name: &str, quantity: i64) -> reqwest::Response {
    client()
        .post(format!("{}/api/select", server.base_url))
        .json(&serde_json::json!({ "date": date, "name": name, "quantity": quantity }))
        .send()
        .await
        .unwrap()
}

async fn day(server: &TestServer, date: &str) -> DayView {
    client()
        .get(format!("{}/api/day?date={date}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn http_dashboard_redirects_until_logged_in() {
    let server = spawn_server().await;
    let client = client();

    for path in ["/calorie-counter", "/", "/no-such-page"] {
        let response = client
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_redirection(), "{path}");
        assert_eq!(location(&response), "/login", "{path}");
    }

    let response = client
        .get(format!("{}/api/day", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    for path in ["/login", "/signup", "/forgot-password"] {
        let response = client
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn http_login_failures_carry_messages() {
    let server = spawn_server().await;

    let response = api_login(&server.base_url, "cc", "wrong", false).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: LoginResponse = response.json().await.unwrap();
    assert!(!body.ok);
    assert_eq!(body.message.as_deref(), Some("Invalid username or password."));

    let response = api_login(&server.base_url, "", "", false).await;
    let body: LoginResponse = response.json().await.unwrap();
    assert_eq!(
        body.message.as_deref(),
        Some("Please enter both username and password.")
    );

    let page = client()
        .post(format!("{}/login", server.base_url))
        .form(&[("username", "cc"), ("password", "nope")])
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = page.text().await.unwrap();
    assert!(html.contains("Invalid username or password."));

    let dashboard = client()
        .get(format!("{}/calorie-counter", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&dashboard), "/login");
}

#[tokio::test]
async fn http_form_login_opens_dashboard() {
    let server = spawn_server().await;
    let client = client();

    let response = client
        .post(format!("{}/login", server.base_url))
        .form(&[("username", "cc"), ("password", "password")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/calorie-counter");

    let page = client
        .get(format!("{}/calorie-counter", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = page.text().await.unwrap();
    assert!(html.contains("Food List"));
    assert!(html.contains("Rice (1 cup)"));

    let response = client
        .post(format!("{}/logout", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/login");
    let page = client
        .get(format!("{}/calorie-counter", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&page), "/login");
}

#[tokio::test]
async fn http_remember_me_prefills_login() {
    let server = spawn_server().await;

    let response = api_login(&server.base_url, "cc", "password", true).await;
    assert!(response.status().is_success());
    let saved = std::fs::read_to_string(&server.remember_path).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["username"], "cc");

    let html = client()
        .get(format!("{}/login", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"value="cc""#));

    let response = api_login(&server.base_url, "cc", "password", false).await;
    assert!(response.status().is_success());
    assert!(!server.remember_path.exists());
}

#[tokio::test]
async fn http_select_food_updates_total() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let date = "2031-05-01";

    let response = select(&server, date, "Rice (1 cup)", 2).await;
    assert!(response.status().is_success());
    let view: DayView = response.json().await.unwrap();
    assert_eq!(view.total_calories, 400);
    assert_eq!(view.selections.len(), 1);
    assert_eq!(view.selections[0].name, "Rice (1 cup)");
    assert_eq!(view.selections[0].quantity, 2);
    assert_eq!(view.selections[0].total_calories, 400);

    select(&server, date, "Rice (1 cup)", 0).await;
    let view = day(&server, date).await;
    assert_eq!(view.date, date);
    assert!(view.has_record);
    assert_eq!(view.total_calories, 0);
    assert!(view.selections.is_empty());

    let response = select(&server, date, "Pizza", 1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_goal_drives_progress() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = client();
    let date = "2031-05-02";

    let response = client
        .post(format!("{}/api/goal", server.base_url))
        .json(&serde_json::json!({ "date": date, "goal": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!day(&server, date).await.has_record);

    let response = client
        .post(format!("{}/api/goal", server.base_url))
        .json(&serde_json::json!({ "date": date, "goal": 1500 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    select(&server, date, "Egg", 10).await;
    let view = day(&server, date).await;
    assert_eq!(view.goal, 1500);
    assert_eq!(view.total_calories, 680);
    assert!((view.goal_percentage - 45.333).abs() < 0.01);

    let other = day(&server, "2031-05-03").await;
    assert!(!other.has_record);
    assert_eq!(other.goal, 2000);
    assert_eq!(other.total_calories, 0);
}

#[tokio::test]
async fn http_custom_food_validation() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = client();

    let foods: Vec<FoodDefinition> = client
        .get(format!("{}/api/foods", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let before = foods.len();

    let response = client
        .post(format!("{}/api/foods", server.base_url))
        .json(&serde_json::json!({ "name": "", "calories": 100 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/foods", server.base_url))
        .json(&serde_json::json!({ "name": "Upma", "calories": 190 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let foods: Vec<FoodDefinition> = client
        .get(format!("{}/api/foods", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(foods.len(), before + 1);
    let upma = foods.last().unwrap();
    assert_eq!(upma.name, "Upma");
    assert_eq!(upma.calories, 190);

    let view: DayView = select(&server, "2031-05-04", "Upma", 3)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view.total_calories, 570);
}

#[tokio::test]
async fn http_calendar_covers_two_weeks() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let days: Vec<CalendarDay> = client()
        .get(format!("{}/api/calendar", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(days.len(), 14);
    assert!(days[7].is_today);
}

#[derive(Debug, Deserialize)]
struct DashboardView {
    day: DayView,
    catalog: Vec<FoodDefinition>,
    calendar: Vec<CalendarDay>,
}

async fn post_form(server: &TestServer, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
    client()
        .post(format!("{}{path}", server.base_url))
        .form(form)
        .send()
        .await
        .unwrap()
}

async fn active_day(server: &TestServer) -> DayView {
    client()
        .get(format!("{}/api/day", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_dashboard_forms_edit_active_day() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = post_form(&server, "/calorie-counter/date", &[("date", "2031-07-01")]).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/calorie-counter");
    assert_eq!(active_day(&server).await.date, "2031-07-01");

    let response = post_form(
        &server,
        "/calorie-counter/select",
        &[("name", " Egg "), ("quantity", "3")],
    )
    .await;
    assert_eq!(location(&response), "/calorie-counter");
    let view = active_day(&server).await;
    assert_eq!(view.total_calories, 204);
    assert_eq!(view.selections[0].name, "Egg");

    post_form(
        &server,
        "/calorie-counter/select",
        &[("name", "Egg"), ("quantity", "lots")],
    )
    .await;
    let view = active_day(&server).await;
    assert!(view.has_record);
    assert!(view.selections.is_empty());
    assert_eq!(view.total_calories, 0);
}

#[tokio::test]
async fn http_goal_form_keeps_previous_goal_on_bad_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    post_form(&server, "/calorie-counter/date", &[("date", "2031-07-02")]).await;
    let response = post_form(&server, "/calorie-counter/goal", &[("goal", "1700")]).await;
    assert_eq!(location(&response), "/calorie-counter");
    assert_eq!(active_day(&server).await.goal, 1700);

    for bad in ["abc", "0", "-5"] {
        let response = post_form(&server, "/calorie-counter/goal", &[("goal", bad)]).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{bad}");
        let html = response.text().await.unwrap();
        assert!(html.contains("calorie goal must be a positive whole number"), "{bad}");
        assert_eq!(active_day(&server).await.goal, 1700, "{bad}");
    }
}

#[tokio::test]
async fn http_food_form_stays_open_on_bad_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = post_form(
        &server,
        "/calorie-counter/foods",
        &[("name", ""), ("calories", "50")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = response.text().await.unwrap();
    assert!(html.contains("food name must not be empty"));
    assert!(html.contains(r#"action="/calorie-counter/foods">"#));
    assert!(html.contains(r#"value="50""#));

    let response = post_form(
        &server,
        "/calorie-counter/foods",
        &[("name", "Pongal"), ("calories", "none")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = response.text().await.unwrap();
    assert!(html.contains("calories must be a positive whole number"));
    assert!(html.contains(r#"value="Pongal""#));

    let response = post_form(
        &server,
        "/calorie-counter/foods",
        &[("name", "Pongal"), ("calories", "230")],
    )
    .await;
    assert_eq!(location(&response), "/calorie-counter");
    let foods: Vec<FoodDefinition> = client()
        .get(format!("{}/api/foods", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(foods.iter().filter(|food| food.name == "Pongal").count(), 1);
}

#[tokio::test]
async fn http_switching_dates_does_not_record_them() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = client();

    let view: DayView = client
        .post(format!("{}/api/active-date", server.base_url))
        .json(&serde_json::json!({ "date": "2031-07-03" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.date, "2031-07-03");
    assert!(!view.has_record);
    assert_eq!(view.goal, 2000);
    assert!(!day(&server, "2031-07-03").await.has_record);

    let page = client
        .get(format!("{}/calorie-counter?date=2031-07-04", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("Fri Jul 04 2031"));

    let dashboard: DashboardView = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dashboard.day.date, "2031-07-04");
    assert!(!dashboard.day.has_record);
    assert!(dashboard.catalog.len() >= 5);
    assert_eq!(dashboard.calendar.len(), 14);
    assert!(!day(&server, "2031-07-04").await.has_record);
}
