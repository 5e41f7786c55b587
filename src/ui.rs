use crate::models::{CalendarDay, DashboardView, FoodDefinition, SelectionEntry};
use crate::palette;

// Circumference of the progress rings, rounded the way the stroke-dasharray expects.
const DAY_RING: f64 = 113.0;
const GOAL_RING: f64 = 534.0;

/// Transient state of the dashboard forms after a rejected submission.
#[derive(Debug, Default)]
pub struct DashboardNotice {
    pub adding_food: bool,
    pub goal_error: Option<String>,
    pub food_error: Option<String>,
    pub draft_name: String,
    pub draft_calories: String,
}

pub fn render_login(username: &str, remember: bool, error: Option<&str>) -> String {
    let error = error
        .map(|message| format!(r#"<p class="error" role="alert">{}</p>"#, escape_html(message)))
        .unwrap_or_default();
    page(
        "Login",
        &LOGIN_HTML
            .replace("{{REMEMBER}}", if remember { "checked" } else { "" })
            .replace("{{ERROR}}", &error)
            .replace("{{USERNAME}}", &escape_html(username)),
    )
}

pub fn render_signup() -> String {
    page("Sign up", SIGNUP_HTML)
}

pub fn render_forgot_password() -> String {
    page("Reset password", FORGOT_PASSWORD_HTML)
}

pub fn render_dashboard(view: &DashboardView, notice: &DashboardNotice) -> String {
    let day = &view.day;
    let offset = GOAL_RING - GOAL_RING * day.goal_percentage / 100.0;

    // User text reaches the fragments through escape_html, which encodes
    // braces, so no fragment can contain a placeholder.
    let body = DASHBOARD_HTML
        .replace("{{DATE}}", &day.date.format("%a %b %d %Y").to_string())
        .replace("{{RING_COLOR}}", &day.color)
        .replace("{{RING_OFFSET}}", &format!("{offset:.1}"))
        .replace("{{PERCENT}}", &format!("{:.0}", day.goal_percentage))
        .replace("{{GOAL}}", &day.goal.to_string())
        .replace("{{TOTAL}}", &day.total_calories.to_string())
        .replace("{{GOAL_ERROR}}", &render_error(notice.goal_error.as_deref()))
        .replace("{{CALENDAR}}", &render_calendar(&view.calendar))
        .replace("{{ADD_FOOD}}", &render_add_food(notice))
        .replace("{{SELECTED}}", &render_selected(&day.selections))
        .replace(
            "{{FOODS}}",
            &render_food_list(&view.catalog, &day.selections),
        );

    page("Calorie Counter", &body)
}

fn render_calendar(days: &[CalendarDay]) -> String {
    let mut html = String::new();
    for day in days {
        let stroke = if day.percentage > 0.0 {
            day.color.as_str()
        } else {
            "#ddd"
        };
        let mut classes = vec!["day"];
        if day.is_active {
            classes.push("active");
        }
        if day.is_today {
            classes.push("today");
        }
        if !day.has_record {
            classes.push("empty");
        }
        html.push_str(&format!(
            r##"<a class="{classes}" href="/calorie-counter?date={date}">
          <span class="day-label">{label}</span>
          <span class="day-ring">
            <svg width="40" height="40"><circle cx="20" cy="20" r="18" fill="none" stroke="{stroke}" stroke-width="4" stroke-dasharray="{ring}" stroke-dashoffset="{offset:.1}" transform="rotate(-90 20 20)" /></svg>
            <span>{badge}</span>
          </span>
        </a>
        "##,
            classes = classes.join(" "),
            date = day.date,
            label = escape_html(&day.label),
            ring = DAY_RING,
            offset = DAY_RING - DAY_RING * day.percentage / 100.0,
            badge = escape_html(&day.badge),
        ));
    }
    html
}

fn render_food_list(catalog: &[FoodDefinition], selections: &[SelectionEntry]) -> String {
    let mut html = String::new();
    for food in catalog {
        let quantity = selections
            .iter()
            .find(|entry| entry.name == food.name)
            .map_or(0, |entry| entry.quantity);
        let name = escape_html(&food.name);
        html.push_str(&format!(
            r#"<li class="food" style="border-color: {color}">
          <span class="food-name">{name}</span>
          <span class="food-kcal">{calories} kcal</span>
          <form method="post" action="/calorie-counter/select">
            <input type="hidden" name="name" value="{name}" />
            <input type="number" name="quantity" min="0" value="{quantity}" aria-label="Quantity of {name}" />
            <button type="submit">Set</button>
          </form>
        </li>
        "#,
            color = escape_html(&food.color_tag),
            calories = food.calories,
        ));
    }
    html
}

fn render_add_food(notice: &DashboardNotice) -> String {
    if !notice.adding_food {
        return r#"<a class="toggle" href="/calorie-counter#add-food" onclick="document.getElementById('add-food').hidden=false;return false;">+ Add custom food</a>
        <form id="add-food" class="add-food" method="post" action="/calorie-counter/foods" hidden>
          <input type="text" name="name" placeholder="Food name" />
          <input type="number" name="calories" min="1" placeholder="Calories" />
          <button type="submit">Add food</button>
        </form>"#
            .to_string();
    }
    format!(
        r#"<form id="add-food" class="add-food" method="post" action="/calorie-counter/foods">
          <input type="text" name="name" placeholder="Food name" value="{name}" />
          <input type="number" name="calories" min="1" placeholder="Calories" value="{calories}" />
          <button type="submit">Add food</button>
          {error}
        </form>"#,
        name = escape_html(&notice.draft_name),
        calories = escape_html(&notice.draft_calories),
        error = render_error(notice.food_error.as_deref()),
    )
}

fn render_selected(selections: &[SelectionEntry]) -> String {
    if selections.is_empty() {
        return r#"<p class="hint">No foods selected yet. Start by adding quantities to the food items.</p>"#
            .to_string();
    }
    let mut html = String::from("<ul class=\"selected\">");
    for entry in selections {
        html.push_str(&format!(
            r#"<li style="border-color: {color}"><span>{name} &times; {quantity}</span><span>{total} kcal</span></li>"#,
            color = escape_html(&entry.color_tag),
            name = escape_html(&entry.name),
            quantity = entry.quantity,
            total = entry.total_calories,
        ));
    }
    html.push_str("</ul>");
    html
}

fn render_error(message: Option<&str>) -> String {
    message
        .map(|message| format!(r#"<p class="error" role="alert">{}</p>"#, escape_html(message)))
        .unwrap_or_default()
}

fn page(title: &str, body: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", title)
        .replace("{{STYLE}}", &style())
        .replace("{{BODY}}", body)
}

fn style() -> String {
    STYLE_CSS
        .replace("{{PRIMARY}}", palette::PRIMARY)
        .replace("{{SECONDARY}}", palette::SECONDARY)
        .replace("{{DARK}}", palette::DARK)
        .replace("{{LIGHT}}", palette::LIGHT)
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <header class="hero">
    <h3 class="brand">@myfitnesspal</h3>
    <h4>#1 nutrition tracking app</h4>
    <h1>Nutrition tracking for <span>real life</span></h1>
    <p>Make progress with the all-in-one food, exercise, and calorie tracker.</p>
  </header>
  {{BODY}}
</body>
</html>
"#;

const STYLE_CSS: &str = r#"
    @import url('https://fonts.googleapis.com/css2?family=Poppins:wght@400;600&display=swap');

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      padding: 20px;
      background: linear-gradient(135deg, {{LIGHT}} 0%, #e0f7fa 100%);
      color: {{DARK}};
      font-family: "Poppins", "Trebuchet MS", sans-serif;
    }

    .hero {
      text-align: center;
      margin-bottom: 24px;
    }

    .hero h1 span {
      color: {{PRIMARY}};
    }

    .card {
      background: white;
      border-radius: 15px;
      padding: 20px;
      box-shadow: 0 4px 20px rgba(0, 0, 0, 0.1);
      max-width: 1200px;
      margin: 0 auto 30px;
    }

    .login {
      max-width: 420px;
      display: grid;
      gap: 14px;
    }

    .login label {
      display: grid;
      gap: 6px;
    }

    input {
      padding: 10px 12px;
      border-radius: 10px;
      border: 2px solid #eee;
      font: inherit;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: {{SECONDARY}};
      color: white;
    }

    .calendar {
      display: flex;
      overflow-x: auto;
      gap: 10px;
      padding: 5px 0;
    }

    .day {
      display: flex;
      flex-direction: column;
      align-items: center;
      min-width: 60px;
      padding: 10px 5px;
      border-radius: 10px;
      border: 2px solid transparent;
      color: inherit;
      text-decoration: none;
    }

    .day.active {
      background: {{SECONDARY}}30;
      border-color: {{SECONDARY}};
    }

    .day.today .day-label {
      font-weight: 600;
      color: {{PRIMARY}};
    }

    .day.empty {
      opacity: 0.6;
    }

    .day-ring {
      position: relative;
      width: 40px;
      height: 40px;
      border-radius: 50%;
      background: #f5f5f5;
      display: flex;
      align-items: center;
      justify-content: center;
      font-size: 10px;
    }

    .day-ring svg {
      position: absolute;
    }

    .goal {
      display: flex;
      flex-direction: column;
      align-items: center;
      gap: 15px;
    }

    .goal-ring {
      position: relative;
      width: 200px;
      height: 200px;
      border-radius: 50%;
      background: #f5f5f5;
      display: flex;
      align-items: center;
      justify-content: center;
    }

    .goal-ring svg {
      position: absolute;
    }

    .goal-ring circle {
      transition: stroke-dashoffset 0.5s;
    }

    .columns {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 20px;
      max-width: 1200px;
      margin: 0 auto;
    }

    .foods, .selected {
      list-style: none;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .food, .selected li {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 10px;
      padding: 10px 14px;
      border-radius: 10px;
      border: 2px solid;
    }

    .food input[type="number"] {
      width: 70px;
    }

    .add-food {
      display: grid;
      gap: 10px;
      margin-top: 12px;
    }

    .total {
      margin-top: 16px;
      padding: 16px;
      border-radius: 10px;
      background: {{DARK}};
      color: gold;
      font-size: 1.6rem;
      font-weight: 600;
      text-align: center;
    }

    .error {
      color: {{PRIMARY}};
      margin: 0;
    }

    .hint {
      color: #777;
    }
"#;

const LOGIN_HTML: &str = r#"<main class="card login">
    <h1>Login to Your Account</h1>
    <form class="login" method="post" action="/login">
      <label>Username
        <input id="username" name="username" type="text" placeholder="Enter your username" value="{{USERNAME}}" aria-required="true" />
      </label>
      <label>Password
        <input id="password" name="password" type="password" placeholder="Enter your password" aria-required="true" />
      </label>
      <label class="remember"><span><input type="checkbox" name="remember" {{REMEMBER}} /> Remember me</span></label>
      {{ERROR}}
      <button type="submit">Login</button>
    </form>
    <p><a href="/forgot-password">Forgot password?</a></p>
    <p>Don't have an account? <a href="/signup">Sign up</a></p>
  </main>"#;

const SIGNUP_HTML: &str = r#"<main class="card login">
    <h1>Create an Account</h1>
    <p class="hint">Sign-ups are not open yet. Use the demo account to try the tracker.</p>
    <p><a href="/login">Back to login</a></p>
  </main>"#;

const FORGOT_PASSWORD_HTML: &str = r#"<main class="card login">
    <h1>Reset Your Password</h1>
    <p class="hint">Password resets are not available for the demo account.</p>
    <p><a href="/login">Back to login</a></p>
  </main>"#;

const DASHBOARD_HTML: &str = r#"<main>
    <section class="card">
      <h3>Your Progress</h3>
      <nav class="calendar">
        {{CALENDAR}}
      </nav>
    </section>
    <section class="card goal">
      <div class="date">{{DATE}}</div>
      <div class="goal-ring">
        <svg width="200" height="200"><circle cx="100" cy="100" r="85" fill="none" stroke="{{RING_COLOR}}" stroke-width="15" stroke-dasharray="534" stroke-dashoffset="{{RING_OFFSET}}" transform="rotate(-90 100 100)" /></svg>
        <div>
          <h2 id="percent" style="color: {{RING_COLOR}}">{{PERCENT}}%</h2>
          <p>of {{GOAL}} kcal</p>
        </div>
      </div>
      <form method="post" action="/calorie-counter/goal">
        <input type="number" name="goal" min="1" value="{{GOAL}}" aria-label="Daily calorie goal" />
        <button type="submit">Set goal</button>
      </form>
      {{GOAL_ERROR}}
    </section>
    <div class="columns">
      <section class="card">
        <h2>Food List</h2>
        <ul class="foods">
        {{FOODS}}
        </ul>
        {{ADD_FOOD}}
      </section>
      <section class="card">
        <h2>Selected Foods</h2>
        {{SELECTED}}
        <div class="total"><span id="total">{{TOTAL}}</span> kcal</div>
      </section>
    </div>
    <form method="post" action="/logout"><button type="submit">Log out</button></form>
  </main>"#;
