use crate::auth::{LoginError, attempt_login};
use crate::calendar::{build_calendar, build_dashboard};
use crate::errors::AppError;
use crate::ledger::{LedgerError, parse_whole_number};
use crate::models::{
    ActiveDateRequest, CalendarDay, DashboardView, DateForm, DateQuery, DayView, FoodDefinition,
    FoodForm, FoodRequest, GoalForm, GoalRequest, LoginForm, LoginRequest, LoginResponse,
    SelectForm, SelectRequest,
};
use crate::state::AppState;
use crate::storage::{forget_user, load_remembered, remember_user};
use crate::ui::{
    DashboardNotice, render_dashboard, render_forgot_password, render_login, render_signup,
};
use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{error, info, warn};

const LOGIN_PATH: &str = "/login";
const DASHBOARD_PATH: &str = "/calorie-counter";

pub async fn to_login() -> Redirect {
    Redirect::to(LOGIN_PATH)
}

pub async fn login_page(State(state): State<AppState>) -> Html<String> {
    let remembered = load_remembered(&state.remember_path).await;
    let username = remembered.as_ref().map_or("", |user| user.username.as_str());
    Html(render_login(username, remembered.is_some(), None))
}

pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let remember = form.remember.is_some();
    match perform_login(&state, &form.username, &form.password, remember).await {
        Ok(()) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(err) => Html(render_login(&form.username, remember, Some(&err.to_string())))
            .into_response(),
    }
}

pub async fn signup_page() -> Html<String> {
    Html(render_signup())
}

pub async fn forgot_password_page() -> Html<String> {
    Html(render_forgot_password())
}

pub async fn logout(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.sign_out();
    info!("logged out");
    Redirect::to(LOGIN_PATH)
}

pub async fn dashboard(State(state): State<AppState>, Query(query): Query<DateQuery>) -> Response {
    if !logged_in(&state).await {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    let mut ledger = state.ledger.lock().await;
    if let Some(date) = query.date {
        ledger.switch_active_date(date);
    }
    Html(render_dashboard(
        &build_dashboard(&ledger),
        &DashboardNotice::default(),
    ))
    .into_response()
}

pub async fn select_food_form(
    State(state): State<AppState>,
    Form(form): Form<SelectForm>,
) -> Result<Response, AppError> {
    if !logged_in(&state).await {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }
    let quantity = parse_whole_number(&form.quantity).unwrap_or(0);
    let mut ledger = state.ledger.lock().await;
    let date = ledger.active_date();
    ledger.select_food_by_name(date, form.name.trim(), quantity)?;
    Ok(Redirect::to(DASHBOARD_PATH).into_response())
}

pub async fn set_goal_form(State(state): State<AppState>, Form(form): Form<GoalForm>) -> Response {
    if !logged_in(&state).await {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    let mut ledger = state.ledger.lock().await;
    let date = ledger.active_date();
    let result = parse_whole_number(&form.goal)
        .ok_or(LedgerError::InvalidGoal)
        .and_then(|goal| ledger.set_goal(date, goal));

    match result {
        Ok(()) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(err) => {
            warn!(%date, input = %form.goal, "rejected calorie goal");
            let notice = DashboardNotice {
                goal_error: Some(err.to_string()),
                ..DashboardNotice::default()
            };
            (
                StatusCode::BAD_REQUEST,
                Html(render_dashboard(&build_dashboard(&ledger), &notice)),
            )
                .into_response()
        }
    }
}

pub async fn add_food_form(State(state): State<AppState>, Form(form): Form<FoodForm>) -> Response {
    if !logged_in(&state).await {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    let calories = parse_whole_number(&form.calories).unwrap_or(0);
    let mut ledger = state.ledger.lock().await;

    let result = ledger.add_food_definition(&form.name, calories).map(|_| ());

    match result {
        Ok(()) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(err) => {
            warn!(name = %form.name, input = %form.calories, "rejected new food: {err}");
            let notice = DashboardNotice {
                adding_food: true,
                food_error: Some(err.to_string()),
                draft_name: form.name,
                draft_calories: form.calories,
                ..DashboardNotice::default()
            };
            (
                StatusCode::BAD_REQUEST,
                Html(render_dashboard(&build_dashboard(&ledger), &notice)),
            )
                .into_response()
        }
    }
}

pub async fn switch_date_form(
    State(state): State<AppState>,
    Form(form): Form<DateForm>,
) -> Redirect {
    if logged_in(&state).await {
        state.ledger.lock().await.switch_active_date(form.date);
        Redirect::to(DASHBOARD_PATH)
    } else {
        Redirect::to(LOGIN_PATH)
    }
}

pub async fn api_login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    match perform_login(&state, &payload.username, &payload.password, payload.remember).await {
        Ok(()) => Json(LoginResponse {
            ok: true,
            message: None,
        })
        .into_response(),
        Err(err) => (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                ok: false,
                message: Some(err.to_string()),
            }),
        )
            .into_response(),
    }
}

pub async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DayView>, AppError> {
    require_login(&state).await?;
    let ledger = state.ledger.lock().await;
    let date = query.date.unwrap_or_else(|| ledger.active_date());
    Ok(Json(ledger.day_view(date)))
}

pub async fn select_food(
    State(state): State<AppState>,
    Json(payload): Json<SelectRequest>,
) -> Result<Json<DayView>, AppError> {
    require_login(&state).await?;
    let mut ledger = state.ledger.lock().await;
    let date = payload.date.unwrap_or_else(|| ledger.active_date());
    ledger.select_food_by_name(date, payload.name.trim(), payload.quantity)?;
    Ok(Json(ledger.day_view(date)))
}

pub async fn set_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<DayView>, AppError> {
    require_login(&state).await?;
    let mut ledger = state.ledger.lock().await;
    let date = payload.date.unwrap_or_else(|| ledger.active_date());
    ledger.set_goal(date, payload.goal)?;
    Ok(Json(ledger.day_view(date)))
}

pub async fn get_foods(State(state): State<AppState>) -> Result<Json<Vec<FoodDefinition>>, AppError> {
    require_login(&state).await?;
    let ledger = state.ledger.lock().await;
    Ok(Json(ledger.catalog().to_vec()))
}

pub async fn add_food(
    State(state): State<AppState>,
    Json(payload): Json<FoodRequest>,
) -> Result<(StatusCode, Json<FoodDefinition>), AppError> {
    require_login(&state).await?;
    let mut ledger = state.ledger.lock().await;
    let food = ledger
        .add_food_definition(&payload.name, payload.calories)?
        .clone();
    Ok((StatusCode::CREATED, Json(food)))
}

pub async fn switch_active_date(
    State(state): State<AppState>,
    Json(payload): Json<ActiveDateRequest>,
) -> Result<Json<DayView>, AppError> {
    require_login(&state).await?;
    let mut ledger = state.ledger.lock().await;
    ledger.switch_active_date(payload.date);
    Ok(Json(ledger.active_view()))
}

pub async fn get_calendar(State(state): State<AppState>) -> Result<Json<Vec<CalendarDay>>, AppError> {
    require_login(&state).await?;
    let ledger = state.ledger.lock().await;
    Ok(Json(build_calendar(&ledger)))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardView>, AppError> {
    require_login(&state).await?;
    let ledger = state.ledger.lock().await;
    Ok(Json(build_dashboard(&ledger)))
}

async fn perform_login(
    state: &AppState,
    username: &str,
    password: &str,
    remember: bool,
) -> Result<(), LoginError> {
    let outcome = attempt_login(username, password);
    if outcome != Err(LoginError::MissingFields) {
        tokio::time::sleep(state.login_delay).await;
    }
    if let Err(err) = outcome {
        warn!(user = username, "login rejected: {err}");
        return Err(err);
    }

    let stored = if remember {
        remember_user(&state.remember_path, username).await
    } else {
        forget_user(&state.remember_path).await
    };
    if let Err(err) = stored {
        error!("failed to update remembered user: {}", err.message);
        return Err(LoginError::Unavailable);
    }

    state.session.lock().await.sign_in(username);
    info!(user = username, remember, "logged in");
    Ok(())
}

async fn logged_in(state: &AppState) -> bool {
    state.session.lock().await.is_logged_in()
}

async fn require_login(state: &AppState) -> Result<(), AppError> {
    if logged_in(state).await {
        Ok(())
    } else {
        Err(AppError::unauthorized())
    }
}
