use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{any, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handlers::to_login))
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/signup", get(handlers::signup_page))
        .route("/forgot-password", get(handlers::forgot_password_page))
        .route("/logout", post(handlers::logout))
        .route("/calorie-counter", get(handlers::dashboard))
        .route("/calorie-counter/select", post(handlers::select_food_form))
        .route("/calorie-counter/goal", post(handlers::set_goal_form))
        .route("/calorie-counter/foods", post(handlers::add_food_form))
        .route("/calorie-counter/date", post(handlers::switch_date_form))
        .route("/api/login", post(handlers::api_login))
        .route("/api/day", get(handlers::get_day))
        .route("/api/select", post(handlers::select_food))
        .route("/api/goal", post(handlers::set_goal))
        .route("/api/foods", get(handlers::get_foods).post(handlers::add_food))
        .route("/api/active-date", post(handlers::switch_active_date))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .fallback(handlers::to_login)
        .with_state(state)
}
