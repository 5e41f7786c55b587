use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Goal applied to any date that has not had one set explicitly.
pub const DEFAULT_GOAL: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodDefinition {
    pub name: String,
    pub calories: u32,
    pub color_tag: String,
}

impl FoodDefinition {
    pub fn new(name: impl Into<String>, calories: u32, color_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calories,
            color_tag: color_tag.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub name: String,
    pub calories: u32,
    pub color_tag: String,
    pub quantity: u32,
    pub total_calories: u64,
}

impl SelectionEntry {
    pub fn new(food: &FoodDefinition, quantity: u32) -> Self {
        Self {
            name: food.name.clone(),
            calories: food.calories,
            color_tag: food.color_tag.clone(),
            quantity,
            total_calories: u64::from(food.calories) * u64::from(quantity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub selections: Vec<SelectionEntry>,
    pub goal: u32,
    pub total: u64,
}

impl DayRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            selections: Vec::new(),
            goal: DEFAULT_GOAL,
            total: 0,
        }
    }

    pub fn recompute_total(&mut self) {
        self.total = self
            .selections
            .iter()
            .fold(0u64, |sum, entry| sum.saturating_add(entry.total_calories));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub has_record: bool,
    pub total_calories: u64,
    pub goal: u32,
    pub goal_percentage: f64,
    pub color: String,
    pub selections: Vec<SelectionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub label: String,
    pub badge: String,
    pub is_today: bool,
    pub is_active: bool,
    pub has_record: bool,
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub day: DayView,
    pub catalog: Vec<FoodDefinition>,
    pub calendar: Vec<CalendarDay>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub date: Option<NaiveDate>,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub date: Option<NaiveDate>,
    pub goal: i64,
}

#[derive(Debug, Deserialize)]
pub struct FoodRequest {
    pub name: String,
    pub calories: i64,
}

#[derive(Debug, Deserialize)]
pub struct ActiveDateRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// HTML forms post every field as text; parsing happens in the handlers.

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub remember: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Deserialize)]
pub struct GoalForm {
    #[serde(default)]
    pub goal: String,
}

#[derive(Debug, Deserialize)]
pub struct FoodForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub calories: String,
}

#[derive(Debug, Deserialize)]
pub struct DateForm {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedUser {
    pub username: String,
}
