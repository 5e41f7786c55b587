//! Per-date nutrition history: the food catalog, each day's selections and
//! goal, and the totals and progress derived from them.

use crate::models::{DEFAULT_GOAL, DayRecord, DayView, FoodDefinition, SelectionEntry};
use crate::palette;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("food name must not be empty")]
    EmptyFoodName,
    #[error("calories must be a positive whole number")]
    InvalidCalories,
    #[error("a food named '{0}' is already in the list")]
    DuplicateFood(String),
    #[error("calorie goal must be a positive whole number")]
    InvalidGoal,
    #[error("unknown food '{0}'")]
    UnknownFood(String),
}

#[derive(Debug, Clone)]
pub struct NutritionLedger {
    active_date: NaiveDate,
    days: BTreeMap<NaiveDate, DayRecord>,
    catalog: Vec<FoodDefinition>,
}

impl NutritionLedger {
    /// Ledger with the built-in catalog, active on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self::with_catalog(today, seed_catalog())
    }

    pub fn with_catalog(today: NaiveDate, catalog: Vec<FoodDefinition>) -> Self {
        Self {
            active_date: today,
            days: BTreeMap::new(),
            catalog,
        }
    }

    pub fn active_date(&self) -> NaiveDate {
        self.active_date
    }

    pub fn catalog(&self) -> &[FoodDefinition] {
        &self.catalog
    }

    pub fn record(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    pub fn recorded_days(&self) -> usize {
        self.days.len()
    }

    pub fn find_food(&self, name: &str) -> Option<&FoodDefinition> {
        self.catalog.iter().find(|food| food.name == name)
    }

    /// Sets how many units of `food` were eaten on `date`.
    ///
    /// A non-positive quantity drops the food from that day. An existing
    /// entry keeps its position; a new one goes to the end.
    pub fn select_food(&mut self, date: NaiveDate, food: &FoodDefinition, quantity: i64) {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        if quantity == 0 {
            let Some(record) = self.days.get_mut(&date) else {
                return;
            };
            if let Some(index) = record.selections.iter().position(|e| e.name == food.name) {
                record.selections.remove(index);
                record.recompute_total();
                debug!(%date, food = %food.name, total = record.total, "removed selection");
            }
            return;
        }

        let record = self
            .days
            .entry(date)
            .or_insert_with(|| DayRecord::empty(date));
        let entry = SelectionEntry::new(food, quantity);
        match record.selections.iter_mut().find(|e| e.name == food.name) {
            Some(existing) => *existing = entry,
            None => record.selections.push(entry),
        }
        record.recompute_total();
        debug!(%date, food = %food.name, quantity, total = record.total, "updated selection");
    }

    pub fn select_food_by_name(
        &mut self,
        date: NaiveDate,
        name: &str,
        quantity: i64,
    ) -> Result<(), LedgerError> {
        let food = self
            .find_food(name)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownFood(name.to_string()))?;
        self.select_food(date, &food, quantity);
        Ok(())
    }

    pub fn set_goal(&mut self, date: NaiveDate, goal: i64) -> Result<(), LedgerError> {
        let goal = u32::try_from(goal)
            .ok()
            .filter(|goal| *goal > 0)
            .ok_or(LedgerError::InvalidGoal)?;
        let record = self
            .days
            .entry(date)
            .or_insert_with(|| DayRecord::empty(date));
        record.goal = goal;
        info!(%date, goal, "calorie goal set");
        Ok(())
    }

    pub fn add_food_definition(
        &mut self,
        name: &str,
        calories: i64,
    ) -> Result<&FoodDefinition, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyFoodName);
        }
        let calories = u32::try_from(calories)
            .ok()
            .filter(|calories| *calories > 0)
            .ok_or(LedgerError::InvalidCalories)?;
        if self.find_food(name).is_some() {
            return Err(LedgerError::DuplicateFood(name.to_string()));
        }

        let color = palette::tag_for_index(self.catalog.len());
        self.catalog.push(FoodDefinition::new(name, calories, color));
        info!(food = name, calories, "added food to catalog");
        Ok(&self.catalog[self.catalog.len() - 1])
    }

    /// Share of the day's goal eaten, in percent, capped at 100. Days without a
    /// record report 0.
    pub fn progress(&self, date: NaiveDate) -> f64 {
        self.days
            .get(&date)
            .map_or(0.0, |record| percentage(record.total, record.goal))
    }

    /// Makes `date` the day edits and views default to. Does not touch history.
    pub fn switch_active_date(&mut self, date: NaiveDate) {
        if self.active_date != date {
            debug!(from = %self.active_date, to = %date, "switched active date");
        }
        self.active_date = date;
    }

    pub fn day_view(&self, date: NaiveDate) -> DayView {
        let (record, has_record) = match self.days.get(&date) {
            Some(record) => (record.clone(), true),
            None => (DayRecord::empty(date), false),
        };
        let goal_percentage = percentage(record.total, record.goal);
        DayView {
            date,
            has_record,
            total_calories: record.total,
            goal: record.goal,
            goal_percentage,
            color: palette::color_for_percentage(goal_percentage).to_string(),
            selections: record.selections,
        }
    }

    pub fn active_view(&self) -> DayView {
        self.day_view(self.active_date)
    }
}

pub fn seed_catalog() -> Vec<FoodDefinition> {
    [
        ("Chappathi", 130),
        ("Idly", 75),
        ("Briyani", 350),
        ("Egg", 68),
        ("Rice (1 cup)", 200),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (name, calories))| {
        FoodDefinition::new(name, calories, palette::tag_for_index(index))
    })
    .collect()
}

pub fn percentage(total: u64, goal: u32) -> f64 {
    let goal = if goal == 0 { DEFAULT_GOAL } else { goal };
    (total as f64 / f64::from(goal) * 100.0).min(100.0)
}

/// Parses a whole number typed into a form field. Anything else is `None`.
pub fn parse_whole_number(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
