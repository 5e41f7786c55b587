pub const PRIMARY: &str = "#FF6B6B";
pub const SECONDARY: &str = "#4ECDC4";
pub const ACCENT: &str = "#FFE66D";
pub const DARK: &str = "#292F36";
pub const LIGHT: &str = "#F7FFF7";
pub const SUCCESS: &str = "#6BFF7C";
pub const WARNING: &str = "#FFD166";

/// Colors handed out to catalog entries, in assignment order.
pub const TAG_COLORS: [&str; 5] = [PRIMARY, SECONDARY, ACCENT, SUCCESS, WARNING];

/// Color tag for the catalog entry at `index`, cycling through [`TAG_COLORS`].
pub fn tag_for_index(index: usize) -> &'static str {
    TAG_COLORS[index % TAG_COLORS.len()]
}

/// Green below half the goal, amber below 85%, red from there on.
pub fn color_for_percentage(percentage: f64) -> &'static str {
    if percentage < 50.0 {
        SUCCESS
    } else if percentage < 85.0 {
        WARNING
    } else {
        PRIMARY
    }
}
