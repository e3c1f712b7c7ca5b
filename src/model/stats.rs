//! Unit stat rows (`unitProfile`).

/// Displayed columns, in order.
pub const STAT_COLUMNS: [&str; 10] = ["Name", "M", "WS", "BS", "S", "T", "W", "I", "A", "Ld"];

/// Placeholder for an absent or empty cell.
pub const EMPTY_CELL: &str = "-";

/// Long name of a stat column, used in HTML comments and prompts.
pub fn stat_long_name(column: &str) -> &str {
    match column {
        "Name" => "Unit Name",
        "M" => "Movement",
        "WS" => "Weapon Skill",
        "BS" => "Ballistic Skill",
        "S" => "Strength",
        "T" => "Toughness",
        "W" => "Wounds",
        "I" => "Initiative",
        "A" => "Attacks",
        "Ld" => "Leadership",
        other => other,
    }
}

/// Numeric columns the edit step may change (everything but `Name`).
pub fn editable_columns() -> &'static [&'static str] {
    &STAT_COLUMNS[1..]
}

/// One row of a unit profile. Cells keep their upstream order; columns not in
/// [`STAT_COLUMNS`] are carried along but never displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatRow {
    cells: Vec<(String, String)>,
}

impl StatRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(column, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = Self::new();
        for (k, v) in pairs {
            row.set(k, v);
        }
        row
    }

    /// Raw cell value; `None` when absent or empty.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Cell value with the `-` placeholder applied.
    pub fn display(&self, column: &str) -> &str {
        self.get(column).unwrap_or(EMPTY_CELL)
    }

    /// Insert or replace a cell, keeping its position.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == column) {
            Some((_, v)) => *v = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Row label used in prompts and comments.
    pub fn label(&self, index: usize) -> String {
        self.get("Name")
            .map_or_else(|| format!("Unit {}", index + 1), str::to_owned)
    }

    /// Copy of the displayed columns with placeholders applied.
    pub fn normalized(&self) -> Self {
        Self::from_pairs(STAT_COLUMNS.iter().map(|c| (*c, self.display(c))))
    }

    /// Displayed `(column, value)` pairs in column order.
    pub fn displayed(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        STAT_COLUMNS.iter().map(move |c| (*c, self.display(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_placeholder() {
        let row = StatRow::from_pairs([("Name", "Grave Guard"), ("M", ""), ("WS", "4")]);
        assert_eq!(row.display("M"), "-");
        assert_eq!(row.display("BS"), "-");
        assert_eq!(row.display("WS"), "4");
    }

    #[test]
    fn test_set_keeps_position() {
        let mut row = StatRow::from_pairs([("Name", "A"), ("M", "4")]);
        row.set("Name", "B");
        let cols: Vec<_> = row.cells.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(cols, vec!["Name", "M"]);
        assert_eq!(row.get("Name"), Some("B"));
    }

    #[test]
    fn test_normalized_drops_extra_columns() {
        let row = StatRow::from_pairs([("Name", "Seneschal"), ("Extra", "x")]);
        let normalized = row.normalized();
        assert_eq!(normalized.get("Extra"), None);
        assert_eq!(normalized.displayed().count(), 10);
        assert_eq!(normalized.display("Ld"), "-");
    }

    #[test]
    fn test_label_fallback() {
        assert_eq!(StatRow::new().label(1), "Unit 2");
        assert_eq!(StatRow::from_pairs([("Name", "Wight")]).label(0), "Wight");
    }

    #[test]
    fn test_editable_columns() {
        assert_eq!(editable_columns().len(), 9);
        assert!(!editable_columns().contains(&"Name"));
        assert_eq!(stat_long_name("Ld"), "Leadership");
    }
}
