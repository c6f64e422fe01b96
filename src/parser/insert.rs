// INSERT line classifier: decides whether a dump line is an INSERT for the
// target table and hands back its value list.
// mysqldump writes one statement per line, so no multi-line accumulation is needed.

use regex::Regex;

// Prefix that opens an INSERT statement. Matched at column 0 only.
pub const INSERT_PREFIX: &str = "INSERT INTO";

const VALUES_MARKER: &str = " VALUES ";

pub struct InsertClassifier {
    table_re: Regex,
}

impl InsertClassifier {
    // Build the table-name regex once for reuse.
    pub fn new() -> Self {
        let table_re =
            Regex::new(r"^INSERT INTO `(.*?)` VALUES").expect("valid insert table regex");
        Self { table_re }
    }

    // Returns true if the line begins an INSERT statement.
    pub fn is_insert(&self, line: &str) -> bool {
        line.starts_with(INSERT_PREFIX)
    }

    // Name between "INSERT INTO `" and the following "` VALUES".
    // None when the backtick-quoted form is absent.
    pub fn table_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.table_re
            .captures(line)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
    }

    // Value list for `table` if this line is an INSERT into it.
    pub fn target_values<'a>(&self, line: &'a str, table: &str) -> Option<&'a str> {
        if !self.is_insert(line) {
            return None;
        }
        if self.table_name(line)? != table {
            return None;
        }
        Some(values_of(line))
    }
}

impl Default for InsertClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// Everything after the first " VALUES ", or "" if the marker is missing.
pub fn values_of(line: &str) -> &str {
    line.split_once(VALUES_MARKER)
        .map(|(_, values)| values)
        .unwrap_or("")
}

// A usable value list is non-empty and opens with a row.
pub fn values_sane(values: &str) -> bool {
    values.starts_with('(')
}
