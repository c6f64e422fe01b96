// VALUES tokenizer: turns `(1,'a'),(2,'b');` into rows of plain field strings.
// Fields are split on unquoted commas first; row boundaries are then inferred from
// a leading `(` on one field and a trailing `)` on the field before it.

use crate::error::TokenizeError;
use crate::parser::Row;

// States of the comma splitter. `Escape` remembers whether we were quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Unquoted,
    Quoted,
    Escape { quoted: bool },
}

// Split a value list on commas outside single quotes, resolving backslash escapes.
// Quote characters themselves are dropped from the field text.
pub fn split_fields(values: &str) -> Result<Vec<String>, TokenizeError> {
    let mut fields = Vec::new();
    let mut buf = String::new();
    let mut state = ScanState::Unquoted;
    let mut quote_start = 0usize;

    for (i, c) in values.char_indices() {
        match state {
            ScanState::Escape { quoted } => {
                buf.push(unescape(c));
                state = if quoted {
                    ScanState::Quoted
                } else {
                    ScanState::Unquoted
                };
            }
            ScanState::Quoted => match c {
                '\\' => state = ScanState::Escape { quoted: true },
                '\'' => state = ScanState::Unquoted,
                _ => buf.push(c),
            },
            ScanState::Unquoted => match c {
                '\\' => state = ScanState::Escape { quoted: false },
                '\'' => {
                    quote_start = i;
                    state = ScanState::Quoted;
                }
                ',' => fields.push(std::mem::take(&mut buf)),
                _ => buf.push(c),
            },
        }
    }

    match state {
        ScanState::Unquoted => {
            fields.push(buf);
            Ok(fields)
        }
        ScanState::Quoted => Err(TokenizeError::UnterminatedQuote {
            offset: quote_start,
        }),
        ScanState::Escape { .. } => Err(TokenizeError::DanglingEscape),
    }
}

// MySQL string escapes; anything else stands for itself.
fn unescape(c: char) -> char {
    match c {
        '0' => '\0',
        'b' => '\u{8}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'Z' => '\u{1a}',
        other => other,
    }
}

// Collects split fields into rows using the parenthesis-adjacency rule.
#[derive(Debug, Default)]
pub struct RowAssembler {
    current: Row,
}

impl RowAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    // Feed the next field. Returns the previous row once a new one starts.
    pub fn push(&mut self, mut field: String) -> Option<Row> {
        let mut completed = None;
        if field.starts_with('(') {
            if self.current.last().is_some_and(|last| last.ends_with(')')) {
                completed = Some(self.take_row(")"));
            }
            if self.current.is_empty() {
                field.remove(0);
            }
        }
        self.current.push(field);
        completed
    }

    // Close the statement: the last field must carry the `);` terminator.
    pub fn finish(mut self) -> Result<Row, TokenizeError> {
        match self.current.last() {
            Some(last) if last.ends_with(");") => Ok(self.take_row(");")),
            _ => Err(TokenizeError::MissingTerminator),
        }
    }

    fn take_row(&mut self, suffix: &str) -> Row {
        let mut row = std::mem::take(&mut self.current);
        if let Some(last) = row.last_mut() {
            last.truncate(last.len() - suffix.len());
        }
        for field in row.iter_mut() {
            if field == "NULL" {
                field.clear();
            }
        }
        row
    }
}

// Tokenize one statement's value list into its rows, in source order.
pub fn parse_rows(values: &str) -> Result<Vec<Row>, TokenizeError> {
    let mut rows = Vec::new();
    let mut assembler = RowAssembler::new();
    for field in split_fields(values)? {
        if let Some(row) = assembler.push(field) {
            rows.push(row);
        }
    }
    rows.push(assembler.finish()?);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &str) -> Vec<Row> {
        parse_rows(values).unwrap()
    }

    #[test]
    fn single_row() {
        assert_eq!(rows("(1,'a','b');"), vec![vec!["1", "a", "b"]]);
    }

    #[test]
    fn multiple_rows_in_order() {
        assert_eq!(
            rows("(1,'a'),(2,'b'),(3,'c');"),
            vec![vec!["1", "a"], vec!["2", "b"], vec!["3", "c"]]
        );
    }

    #[test]
    fn null_and_empty_become_empty_fields() {
        assert_eq!(rows("(1,NULL,'');"), vec![vec!["1", "", ""]]);
    }

    #[test]
    fn null_at_row_edges_is_normalized() {
        assert_eq!(
            rows("(NULL,1,NULL),(2,NULL);"),
            vec![vec!["", "1", ""], vec!["2", ""]]
        );
    }

    #[test]
    fn escaped_quote_is_unescaped() {
        assert_eq!(rows(r"(1,'it\'s');"), vec![vec!["1", "it's"]]);
    }

    #[test]
    fn comma_inside_quotes_does_not_split() {
        assert_eq!(rows("(1,'a,b');"), vec![vec!["1", "a,b"]]);
    }

    #[test]
    fn parens_inside_quotes_mid_row_are_kept() {
        assert_eq!(
            rows("(1,'(x',')y',2),(3,'z');"),
            vec![vec!["1", "(x", ")y", "2"], vec!["3", "z"]]
        );
    }

    #[test]
    fn quoted_first_field_loses_quotes() {
        assert_eq!(
            rows("('k1','v'),('k2','w');"),
            vec![vec!["k1", "v"], vec!["k2", "w"]]
        );
    }

    #[test]
    fn single_field_rows() {
        assert_eq!(rows("(1),(2),(3);"), vec![vec!["1"], vec!["2"], vec!["3"]]);
    }

    #[test]
    fn mysql_escapes_are_decoded() {
        assert_eq!(
            rows(r#"(1,'a\nb\tc\\d\0e\Z\rf\"g');"#),
            vec![vec!["1", "a\nb\tc\\d\0e\u{1a}\rf\"g"]]
        );
    }

    #[test]
    fn escaped_comma_outside_quotes_does_not_split() {
        assert_eq!(rows(r"(1,a\,b);"), vec![vec!["1", "a,b"]]);
    }

    #[test]
    fn trailing_paren_followed_by_leading_paren_splits_the_row() {
        // A field ending in ')' next to one starting with '(' reads as a row boundary.
        assert_eq!(
            rows("(1,'a)','(b');"),
            vec![vec!["1", "a"], vec!["b"]]
        );
    }

    #[test]
    fn value_ending_in_paren_at_row_end() {
        assert_eq!(
            rows("(1,'a)'),(2,'b)');"),
            vec![vec!["1", "a)"], vec!["2", "b)"]]
        );
    }

    #[test]
    fn unicode_passes_through() {
        assert_eq!(rows("(1,'héllo ☃');"), vec![vec!["1", "héllo ☃"]]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert_eq!(
            parse_rows("(1,'abc);"),
            Err(TokenizeError::UnterminatedQuote { offset: 3 })
        );
    }

    #[test]
    fn dangling_escape_is_an_error() {
        assert_eq!(parse_rows("(1,2);\\"), Err(TokenizeError::DanglingEscape));
    }

    #[test]
    fn missing_terminator_is_an_error() {
        assert_eq!(parse_rows("(1,2)"), Err(TokenizeError::MissingTerminator));
        assert_eq!(parse_rows("(1,2),(3,4"), Err(TokenizeError::MissingTerminator));
    }

    #[test]
    fn split_fields_keeps_raw_boundaries() {
        assert_eq!(
            split_fields("(1,'a,b'),(2,NULL);").unwrap(),
            vec!["(1", "a,b)", "(2", "NULL);"]
        );
    }

    #[test]
    fn assembler_emits_previous_row_on_open_paren() {
        let mut asm = RowAssembler::new();
        assert_eq!(asm.push("(1".into()), None);
        assert_eq!(asm.push("x)".into()), None);
        assert_eq!(
            asm.push("(2".into()),
            Some(vec!["1".to_string(), "x".to_string()])
        );
        asm.push("y);".into());
        assert_eq!(asm.finish().unwrap(), vec!["2".to_string(), "y".to_string()]);
    }

    #[test]
    fn parsing_is_deterministic() {
        let input = r"(1,'a\'b',NULL),(2,'c,d','');";
        assert_eq!(parse_rows(input), parse_rows(input));
    }
}
