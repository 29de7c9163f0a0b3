//! Lenient delimited-text tokenizer.
//!
//! Input is untrusted free-form export data, so tokenizing never fails:
//! unmatched quotes and ragged rows degrade to a best-effort split instead of
//! an error.

pub type RawRow = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: char,
    pub quote: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

impl Dialect {
    pub fn with_delimiter(delimiter: char) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Unquoted,
    Quoted,
}

struct Scanner {
    dialect: Dialect,
    state: ScanState,
    field: String,
    row: RawRow,
    rows: Vec<RawRow>,
    // Set once the current logical row has consumed any character.
    pending: bool,
}

impl Scanner {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            state: ScanState::Unquoted,
            field: String::new(),
            row: Vec::new(),
            rows: Vec::new(),
            pending: false,
        }
    }

    fn end_field(&mut self) {
        self.row.push(self.field.trim().to_string());
        self.field.clear();
    }

    fn end_row(&mut self) {
        if self.pending {
            self.end_field();
            self.rows.push(std::mem::take(&mut self.row));
        }
        self.pending = false;
    }

    fn run(mut self, text: &str) -> Vec<RawRow> {
        let Dialect { delimiter, quote } = self.dialect;
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match self.state {
                ScanState::Quoted => {
                    if ch == quote {
                        if chars.peek() == Some(&quote) {
                            chars.next();
                            self.field.push(quote);
                        } else {
                            self.state = ScanState::Unquoted;
                        }
                    } else {
                        self.field.push(ch);
                    }
                }
                ScanState::Unquoted => {
                    if ch == quote {
                        self.state = ScanState::Quoted;
                        self.pending = true;
                    } else if ch == delimiter {
                        self.end_field();
                        self.pending = true;
                    } else if ch == '\r' || ch == '\n' {
                        if ch == '\r' && chars.peek() == Some(&'\n') {
                            chars.next();
                        }
                        self.end_row();
                    } else {
                        self.field.push(ch);
                        self.pending = true;
                    }
                }
            }
        }
        // An unterminated quote still flushes whatever was accumulated.
        self.end_row();
        self.rows
    }
}

/// Splits comma-delimited text into rows of trimmed fields.
pub fn tokenize(text: &str) -> Vec<RawRow> {
    tokenize_with(text, &Dialect::default())
}

pub fn tokenize_with(text: &str, dialect: &Dialect) -> Vec<RawRow> {
    Scanner::new(*dialect).run(text)
}
