//! Tabular seed data: a dial takes its live value (and optionally explicit
//! bounds) from the first row of a query result.
//!
//! These are the thin stand-ins for the host platform's result-set plumbing;
//! they never fail loudly, they just yield fewer numbers.

/// One cell of a tabular result.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Null,
}

/// Row-major tabular result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataGrid {
    rows: Vec<Vec<Cell>>,
}

impl DataGrid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        DataGrid { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn first_row(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Row/column transpose. Short rows pad with [`Cell::Null`] so the
    /// result stays rectangular.
    pub fn pivot(&self) -> DataGrid {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = Vec::with_capacity(columns);
        for column in 0..columns {
            rows.push(
                self.rows
                    .iter()
                    .map(|row| row.get(column).cloned().unwrap_or(Cell::Null))
                    .collect(),
            );
        }
        DataGrid { rows }
    }
}

/// Locale-shaped number parsing parameters.
#[derive(Debug, Clone)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub currency_symbol: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            decimal_separator: '.',
            grouping_separator: ',',
            currency_symbol: "$".to_string(),
        }
    }
}

/// Extract the numeric cells of a row, in order. Numbers pass through; text
/// is parsed after stripping the currency symbol and grouping separators;
/// anything unparseable is skipped.
pub fn to_numbers(cells: &[Cell], format: &NumberFormat) -> Vec<f64> {
    cells
        .iter()
        .filter_map(|cell| match cell {
            Cell::Number(value) => Some(*value),
            Cell::Text(text) => parse_number(text, format),
            Cell::Null => None,
        })
        .collect()
}

fn parse_number(text: &str, format: &NumberFormat) -> Option<f64> {
    let mut cleaned = text.replace(&format.currency_symbol, "");
    cleaned.retain(|c| c != format.grouping_separator && !c.is_whitespace());
    if format.decimal_separator != '.' {
        cleaned = cleaned.replace(format.decimal_separator, ".");
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_from_mixed_row() {
        let row = vec![
            Cell::Number(42.0),
            Cell::Text("$1,234.5".to_string()),
            Cell::Text("label".to_string()),
            Cell::Null,
            Cell::Text(" 7 ".to_string()),
        ];
        let numbers = to_numbers(&row, &NumberFormat::default());
        assert_eq!(numbers, vec![42.0, 1234.5, 7.0]);
    }

    #[test]
    fn european_decimal_separator() {
        let format = NumberFormat {
            decimal_separator: ',',
            grouping_separator: '.',
            currency_symbol: "\u{20ac}".to_string(),
        };
        let row = vec![Cell::Text("\u{20ac}1.234,5".to_string())];
        assert_eq!(to_numbers(&row, &format), vec![1234.5]);
    }

    #[test]
    fn non_finite_text_is_skipped() {
        let row = vec![
            Cell::Text("inf".to_string()),
            Cell::Text("NaN".to_string()),
            Cell::Number(1.0),
        ];
        assert_eq!(to_numbers(&row, &NumberFormat::default()), vec![1.0]);
    }

    #[test]
    fn pivot_transposes_with_padding() {
        let grid = DataGrid::from_rows(vec![
            vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Number(3.0)],
            vec![Cell::Number(4.0)],
        ]);
        let pivoted = grid.pivot();
        assert_eq!(
            pivoted.rows(),
            &[
                vec![Cell::Number(1.0), Cell::Number(4.0)],
                vec![Cell::Number(2.0), Cell::Null],
                vec![Cell::Number(3.0), Cell::Null],
            ]
        );
        assert!(DataGrid::default().first_row().is_none());
    }
}
