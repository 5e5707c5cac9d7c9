// calculation.rs

use crate::operations::OperationKind;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fmt;

pub const CSV_HEADER: &str = "operation,operand_a,operand_b,result,timestamp";

/// One computed result. Fields are fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Calculation {
    operation: OperationKind,
    operand_a: f64,
    operand_b: f64,
    result: f64,
    timestamp: DateTime<Local>,
}

impl Calculation {
    pub fn new(operation: OperationKind, operand_a: f64, operand_b: f64, result: f64) -> Self {
        Self::with_timestamp(operation, operand_a, operand_b, result, Local::now())
    }

    pub fn with_timestamp(
        operation: OperationKind,
        operand_a: f64,
        operand_b: f64,
        result: f64,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self { operation, operand_a, operand_b, result, timestamp }
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn operand_a(&self) -> f64 {
        self.operand_a
    }

    pub fn operand_b(&self) -> f64 {
        self.operand_b
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.operation,
            self.operand_a,
            self.operand_b,
            self.result,
            self.timestamp.to_rfc3339()
        )
    }

    /// Parses one data row. A row without the timestamp column is stamped now.
    pub fn from_csv_row(row: &str) -> Result<Self, String> {
        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        if fields.len() != 4 && fields.len() != 5 {
            return Err(format!("expected 4 or 5 fields, found {}", fields.len()));
        }
        let operation = fields[0].parse::<OperationKind>().map_err(|e| e.to_string())?;
        let number = |idx: usize, column: &str| {
            match fields[idx].parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                Ok(_) => Err(format!("{} '{}' is not a finite number", column, fields[idx])),
                Err(_) => Err(format!("{} '{}' is not a number", column, fields[idx])),
            }
        };
        let operand_a = number(1, "operand_a")?;
        let operand_b = number(2, "operand_b")?;
        let result = number(3, "result")?;
        let timestamp = match fields.get(4) {
            Some(raw) => parse_timestamp(raw)?,
            None => Local::now(),
        };
        Ok(Self::with_timestamp(operation, operand_a, operand_b, result, timestamp))
    }
}

/// RFC 3339, or a naive ISO 8601 stamp taken as local time.
fn parse_timestamp(raw: &str) -> Result<DateTime<Local>, String> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.with_timezone(&Local));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| format!("timestamp '{}': {}", raw, e))?
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| format!("timestamp '{}' does not exist in local time", raw))
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.operation, self.operand_a, self.operand_b, self.result
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn displays_as_call_expression() {
        let calc = Calculation::new(OperationKind::Add, 2.0, 3.0, 5.0);
        assert_eq!(calc.to_string(), "add(2, 3) = 5");
        let calc = Calculation::new(OperationKind::IntegerDivide, 7.5, 2.0, 3.0);
        assert_eq!(calc.to_string(), "int_divide(7.5, 2) = 3");
    }

    #[test]
    fn csv_row_restores_the_same_record() {
        let calc = Calculation::new(OperationKind::Percent, 1.0, 3.0, 33.3333333333);
        let back = Calculation::from_csv_row(&calc.to_csv_row()).unwrap();
        assert_eq!(back, calc);
    }

    #[test]
    fn row_without_timestamp_is_stamped_now() {
        let before = Local::now();
        let calc = Calculation::from_csv_row("multiply,4,5,20").unwrap();
        assert_eq!(calc.operation(), OperationKind::Multiply);
        assert_eq!(calc.result(), 20.0);
        assert!(calc.timestamp() >= before);
    }

    #[test]
    fn malformed_rows_are_rejected() {
        assert!(Calculation::from_csv_row("add,1,2").is_err());
        assert!(Calculation::from_csv_row("sqrt,1,2,3").is_err());
        assert!(Calculation::from_csv_row("add,one,2,3").is_err());
        assert!(Calculation::from_csv_row("add,1,2,3,yesterday").is_err());
        let err = Calculation::from_csv_row("add,nan,1,inf").unwrap_err();
        assert_eq!(err, "operand_a 'nan' is not a finite number");
        assert!(Calculation::from_csv_row("add,1,1,inf").is_err());
        assert!(Calculation::from_csv_row("add,1,-inf,2").is_err());
    }

    #[test]
    fn naive_iso_timestamps_are_local_time() {
        let calc = Calculation::from_csv_row("add,1,2,3,2024-01-01T12:00:00.123456").unwrap();
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_micro_opt(12, 0, 0, 123456)
            .unwrap();
        assert_eq!(calc.timestamp().naive_local(), expected);
        let calc = Calculation::from_csv_row("add,1,2,3,2024-01-01T12:00:00").unwrap();
        assert_eq!(calc.timestamp().naive_local(), expected.with_nanosecond(0).unwrap());
    }
}
