use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Observation on {date} has a non-finite value ({value})")]
    NonFiniteValue { date: NaiveDate, value: f64 },
}
