//! Forecast horizon and month calendar
//!
//! The forecast operates in discrete months, 1-indexed. Three consecutive
//! months form a quarter, twelve a year. This module provides month naming and
//! the quarter and year grouping used when aggregating results.

use serde::{Deserialize, Serialize};

/// Months in a year; every annualized rate is divided by this.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Months in a quarter.
pub const MONTHS_PER_QUARTER: u32 = 3;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The span of months a forecast covers
///
/// # Example
/// ```
/// use forecast_core_rs::Horizon;
///
/// let horizon = Horizon::new(12);
/// assert_eq!(horizon.months(), 12);
/// assert_eq!(horizon.num_quarters(), 4);
/// assert_eq!(Horizon::month_name(1), "Jan");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    /// Number of months in the forecast
    months: u32,
}

impl Horizon {
    /// Create a new Horizon
    ///
    /// # Arguments
    /// * `months` - Number of months to forecast
    pub fn new(months: u32) -> Self {
        Self { months }
    }

    /// Number of months in the horizon
    pub fn months(&self) -> u32 {
        self.months
    }

    /// Iterate over month numbers `1..=months`
    ///
    /// # Example
    /// ```
    /// use forecast_core_rs::Horizon;
    ///
    /// let months: Vec<u32> = Horizon::new(3).iter().collect();
    /// assert_eq!(months, vec![1, 2, 3]);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        1..=self.months
    }

    /// Number of complete quarters inside the horizon
    ///
    /// A trailing partial quarter is not counted.
    ///
    /// # Example
    /// ```
    /// use forecast_core_rs::Horizon;
    ///
    /// assert_eq!(Horizon::new(7).num_quarters(), 2);
    /// ```
    pub fn num_quarters(&self) -> u32 {
        self.months / MONTHS_PER_QUARTER
    }

    /// First and last month (inclusive) of a 1-indexed quarter
    pub fn quarter_bounds(quarter: u32) -> (u32, u32) {
        let end = quarter * MONTHS_PER_QUARTER;
        (end + 1 - MONTHS_PER_QUARTER, end)
    }

    /// Number of complete years inside the horizon
    pub fn num_years(&self) -> u32 {
        self.months / MONTHS_PER_YEAR
    }

    /// Display name for a month: `Jan`..`Dec` in the first year, `M13` onward after
    pub fn month_name(month: u32) -> String {
        match month {
            1..=12 => MONTH_NAMES[(month - 1) as usize].to_string(),
            _ => format!("M{}", month),
        }
    }

    /// Display name for a quarter
    pub fn quarter_name(quarter: u32) -> String {
        format!("Q{}", quarter)
    }

    pub fn year_name(year: u32) -> String {
        format!("Y{}", year)
    }
}
