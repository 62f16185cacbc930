use core_types::{MonthlyReturn, ReturnSeries};
use std::collections::HashMap;

/// Compounds daily decimal returns into one percent return per calendar month.
///
/// Months appear in the order they are first seen in `series`, not in calendar
/// order; the table formatter sorts by year.
pub fn aggregate_monthly(series: &ReturnSeries) -> Vec<MonthlyReturn> {
    let mut months: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for observation in series.observations() {
        let period = observation.period();
        let growth = 1.0 + observation.value;
        match index.get(&period) {
            Some(&i) => months[i].1 *= growth,
            None => {
                index.insert(period.clone(), months.len());
                months.push((period, growth));
            }
        }
    }

    months
        .into_iter()
        .map(|(period, growth)| MonthlyReturn::new(period, (growth - 1.0) * 100.0))
        .collect()
}
