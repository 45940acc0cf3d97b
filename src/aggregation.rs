use crate::condition::{code_priority, condition_for_code, Condition};
use crate::models::forecast_record::ForecastStore;
use crate::parameter::Parameter;
use crate::time_window::TimeWindow;

/// Reduction applied to the values of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationKind {
    Min,
    Max,
    Sum,
    Avg,
}

/// Aggregates the raw values of a parameter over a time window.
///
/// Returns None when the window holds no value for the parameter, which happens
/// past the forecast horizon or when the parameter isn't delivered at all.
///
/// # Arguments
///
/// * 'store' - forecast records
/// * 'parameter' - the parameter to aggregate
/// * 'window' - time window to aggregate over
/// * 'kind' - the reduction to apply
pub fn aggregate(store: &ForecastStore, parameter: Parameter, window: &TimeWindow, kind: AggregationKind) -> Option<f64> {
    aggregate_code(store, parameter.code(), window, kind)
}

/// Same as aggregate but for any provider code
pub fn aggregate_code(store: &ForecastStore, code: &str, window: &TimeWindow, kind: AggregationKind) -> Option<f64> {
    let values = store
        .range(window.start, window.end())
        .filter_map(|(_, r)| r.value(code))
        .collect::<Vec<f64>>();

    if values.is_empty() {
        return None;
    }

    let result = match kind {
        AggregationKind::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregationKind::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        AggregationKind::Sum => values.iter().sum::<f64>(),
        AggregationKind::Avg => values.iter().sum::<f64>() / values.len() as f64,
    };

    Some(result)
}

/// Returns the most significant condition within a window.
///
/// Codes are ranked by their position in the DWD weather code table, so a single
/// rainy hour makes a rainy day. Unknown codes and "-" are ignored.
///
/// # Arguments
///
/// * 'store' - forecast records
/// * 'window' - time window to look at
pub fn condition_mode(store: &ForecastStore, window: &TimeWindow) -> Option<Condition> {
    store
        .range(window.start, window.end())
        .filter_map(|(_, r)| r.condition_code())
        .filter_map(|code| code_priority(code).map(|p| (p, code)))
        .min_by_key(|(p, _)| *p)
        .and_then(|(_, code)| condition_for_code(code))
}
