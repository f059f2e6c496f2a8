//! Cost derivation from duration and hourly rate.

use crate::types::Rate;

/// Seconds per hour, the divisor for hourly cost.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Computes the monetary cost of `duration_secs` at `rate` per hour.
///
/// No rounding is applied; two-decimal display is a presentation concern.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "durations far exceed any realistic tracked span before losing precision"
)]
pub fn cost(duration_secs: u64, rate: Rate) -> f64 {
    (duration_secs as f64 / SECONDS_PER_HOUR) * rate.value()
}
