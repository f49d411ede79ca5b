//! Effectivity evaluation
//!
//! Decides whether a revision's validity window applies to a resolution
//! context. Date windows use calendar order; serial number and lot windows
//! use natural order (see [`natural_cmp`]).

use std::cmp::Ordering;

use crate::entities::effectivity::{
    Effectivity, EffectivityContext, EffectivityRange, EffectivityValue,
};

/// Check whether an effectivity applies to the context
///
/// Effectivities of another configuration item, or of another kind than the
/// context value, never apply. Bounds are inclusive; a missing bound leaves
/// that side open.
pub fn is_effective(effectivity: &Effectivity, context: &EffectivityContext) -> bool {
    if effectivity.configuration_item != context.configuration_item {
        return false;
    }

    match (&effectivity.range, &context.value) {
        (EffectivityRange::Date { start, end }, EffectivityValue::Date(date)) => {
            in_range(start.as_ref(), end.as_ref(), date, |a, b| a.cmp(b))
        }
        (EffectivityRange::SerialNumber { start, end }, EffectivityValue::SerialNumber(sn)) => {
            in_range(start.as_deref(), end.as_deref(), sn.as_str(), natural_cmp)
        }
        (EffectivityRange::Lot { start, end }, EffectivityValue::Lot(lot)) => {
            in_range(start.as_deref(), end.as_deref(), lot.as_str(), natural_cmp)
        }
        _ => false,
    }
}

fn in_range<T: Copy>(
    start: Option<T>,
    end: Option<T>,
    value: T,
    cmp: impl Fn(T, T) -> Ordering,
) -> bool {
    let after_start = start.map_or(true, |s| cmp(value, s) != Ordering::Less);
    let before_end = end.map_or(true, |e| cmp(value, e) != Ordering::Greater);
    after_start && before_end
}

/// Compare serial numbers or lot identifiers
///
/// All-digit strings compare numerically at any length, ignoring leading
/// zeros. Anything else compares lexicographically.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|c| c.is_ascii_digit());
    if numeric(a) && numeric(b) {
        let a = a.trim_start_matches('0');
        let b = b.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}
