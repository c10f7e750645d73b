//! Rule bodies. Each function is total and pure: it reads the input, never the clock, and
//! answers `unknown` with confidence 0 when a numeric field it needs is absent or not positive.

pub(super) mod dimensions;
pub(super) mod facilities;
pub(super) mod installations;

/// Area or length that can be judged: present, finite, and strictly positive.
fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite() && *value > 0.0)
}

fn counted(value: Option<u32>) -> Option<u32> {
    value.filter(|value| *value > 0)
}

/// Optional facility flags count as installed only when explicitly confirmed.
fn confirmed(flag: Option<bool>) -> bool {
    flag == Some(true)
}

/// Labels of the facilities in `checks` that are not confirmed, in order.
fn unconfirmed(checks: &[(Option<bool>, &'static str)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(flag, _)| !confirmed(*flag))
        .map(|(_, label)| *label)
        .collect()
}
