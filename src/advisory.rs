use std::collections::BTreeMap;

/// Training-load guidance tiers, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAdvisory {
    RecoveryFocus,
    ReducedLoad,
    ControlledLoad,
    FullLoad,
}

impl LoadAdvisory {
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::RecoveryFocus => {
                "Current patterns indicate prioritizing recovery-focused sessions."
            }
            Self::ReducedLoad => "Recent entries suggest considering a reduced training load.",
            Self::ControlledLoad => {
                "A controlled training load may be appropriate based on recent observations."
            }
            Self::FullLoad => "Current observations support full training load.",
        }
    }
}

/// Strict priority cascade: the first matching rule wins, and the order is
/// load-bearing. An average of exactly 5 must hit ReducedLoad even though
/// the ControlledLoad condition would also match.
pub fn advise(
    average_severity: f64,
    pain_days: usize,
    frequency_by_area: &BTreeMap<String, usize>,
) -> LoadAdvisory {
    let max_area_count = frequency_by_area.values().copied().max().unwrap_or(0);

    if average_severity >= 7.0 || pain_days >= 5 {
        return LoadAdvisory::RecoveryFocus;
    }
    if average_severity >= 5.0 || max_area_count >= 3 {
        return LoadAdvisory::ReducedLoad;
    }
    if average_severity >= 3.0 || (2..=3).contains(&pain_days) {
        return LoadAdvisory::ControlledLoad;
    }
    if average_severity < 3.0 && pain_days <= 1 {
        return LoadAdvisory::FullLoad;
    }
    // Gaps (e.g. low severity but 4 pain days) fall back to the
    // conservative middle ground.
    LoadAdvisory::ControlledLoad
}
