use std::fmt;

use serde::Deserialize;

use super::containment::Containment;

/// Usual extension of an area of interest, in hectares. Both bounds are exclusive.
///
/// Areas outside the range are flagged, never rejected.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AcceptableRange {
    pub min: f64,
    pub max: f64,
}

impl Default for AcceptableRange {
    fn default() -> Self {
        Self {
            min: 100.0,
            max: 5000.0,
        }
    }
}

impl AcceptableRange {
    pub fn contains(&self, area_ha: f64) -> bool {
        self.min < area_ha && area_ha < self.max
    }
}

impl fmt::Display for AcceptableRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ha", self.min, self.max)
    }
}

/// Observations about where an area of interest lies and how large it is. None of them abort a validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advisory {
    /// Fully inside, but the whole area is outside the acceptable range.
    OutOfGeneralRange { area_ha: f64, range: AcceptableRange },
    /// Partially inside, with an inner part below the range minimum.
    SmallPartialOverlap { area_ha: f64, range: AcceptableRange },
    /// Partially inside, with an inner part within the acceptable range.
    SignificantPartialOverlap { area_ha: f64, range: AcceptableRange },
    /// Partially inside, with an inner part above the range maximum.
    ExcessivePartialOverlap { area_ha: f64, range: AcceptableRange },
    CompletelyOutside,
}

impl Advisory {
    /// Name of the advisory class, stable for automated pipelines.
    pub fn class(&self) -> &'static str {
        match self {
            Advisory::OutOfGeneralRange { .. } => "OutOfGeneralRange",
            Advisory::SmallPartialOverlap { .. } => "SmallPartialOverlap",
            Advisory::SignificantPartialOverlap { .. } => "SignificantPartialOverlap",
            Advisory::ExcessivePartialOverlap { .. } => "ExcessivePartialOverlap",
            Advisory::CompletelyOutside => "CompletelyOutside",
        }
    }

    pub fn area_ha(&self) -> Option<f64> {
        match *self {
            Advisory::OutOfGeneralRange { area_ha, .. }
            | Advisory::SmallPartialOverlap { area_ha, .. }
            | Advisory::SignificantPartialOverlap { area_ha, .. }
            | Advisory::ExcessivePartialOverlap { area_ha, .. } => Some(area_ha),
            Advisory::CompletelyOutside => None,
        }
    }
}

const PARTIAL_PREFIX: &str = "The area of interest is partially outside the reference region";

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::OutOfGeneralRange { area_ha, range } => write!(
                f,
                "The area of interest has {:.2} ha, outside the general range ({})",
                area_ha, range
            ),
            Advisory::SmallPartialOverlap { area_ha, range } => write!(
                f,
                "{}, the part inside is smaller than the general range ({}), with {:.2} ha",
                PARTIAL_PREFIX, range, area_ha
            ),
            Advisory::SignificantPartialOverlap { area_ha, range } => write!(
                f,
                "{}, there is a significant part inside (within the general range {}), with {:.2} ha",
                PARTIAL_PREFIX, range, area_ha
            ),
            Advisory::ExcessivePartialOverlap { area_ha, range } => write!(
                f,
                "{}, the part inside exceeds the general range ({}), with {:.2} ha",
                PARTIAL_PREFIX, range, area_ha
            ),
            Advisory::CompletelyOutside => write!(
                f,
                "The area of interest lies completely outside the reference region"
            ),
        }
    }
}

/// Map a containment result onto the advisory tiers.
///
/// An inner part of exactly `range.min` or `range.max` hectares falls in no tier and yields no advisory.
pub fn advisories(containment: &Containment, range: &AcceptableRange) -> Vec<Advisory> {
    let range = *range;
    match *containment {
        Containment::FullyInside { area_ha } if !range.contains(area_ha) => {
            vec![Advisory::OutOfGeneralRange { area_ha, range }]
        }
        Containment::FullyInside { .. } => vec![],
        Containment::PartiallyInside { inside_area_ha: area_ha } => {
            if area_ha < range.min {
                vec![Advisory::SmallPartialOverlap { area_ha, range }]
            } else if range.contains(area_ha) {
                vec![Advisory::SignificantPartialOverlap { area_ha, range }]
            } else if area_ha > range.max {
                vec![Advisory::ExcessivePartialOverlap { area_ha, range }]
            } else {
                vec![]
            }
        }
        Containment::FullyOutside => vec![Advisory::CompletelyOutside],
    }
}

/// Emit a containment result and its advisories on the log. Full containment is informational, every
/// advisory is a warning.
pub fn emit(containment: &Containment, advisories: &[Advisory]) {
    if let Containment::FullyInside { area_ha } = containment {
        log::info!(
            "The area of interest lies completely inside the reference region, with {:.2} ha",
            area_ha
        );
    }
    for advisory in advisories {
        log::warn!("{}", advisory);
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{advisories, AcceptableRange, Advisory};
    use crate::aoi::containment::Containment;

    #[rstest]
    #[case(100.0, false)]
    #[case(100.01, true)]
    #[case(4999.99, true)]
    #[case(5000.0, false)]
    fn test_acceptable_range_bounds_are_exclusive(#[case] area_ha: f64, #[case] expected: bool) {
        assert_eq!(AcceptableRange::default().contains(area_ha), expected);
    }

    #[rstest]
    #[case(Containment::FullyInside { area_ha: 100.01 }, None)]
    #[case(Containment::FullyInside { area_ha: 50.0 }, Some("OutOfGeneralRange"))]
    #[case(Containment::FullyInside { area_ha: 7000.0 }, Some("OutOfGeneralRange"))]
    #[case(Containment::PartiallyInside { inside_area_ha: 20.0 }, Some("SmallPartialOverlap"))]
    #[case(Containment::PartiallyInside { inside_area_ha: 3000.0 }, Some("SignificantPartialOverlap"))]
    #[case(Containment::PartiallyInside { inside_area_ha: 6000.0 }, Some("ExcessivePartialOverlap"))]
    #[case(Containment::PartiallyInside { inside_area_ha: 100.0 }, None)]
    #[case(Containment::PartiallyInside { inside_area_ha: 5000.0 }, None)]
    #[case(Containment::FullyOutside, Some("CompletelyOutside"))]
    fn test_advisory_tiers(#[case] containment: Containment, #[case] expected: Option<&str>) {
        let found: Vec<&str> = advisories(&containment, &AcceptableRange::default())
            .iter()
            .map(Advisory::class)
            .collect();
        assert_eq!(found, expected.into_iter().collect::<Vec<&str>>());
    }

    #[rstest]
    #[case(Advisory::OutOfGeneralRange { area_ha: 50.0, range: AcceptableRange::default() }, "50.00 ha")]
    #[case(Advisory::SignificantPartialOverlap { area_ha: 2999.996, range: AcceptableRange::default() }, "3000.00 ha")]
    #[case(Advisory::SmallPartialOverlap { area_ha: 12.3456, range: AcceptableRange::default() }, "12.35 ha")]
    fn test_messages_cite_area_with_two_decimals(#[case] advisory: Advisory, #[case] expected: &str) {
        let message = advisory.to_string();
        assert!(message.contains(expected), "{}", message);
        assert!(message.contains("100-5000 ha"), "{}", message);
    }
}
