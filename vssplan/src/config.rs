use std::fmt;
use std::str::FromStr;

/// Which vertices may carry a VSS border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Physical boundaries are forced, interior vertices are left to the solver.
    Free,
    /// Exactly the physical boundaries, no virtual subsections.
    PhysicalOnly,
}

/// Objectives in order of priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    Feasibility,
    MinimizeBoundaries,
    /// Maximize the number of (train, time) slots in which the train has
    /// left the network, then minimize the number of borders.
    ThroughputThenBoundaries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveConfig {
    pub boundaries: BoundaryPolicy,
    pub objective: Objective,
}

impl SolveConfig {
    pub fn base() -> SolveConfig {
        SolveConfig {
            boundaries: BoundaryPolicy::Free,
            objective: Objective::MinimizeBoundaries,
        }
    }

    pub fn fixed_vss() -> SolveConfig {
        SolveConfig {
            boundaries: BoundaryPolicy::PhysicalOnly,
            objective: Objective::Feasibility,
        }
    }

    /// Stop and arrival requirements only, like `base`. Schedule pinning
    /// policies are added on top of this configuration.
    pub fn fixed_schedule() -> SolveConfig {
        SolveConfig::base()
    }

    pub fn optimize() -> SolveConfig {
        SolveConfig {
            boundaries: BoundaryPolicy::Free,
            objective: Objective::ThroughputThenBoundaries,
        }
    }
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig::base()
    }
}

/// Named solve configurations, as selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Base,
    FixedVss,
    FixedSchedule,
    Optimize,
}

impl Variant {
    pub fn config(&self) -> SolveConfig {
        match self {
            Variant::Base => SolveConfig::base(),
            Variant::FixedVss => SolveConfig::fixed_vss(),
            Variant::FixedSchedule => SolveConfig::fixed_schedule(),
            Variant::Optimize => SolveConfig::optimize(),
        }
    }
}

impl FromStr for Variant {
    type Err = String;
    fn from_str(s: &str) -> Result<Variant, String> {
        match s {
            "base" => Ok(Variant::Base),
            "fixed-vss" => Ok(Variant::FixedVss),
            "fixed-schedule" => Ok(Variant::FixedSchedule),
            "optimize" => Ok(Variant::Optimize),
            _ => Err(format!(
                "unknown variant \"{}\" (expected base, fixed-vss, fixed-schedule or optimize)",
                s
            )),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Variant::Base => "base",
            Variant::FixedVss => "fixed-vss",
            Variant::FixedSchedule => "fixed-schedule",
            Variant::Optimize => "optimize",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_variant_names() {
        for v in &[
            Variant::Base,
            Variant::FixedVss,
            Variant::FixedSchedule,
            Variant::Optimize,
        ] {
            assert_eq!(v.to_string().parse::<Variant>(), Ok(*v));
        }
        assert!("fixed".parse::<Variant>().is_err());
    }

    #[test]
    fn presets() {
        assert_eq!(Variant::FixedVss.config().boundaries, BoundaryPolicy::PhysicalOnly);
        assert_eq!(Variant::FixedVss.config().objective, Objective::Feasibility);
        assert_eq!(SolveConfig::fixed_schedule(), SolveConfig::base());
        assert_eq!(
            Variant::Optimize.config().objective,
            Objective::ThroughputThenBoundaries
        );
    }
}
