use crate::{check_unit, NodeIndex, Param, Result, F};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of a node's two rules is in effect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    /// Input strictly above the threshold
    A,
    /// Input at or below the threshold
    B,
}

impl Selection {
    /// Rule selected by an input against a threshold. Equality selects B.
    pub fn for_input(input: F, threshold: F) -> Self {
        if input > threshold {
            Selection::A
        } else {
            Selection::B
        }
    }

    /// Whether `x` is on this selection's side of `threshold`.
    ///
    /// Both sides include the threshold itself: the bounds analysis treats
    /// the feasible input set of A as the closure of `(t, 1]`.
    pub fn admits(self, x: F, threshold: F) -> bool {
        match self {
            Selection::A => x >= threshold,
            Selection::B => x <= threshold,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Selection::A => 'A',
            Selection::B => 'B',
        }
    }
}

/// Selection sequence as letters, e.g. "ABA"
pub fn path_string(path: &[Selection]) -> String {
    path.iter().map(|s| s.as_char()).collect()
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Conditional table: a pair of blend weights defining an affine map on [0,1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearRule {
    pub true_weight: F,  // output given a true parent
    pub false_weight: F, // output given a false parent
}

impl LinearRule {
    /// Default rule A of a fresh node
    pub const DEFAULT_A: LinearRule = LinearRule { true_weight: 0.7, false_weight: 0.5 };
    /// Default rule B of a fresh node
    pub const DEFAULT_B: LinearRule = LinearRule { true_weight: 0.5, false_weight: 0.3 };

    /// Unchecked constructor; see [`LinearRule::validated`]
    pub fn new(true_weight: F, false_weight: F) -> Self {
        Self { true_weight, false_weight }
    }

    /// Rule whose output ignores its input
    pub fn constant(value: F) -> Self {
        Self::new(value, value)
    }

    pub fn validated(true_weight: F, false_weight: F) -> Result<Self> {
        let rule = Self::new(true_weight, false_weight);
        rule.validate(None)?;
        Ok(rule)
    }

    /// Check both weights lie in [0,1]
    pub fn validate(&self, index: Option<NodeIndex>) -> Result<()> {
        check_unit(Param::TrueWeight, index, self.true_weight)?;
        check_unit(Param::FalseWeight, index, self.false_weight)?;
        Ok(())
    }

    /// true_weight * x + false_weight * (1 - x)
    pub fn evaluate(&self, x: F) -> F {
        self.true_weight * x + self.false_weight * (1.0 - x)
    }

    /// Output range over inputs in [0,1]
    pub fn range(&self) -> (F, F) {
        (
            self.true_weight.min(self.false_weight),
            self.true_weight.max(self.false_weight),
        )
    }
}
