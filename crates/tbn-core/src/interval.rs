use crate::F;
use serde::Serialize;

/// Closed interval `[min, max]` with `min <= max`
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Interval {
    min: F,
    max: F,
}

impl Interval {
    /// Feasible input range of the first chain node
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    /// `None` when the bounds are inverted or not comparable
    pub fn new(min: F, max: F) -> Option<Self> {
        if min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn point(x: F) -> Self {
        Self { min: x, max: x }
    }

    /// Smallest interval containing every value, or `None` if there are none
    pub fn hull<I: IntoIterator<Item = F>>(values: I) -> Option<Self> {
        values.into_iter().fold(None, |acc: Option<Interval>, x| match acc {
            None => Some(Interval::point(x)),
            Some(iv) => Some(Interval {
                min: iv.min.min(x),
                max: iv.max.max(x),
            }),
        })
    }

    pub fn min(&self) -> F {
        self.min
    }

    pub fn max(&self) -> F {
        self.max
    }

    pub fn width(&self) -> F {
        self.max - self.min
    }

    pub fn contains(&self, x: F) -> bool {
        self.min <= x && x <= self.max
    }

    pub fn contains_within(&self, x: F, tol: F) -> bool {
        self.min - tol <= x && x <= self.max + tol
    }
}

/// Analysis outcome for one selection sequence
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Reach {
    /// Some input consistent with every threshold on the path exists;
    /// outputs span the interval
    Alive(Interval),
    /// No consistent input exists
    Dead,
}

impl Reach {
    pub fn is_dead(&self) -> bool {
        matches!(self, Reach::Dead)
    }

    pub fn interval(&self) -> Option<&Interval> {
        match self {
            Reach::Alive(iv) => Some(iv),
            Reach::Dead => None,
        }
    }
}

impl From<Option<Interval>> for Reach {
    fn from(iv: Option<Interval>) -> Self {
        iv.map_or(Reach::Dead, Reach::Alive)
    }
}
