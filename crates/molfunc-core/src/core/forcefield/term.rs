use std::ops::{Add, AddAssign};

/// The two contributions to the heuristic energy of an assembled structure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyTerm {
    pub repulsion: f64,
    pub angle: f64,
}

impl EnergyTerm {
    pub fn new(repulsion: f64, angle: f64) -> Self {
        Self { repulsion, angle }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.repulsion + self.angle
    }
}

impl Add for EnergyTerm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            repulsion: self.repulsion + rhs.repulsion,
            angle: self.angle + rhs.angle,
        }
    }
}

impl AddAssign for EnergyTerm {
    fn add_assign(&mut self, rhs: Self) {
        self.repulsion += rhs.repulsion;
        self.angle += rhs.angle;
    }
}
