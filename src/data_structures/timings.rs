///
/// Per-phase build timings, purely a benchmarking/ambient-logging concern
/// with no bearing on the builder's output. Modeled directly on
/// `BvhConstructionTime` in the source's `data_structures/bvh_util.rs`.
use std::ops::{AddAssign, DivAssign};
use std::time::Duration;

#[derive(Debug, Copy, Clone, Default)]
pub struct BuildTimings {
    pub morton: Duration,
    pub sort: Duration,
    pub ploc: Duration,
    pub linearize: Duration,
}

impl BuildTimings {
    pub fn total(&self) -> Duration {
        self.morton + self.sort + self.ploc + self.linearize
    }

    pub fn display(&self, text: &str) -> Self {
        println!("{text}");
        println!("  morton:     {:?}", self.morton);
        println!("  sort:       {:?}", self.sort);
        println!("  ploc:       {:?}", self.ploc);
        println!("  linearize:  {:?}", self.linearize);
        println!("  total:      {:?}", self.total());
        *self
    }
}

impl AddAssign<BuildTimings> for BuildTimings {
    fn add_assign(&mut self, rhs: Self) {
        self.morton += rhs.morton;
        self.sort += rhs.sort;
        self.ploc += rhs.ploc;
        self.linearize += rhs.linearize;
    }
}

impl DivAssign<u32> for BuildTimings {
    fn div_assign(&mut self, rhs: u32) {
        self.morton /= rhs;
        self.sort /= rhs;
        self.ploc /= rhs;
        self.linearize /= rhs;
    }
}
