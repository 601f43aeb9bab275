//! stage.rs
//!
//! Life-stage classification used to tag buckets.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifeStage {
    pub key: &'static str,
    pub name: &'static str,
    /// Inclusive upper bound in whole years; `None` is unbounded.
    pub max_age: Option<u32>,
}

impl LifeStage {
    const fn new(key: &'static str, name: &'static str, max_age: Option<u32>) -> Self {
        Self { key, name, max_age }
    }

    pub fn contains(&self, age: u32) -> bool {
        self.max_age.is_none_or(|max| age <= max)
    }
}

/// Ascending, gap-free cover of `[0, ∞)`.
pub static LIFE_STAGES: [LifeStage; 11] = [
    LifeStage::new("infancy", "Infancy", Some(0)),
    LifeStage::new("toddler", "Toddlerhood", Some(2)),
    LifeStage::new("earlychildhood", "Early Childhood", Some(5)),
    LifeStage::new("middlechildhood", "Middle Childhood", Some(11)),
    LifeStage::new("adolescence", "Adolescence", Some(17)),
    LifeStage::new("youngadult", "Young Adulthood", Some(25)),
    LifeStage::new("adulthood", "Adulthood", Some(39)),
    LifeStage::new("middleadulthood", "Middle Adulthood", Some(59)),
    LifeStage::new("earlysenior", "Early Senior", Some(74)),
    LifeStage::new("midsenior", "Mid-Senior", Some(84)),
    LifeStage::new("latesenior", "Late Senior", None),
];

/// First stage whose bound covers `age`.
pub fn stage_for(age: u32) -> &'static LifeStage {
    LIFE_STAGES
        .iter()
        .find(|stage| stage.contains(age))
        .unwrap_or(&LIFE_STAGES[LIFE_STAGES.len() - 1])
}

pub fn stage_key(age: u32) -> &'static str {
    stage_for(age).key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_ages() {
        assert_eq!(stage_key(0), "infancy");
        assert_eq!(stage_key(1), "toddler");
        assert_eq!(stage_key(3), "earlychildhood");
        assert_eq!(stage_key(11), "middlechildhood");
        assert_eq!(stage_key(12), "adolescence");
        assert_eq!(stage_key(18), "youngadult");
        assert_eq!(stage_key(40), "middleadulthood");
        assert_eq!(stage_key(65), "earlysenior");
        assert_eq!(stage_key(84), "midsenior");
        assert_eq!(stage_key(85), "latesenior");
        assert_eq!(stage_key(90), "latesenior");
        assert_eq!(stage_key(u32::MAX), "latesenior");
    }

    #[test]
    fn stages_are_ascending_and_end_unbounded() {
        let bounds: Vec<u32> = LIFE_STAGES.iter().filter_map(|s| s.max_age).collect();
        assert!(bounds.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(LIFE_STAGES.last().map(|s| s.max_age), Some(None));
    }
}
