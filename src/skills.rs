//! The skill service the effects read from. Skills and experience are owned
//! by the host's leveling system; this crate only looks them up.

use std::collections::HashMap;
use std::sync::Arc;

pub type SkillId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillInfo {
    /// Display name, shown as the indicator label.
    pub name: String,
    /// Display color of the name, used for celebrations.
    pub color: Color,
}

/// A player's standing in one skill before an experience change is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SkillProgress {
    pub level: u32,
    pub experience: i64,
}

pub trait SkillService: Send + Sync {
    fn skill(&self, id: &str) -> Option<SkillInfo>;

    /// Experience needed to complete `level`.
    fn level_experience(&self, level: u32) -> i64;

    fn contains(&self, id: &str) -> bool {
        self.skill(id).is_some()
    }
}

impl<T: SkillService + ?Sized> SkillService for Arc<T> {
    fn skill(&self, id: &str) -> Option<SkillInfo> {
        (**self).skill(id)
    }

    fn level_experience(&self, level: u32) -> i64 {
        (**self).level_experience(level)
    }

    fn contains(&self, id: &str) -> bool {
        (**self).contains(id)
    }
}

/// A fixed set of skills on a linear level curve: completing `level` takes
/// `base + step * level` experience.
pub struct SkillCatalog {
    skills: HashMap<SkillId, SkillInfo>,
    base: i64,
    step: i64,
}

impl SkillCatalog {
    pub fn new(base: i64, step: i64) -> Self {
        Self {
            skills: HashMap::new(),
            base,
            step,
        }
    }

    pub fn with_skill(mut self, id: &str, name: &str, color: Color) -> Self {
        self.skills.insert(
            id.to_string(),
            SkillInfo {
                name: name.to_string(),
                color,
            },
        );
        self
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::new(100, 20)
            .with_skill("mining", "Mining", Color::rgb(0x55, 0x55, 0x55))
            .with_skill("woodcutting", "Woodcutting", Color::rgb(0x00, 0xAA, 0x00))
            .with_skill("fishing", "Fishing", Color::rgb(0x55, 0x55, 0xFF))
            .with_skill("excavation", "Excavation", Color::rgb(0xFF, 0xAA, 0x00))
            .with_skill("combat", "Combat", Color::rgb(0xAA, 0x00, 0x00))
    }
}

impl SkillService for SkillCatalog {
    fn skill(&self, id: &str) -> Option<SkillInfo> {
        self.skills.get(id).cloned()
    }

    fn level_experience(&self, level: u32) -> i64 {
        self.base.saturating_add(self.step.saturating_mul(level as i64))
    }

    fn contains(&self, id: &str) -> bool {
        self.skills.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_curve_is_linear() {
        let catalog = SkillCatalog::new(20, 20);
        assert_eq!(catalog.level_experience(0), 20);
        assert_eq!(catalog.level_experience(4), 100);
        assert_eq!(catalog.level_experience(5), 120);
    }

    #[test]
    fn catalog_resolves_known_skills_only() {
        let catalog = SkillCatalog::default();
        assert_eq!(catalog.skill("mining").unwrap().name, "Mining");
        assert!(catalog.skill("alchemy").is_none());
        assert!(catalog.contains("mining"));
        assert!(!catalog.contains("alchemy"));

        let shared: Arc<dyn SkillService> = Arc::new(catalog);
        assert!(shared.skill("fishing").is_some());
        assert!(shared.contains("fishing"));
    }
}
