use foundation::color::Rgb;
use serde::{Deserialize, Serialize};

/// The fixed set of page sections whose hover state tints the scene.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    About,
    Experience,
    Projects,
    Skills,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::About,
        Section::Experience,
        Section::Projects,
        Section::Skills,
        Section::Contact,
    ];

    /// DOM element id of the section.
    pub fn id(self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Skills => "skills",
            Section::Contact => "contact",
        }
    }
}

/// Per-section particle tints plus the tint used when nothing is hovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionTints {
    pub default: Rgb,
    pub about: Rgb,
    pub experience: Rgb,
    pub projects: Rgb,
    pub skills: Rgb,
    pub contact: Rgb,
}

impl Default for SectionTints {
    fn default() -> Self {
        Self {
            default: Rgb::new(0.60, 0.80, 1.00),
            about: Rgb::new(0.40, 0.70, 1.00),
            experience: Rgb::new(0.55, 0.45, 1.00),
            projects: Rgb::new(1.00, 0.55, 0.25),
            skills: Rgb::new(0.35, 0.95, 0.65),
            contact: Rgb::new(1.00, 0.40, 0.65),
        }
    }
}

impl SectionTints {
    pub fn for_section(&self, section: Section) -> Rgb {
        match section {
            Section::About => self.about,
            Section::Experience => self.experience,
            Section::Projects => self.projects,
            Section::Skills => self.skills,
            Section::Contact => self.contact,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Rgb)> + '_ {
        std::iter::once(("default", self.default))
            .chain(Section::ALL.into_iter().map(|s| (s.id(), self.for_section(s))))
    }
}

#[cfg(test)]
mod tests {
    use super::{Section, SectionTints};

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = Section::ALL.into_iter().map(Section::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Section::ALL.len());
    }

    #[test]
    fn default_tints_are_distinct_and_normalized() {
        let tints = SectionTints::default();
        let all: Vec<_> = tints.iter().collect();
        assert_eq!(all.len(), 6);
        for (i, (_, a)) in all.iter().enumerate() {
            assert!(a.is_normalized());
            for (_, b) in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
