//! Fixed catalog of profile attributes.
//!
//! Two core keys are always offered and can only be overwritten. Extension
//! keys are optional and removable. Anything outside the catalog is rejected.

/// Per-user cap on distinct attribute keys, core keys included.
pub const MAX_ATTRIBUTES_PER_USER: usize = 15;

pub const HOBBIES: &str = "hobbies";
pub const ASPIRATIONS: &str = "aspirations";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDef {
    pub key: &'static str,
    pub label: &'static str,
    pub is_core: bool,
}

const fn core(key: &'static str, label: &'static str) -> AttributeDef {
    AttributeDef {
        key,
        label,
        is_core: true,
    }
}

const fn extension(key: &'static str, label: &'static str) -> AttributeDef {
    AttributeDef {
        key,
        label,
        is_core: false,
    }
}

pub const CATALOG: &[AttributeDef] = &[
    core(HOBBIES, "some of my hobbies"),
    core(ASPIRATIONS, "what I want to do when I grow up"),
    extension("research_interests", "research interests"),
    extension("clubs", "clubs"),
    extension("projects", "projects"),
    extension("publications", "publications"),
    extension("skills", "skills"),
    extension("courses", "courses"),
    extension("languages", "languages"),
    extension("sports", "sports"),
    extension("music", "music"),
    extension("books", "books"),
    extension("travel", "travel"),
    extension("startups", "startups"),
    extension("volunteering", "volunteering"),
    extension("internships", "internships"),
    extension("teaching", "teaching"),
    extension("art", "art"),
    extension("gaming", "gaming"),
    extension("cooking", "cooking"),
];

pub fn lookup(key: &str) -> Option<&'static AttributeDef> {
    CATALOG.iter().find(|def| def.key == key)
}

pub fn is_core(key: &str) -> bool {
    lookup(key).is_some_and(|def| def.is_core)
}
