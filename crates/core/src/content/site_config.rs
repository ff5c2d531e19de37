//! The singleton site configuration: every piece of non-blog content.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::post::Locale;

/// Allowed range of [`Skill::level`].
pub const SKILL_LEVELS: RangeInclusive<u8> = 1..=10;

/// A string in both site languages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Localized {
    pub ja: String,
    pub en: String,
}

impl Localized {
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ja => &self.ja,
            Locale::En => &self.en,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub hero: Hero,
    pub about: About,
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub greeting: Localized,
    pub name: Localized,
    pub title: String,
    pub subtitle: Localized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub description: Localized,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Webapp,
    Desktop,
    Extension,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub id: String,
    pub title: Localized,
    pub description: Localized,
    #[serde(default)]
    pub tech: Vec<String>,
    pub category: ProjectCategory,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub demo: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub copyright: Localized,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_config() -> SiteConfig {
        serde_json::from_value(json!({
            "hero": {
                "greeting": { "ja": "こんにちは", "en": "Hello" },
                "name": { "ja": "山田", "en": "Yamada" },
                "title": "Developer",
                "subtitle": { "ja": "作ります", "en": "I build things" }
            },
            "about": {
                "description": { "ja": "説明", "en": "About me" },
                "skills": [{ "name": "Rust", "level": 8 }, { "name": "TypeScript", "level": 9 }]
            },
            "projects": [{
                "id": "devcheck",
                "title": { "ja": "DevCheck", "en": "DevCheck" },
                "description": { "ja": "開発検証", "en": "Dev checks" },
                "tech": ["Electron", "React"],
                "category": "desktop",
                "github": "https://github.com/example/DevCheck",
                "demo": "",
                "featured": true
            }],
            "footer": { "copyright": { "ja": "© 山田", "en": "© Yamada" } }
        }))
        .unwrap()
    }

    #[test]
    fn localized_picks_language() {
        let config = sample_config();
        assert_eq!(config.hero.greeting.get(Locale::En), "Hello");
        assert_eq!(config.hero.greeting.get(Locale::Ja), "こんにちは");
    }

    #[test]
    fn optional_project_links_default_to_empty() {
        let project: ProjectConfig = serde_json::from_value(json!({
            "id": "x",
            "title": { "ja": "", "en": "" },
            "description": { "ja": "", "en": "" },
            "category": "extension"
        }))
        .unwrap();
        assert_eq!(project.github, "");
        assert_eq!(project.demo, "");
        assert!(!project.featured);
        assert_eq!(project.category, ProjectCategory::Extension);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let result: Result<ProjectCategory, _> = serde_json::from_value(json!("mobile"));
        assert!(result.is_err());
    }
}
