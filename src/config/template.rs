//! Configuration presets used by `class-slim init`

use super::file::ConfigFile;

/// Preset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    /// Only consolidate patterns that are safe under hydration
    Conservative,
    /// Default thresholds
    Balanced,
    /// Consolidate everything that repeats
    Aggressive,
}

impl TemplateType {
    /// Preset name as used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Conservative => "conservative",
            TemplateType::Balanced => "balanced",
            TemplateType::Aggressive => "aggressive",
        }
    }
}

/// A named configuration preset
#[derive(Debug, Clone)]
pub struct Template {
    /// Preset name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Preset kind
    pub template_type: TemplateType,
}

impl Template {
    /// Create a preset of the given type
    pub fn new(template_type: TemplateType) -> Self {
        let description = match template_type {
            TemplateType::Conservative => {
                "Requires server and client agreement, skips safelisted and dynamic groups"
            }
            TemplateType::Balanced => "Default thresholds suitable for most static builds",
            TemplateType::Aggressive => {
                "Consolidates every repeated group, even when the rule costs more than it saves"
            }
        };
        Self {
            name: template_type.as_str().to_string(),
            description: description.to_string(),
            template_type,
        }
    }

    /// Look up a preset by name
    pub fn get(name: &str) -> Option<Self> {
        let template_type = match name {
            "conservative" => TemplateType::Conservative,
            "balanced" => TemplateType::Balanced,
            "aggressive" => TemplateType::Aggressive,
            _ => return None,
        };
        Some(Self::new(template_type))
    }

    /// Names of all presets
    pub fn names() -> Vec<&'static str> {
        vec!["conservative", "balanced", "aggressive"]
    }

    /// Materialize the preset as a configuration file
    pub fn to_config(&self) -> ConfigFile {
        let mut config = ConfigFile {
            template: self.name.clone(),
            ..ConfigFile::default()
        };
        match self.template_type {
            TemplateType::Conservative => {
                config.thresholds.min_occurrences = 3;
                config.safety.consistency_safe = true;
                config.safety.reject_safelisted = true;
                config.safety.exclude_dynamic_overlap = true;
            }
            TemplateType::Balanced => {}
            TemplateType::Aggressive => {
                config.thresholds.min_savings = 0;
                config.thresholds.force = true;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_named_templates_resolve() {
        for name in Template::names() {
            let template = Template::get(name).unwrap();
            assert_eq!(template.name, name);
            assert_eq!(template.to_config().template, name);
        }
        assert!(Template::get("turbo").is_none());
    }

    #[test]
    fn test_balanced_template_matches_defaults() {
        let config = Template::new(TemplateType::Balanced).to_config();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_conservative_template_enables_guards() {
        let config = Template::new(TemplateType::Conservative).to_config();
        assert!(config.safety.consistency_safe);
        assert!(config.safety.reject_safelisted);
        assert_eq!(config.thresholds.min_occurrences, 3);
    }

    #[test]
    fn test_aggressive_template_forces_inclusion() {
        let config = Template::new(TemplateType::Aggressive).to_config();
        assert!(config.thresholds.force);
        assert_eq!(config.thresholds.min_savings, 0);
    }
}
