use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{info, warn};

/// Primary skill → related skills commonly listed alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillsMap(BTreeMap<String, Vec<String>>);

impl SkillsMap {
    /// Loads the map from a JSON object file; falls back to the built-in map
    /// when the file is missing, empty, or invalid.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                info!("Skills map {} not found, using default", path.display());
                return Self::default();
            }
        };
        if content.trim().is_empty() {
            warn!("Skills map {} is empty, using default", path.display());
            return Self::default();
        }
        match serde_json::from_str(&content) {
            Ok(map) => Self(map),
            Err(e) => {
                warn!("Skills map {} is invalid ({e}), using default", path.display());
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Related skills for every primary skill (case-insensitive key match),
    /// merged with `secondary`, deduplicated and sorted.
    pub fn expand(&self, primary: &[String], secondary: &[String]) -> Vec<String> {
        let mut expanded: BTreeSet<String> = secondary.iter().cloned().collect();
        for skill in primary {
            let related = self.0.get(skill.as_str()).or_else(|| {
                self.0
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(skill.trim()))
                    .map(|(_, related)| related)
            });
            if let Some(related) = related {
                expanded.extend(related.iter().cloned());
            }
        }
        expanded.into_iter().collect()
    }
}

impl Default for SkillsMap {
    fn default() -> Self {
        let entries: [(&str, &[&str]); 19] = [
            ("Docker", &["Kubernetes", "AWS ECS", "Containerization", "Docker Compose", "CI/CD"]),
            ("Python", &["Django", "Flask", "FastAPI", "NumPy", "Pandas", "Data Science"]),
            ("JavaScript", &["React", "Node.js", "TypeScript", "Vue.js", "Angular"]),
            ("Recruitment", &["Talent Acquisition", "Interviewing", "Onboarding", "ATS", "Sourcing"]),
            ("Marketing", &["SEO", "Content Strategy", "Campaign Management", "Google Analytics", "Social Media"]),
            ("Finance", &["Budgeting", "Forecasting", "Financial Modelling", "Excel", "Accounting"]),
            ("SQL", &["Database Design", "PostgreSQL", "MySQL", "Data Analysis", "Query Optimization"]),
            ("Project Management", &["Agile", "Scrum", "JIRA", "Stakeholder Management", "Risk Management"]),
            ("Sales", &["CRM", "Lead Generation", "Negotiation", "Account Management", "Pipeline Management"]),
            ("HR", &["Employee Relations", "Performance Management", "HRMS", "Compliance", "Training"]),
            ("Java", &["Spring Boot", "Hibernate", "Maven", "JUnit", "Microservices"]),
            ("AWS", &["EC2", "S3", "Lambda", "CloudFormation", "RDS"]),
            ("Data Analysis", &["Excel", "Tableau", "Power BI", "Statistics", "SQL"]),
            ("Content Writing", &["Copywriting", "SEO Writing", "Editing", "Blogging", "Content Strategy"]),
            ("Customer Service", &["Communication", "Problem Solving", "CRM", "Ticketing Systems", "Customer Support"]),
            ("Machine Learning", &["TensorFlow", "PyTorch", "Scikit-learn", "Deep Learning", "NLP"]),
            ("DevOps", &["Jenkins", "Docker", "Kubernetes", "Terraform", "Monitoring"]),
            ("UI/UX", &["Figma", "Adobe XD", "Wireframing", "Prototyping", "User Research"]),
            ("Product Management", &["Roadmap Planning", "User Stories", "Product Strategy", "Analytics", "Stakeholder Management"]),
        ];

        Self(
            entries
                .into_iter()
                .map(|(key, related)| {
                    (key.to_string(), related.iter().map(|s| s.to_string()).collect())
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_expand_matches_keys_case_insensitively() {
        let map = SkillsMap::default();
        let expanded = map.expand(&skills(&["aws"]), &[]);
        assert_eq!(expanded, vec!["CloudFormation", "EC2", "Lambda", "RDS", "S3"]);
    }

    #[test]
    fn test_expand_merges_and_dedupes_secondary() {
        let map = SkillsMap::default();
        let expanded = map.expand(&skills(&["SQL", "Data Analysis"]), &skills(&["Excel"]));
        assert_eq!(expanded.iter().filter(|s| *s == "Excel").count(), 1);
        assert!(expanded.contains(&"PostgreSQL".to_string()));
        assert!(expanded.contains(&"Tableau".to_string()));
    }

    #[test]
    fn test_unknown_skill_adds_nothing() {
        let map = SkillsMap::default();
        assert!(map.expand(&skills(&["Underwater Basket Weaving"]), &[]).is_empty());
    }

    #[test]
    fn test_load_reads_custom_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills_map.json");
        std::fs::write(&path, r#"{"Rust": ["Tokio", "Serde"]}"#).unwrap();

        let map = SkillsMap::load(&path);
        assert_eq!(map.expand(&skills(&["rust"]), &[]), vec!["Serde", "Tokio"]);
    }

    #[test]
    fn test_load_falls_back_on_missing_empty_or_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(SkillsMap::load(&dir.path().join("absent.json")), SkillsMap::default());

        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "  ").unwrap();
        assert_eq!(SkillsMap::load(&empty), SkillsMap::default());

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, "{not json").unwrap();
        assert_eq!(SkillsMap::load(&invalid), SkillsMap::default());
    }
}
