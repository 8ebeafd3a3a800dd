//! TOML rule book loader.
//!
//! The rule book holds the data-driven tables the engine dispatches on:
//! goal templates keyed by (module, risk factor) and improvement
//! suggestions. Adding a module or template is a data change, not a code
//! change.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{GoalType, RiskFactor};

/// Rule book compiled into the crate.
pub const BUILTIN_RULES: &str = include_str!("../rules/default.toml");

/// Placeholder replaced with the target module name.
const MODULE_PLACEHOLDER: &str = "{module}";

/// A goal blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTemplate {
    /// Module this template applies to. Required for failing-module templates.
    #[serde(default)]
    pub module: Option<String>,
    /// Only apply when the module's assessment carries this factor.
    #[serde(default)]
    pub factor: Option<RiskFactor>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub goal_type: GoalType,
    /// Days from today until the target completion date.
    pub deadline_days: i64,
    #[serde(default)]
    pub success_criteria: Vec<String>,
}

impl GoalTemplate {
    pub fn title_for(&self, module: &str) -> String {
        self.title.replace(MODULE_PLACEHOLDER, module)
    }

    pub fn description_for(&self, module: &str) -> String {
        self.description.replace(MODULE_PLACEHOLDER, module)
    }

    /// Whether this template applies to a failing module with these factors.
    pub fn applies_to(&self, module: &str, factors: &[RiskFactor]) -> bool {
        let module_matches = self.module.as_deref() == Some(module);
        let factor_matches = self.factor.is_none_or(|f| factors.contains(&f));
        module_matches && factor_matches
    }
}

/// A canned improvement suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    pub area: String,
    pub action: String,
    pub timeline: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// A suggestion and the (module, factor) key it fires on.
///
/// A missing module matches every module; a missing factor fires for every
/// record of the module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRule {
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub factor: Option<RiskFactor>,
    #[serde(flatten)]
    pub suggestion: ImprovementSuggestion,
}

impl SuggestionRule {
    pub fn matches(&self, module: &str, factors: &[RiskFactor]) -> bool {
        let module_matches = self.module.as_deref().is_none_or(|m| m == module);
        let factor_matches = self.factor.is_none_or(|f| factors.contains(&f));
        module_matches && factor_matches
    }
}

/// The full set of dispatch tables.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBook {
    /// High-priority templates for failing modules, in file order.
    pub failing_goals: Vec<GoalTemplate>,
    /// Used for a failing module that no template matches. `None` skips it.
    pub fallback_goal: Option<GoalTemplate>,
    /// Medium-priority goal for each at-risk module.
    pub at_risk_goal: GoalTemplate,
    /// Low-priority goal emitted when overall risk is elevated.
    pub general_goal: GoalTemplate,
    pub suggestions: Vec<SuggestionRule>,
}

impl RuleBook {
    /// Parse the rule book compiled into the crate.
    pub fn builtin() -> Result<Self> {
        parse_rulebook_str(BUILTIN_RULES, Path::new("<builtin>"))
    }

    /// Templates that apply to a failing module, in file order.
    pub fn failing_templates<'a>(
        &'a self,
        module: &'a str,
        factors: &'a [RiskFactor],
    ) -> impl Iterator<Item = &'a GoalTemplate> + 'a {
        self.failing_goals
            .iter()
            .filter(move |t| t.applies_to(module, factors))
    }

    /// Suggestions that fire for a module with these factors, in file order.
    pub fn suggestions_for(&self, module: &str, factors: &[RiskFactor]) -> Vec<ImprovementSuggestion> {
        self.suggestions
            .iter()
            .filter(|rule| rule.matches(module, factors))
            .map(|rule| rule.suggestion.clone())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct TomlRuleBook {
    goals: TomlGoals,
    #[serde(default)]
    suggestions: Vec<SuggestionRule>,
}

#[derive(Debug, Deserialize)]
struct TomlGoals {
    #[serde(default)]
    failing: Vec<GoalTemplate>,
    #[serde(default)]
    fallback: Option<GoalTemplate>,
    at_risk: GoalTemplate,
    general: GoalTemplate,
}

/// Parse a rule book file.
pub fn parse_rulebook(path: &Path) -> Result<RuleBook> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rule book: {}", path.display()))?;

    parse_rulebook_str(&content, path)
}

/// Parse a rule book from a TOML string.
pub fn parse_rulebook_str(content: &str, source_path: &Path) -> Result<RuleBook> {
    let parsed: TomlRuleBook = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    for template in &parsed.goals.failing {
        if template.module.as_deref().is_none_or(|m| m.trim().is_empty()) {
            anyhow::bail!(
                "{}: failing-module template '{}' has no module",
                source_path.display(),
                template.title
            );
        }
    }

    let all_templates = parsed
        .goals
        .failing
        .iter()
        .chain(parsed.goals.fallback.iter())
        .chain([&parsed.goals.at_risk, &parsed.goals.general]);
    for template in all_templates {
        if template.deadline_days <= 0 {
            anyhow::bail!(
                "{}: template '{}' must have a positive deadline_days",
                source_path.display(),
                template.title
            );
        }
    }

    Ok(RuleBook {
        failing_goals: parsed.goals.failing,
        fallback_goal: parsed.goals.fallback,
        at_risk_goal: parsed.goals.at_risk,
        general_goal: parsed.goals.general,
        suggestions: parsed.suggestions,
    })
}

/// Load the rule book at `path`, or the built-in one.
pub fn load_rulebook(path: Option<&Path>) -> Result<RuleBook> {
    match path {
        Some(p) => parse_rulebook(p),
        None => RuleBook::builtin(),
    }
}

/// A warning from rule book validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The template or suggestion the warning is about.
    pub subject: String,
    pub message: String,
}

/// Check a rule book for common authoring mistakes.
pub fn validate_rulebook(book: &RuleBook) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = std::collections::HashSet::new();
    for template in &book.failing_goals {
        let key = (template.module.clone(), template.title.clone());
        if !seen.insert(key) {
            warnings.push(ValidationWarning {
                subject: template.title.clone(),
                message: format!(
                    "duplicate template for module {}",
                    template.module.as_deref().unwrap_or("?")
                ),
            });
        }
    }

    let templates = book
        .failing_goals
        .iter()
        .chain(book.fallback_goal.iter())
        .chain([&book.at_risk_goal, &book.general_goal]);
    for template in templates {
        if template.success_criteria.is_empty() {
            warnings.push(ValidationWarning {
                subject: template.title.clone(),
                message: "template has no success criteria".into(),
            });
        }
    }

    if !book.at_risk_goal.title.contains(MODULE_PLACEHOLDER) {
        warnings.push(ValidationWarning {
            subject: book.at_risk_goal.title.clone(),
            message: "at-risk template title does not mention {module}".into(),
        });
    }

    if book.fallback_goal.is_none() {
        warnings.push(ValidationWarning {
            subject: "goals.fallback".into(),
            message: "no fallback template; failing modules without a template get no goal".into(),
        });
    }

    for rule in &book.suggestions {
        if rule.module.is_none() && rule.factor.is_none() {
            warnings.push(ValidationWarning {
                subject: rule.suggestion.area.clone(),
                message: "suggestion has neither module nor factor and fires for every module"
                    .into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const MINIMAL: &str = r#"
[goals.at_risk]
title = "Strengthen {module} Foundation"
goal_type = "performance_improvement"
deadline_days = 30
success_criteria = ["Attend tutorials"]

[goals.general]
title = "Improve Study Habits"
goal_type = "habit_improvement"
deadline_days = 45
success_criteria = ["Study daily"]
"#;

    #[test]
    fn builtin_rulebook_parses_and_is_clean() {
        let book = RuleBook::builtin().unwrap();
        assert_eq!(book.failing_goals.len(), 3);
        assert!(book.fallback_goal.is_some());
        assert_eq!(book.suggestions.len(), 5);
        assert!(validate_rulebook(&book).is_empty());
    }

    #[test]
    fn failing_templates_match_by_module() {
        let book = RuleBook::builtin().unwrap();
        let titles: Vec<_> = book
            .failing_templates("Database Management", &[])
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["Master SQL Query Writing", "Understand Database Normalization"]
        );
        assert_eq!(book.failing_templates("Computer Networks", &[]).count(), 0);
    }

    #[test]
    fn factor_keyed_template_requires_factor() {
        let toml = format!(
            r#"{MINIMAL}
[[goals.failing]]
module = "Operating System"
factor = "Poor Lab Completion"
title = "Finish OS Labs"
goal_type = "skill_improvement"
deadline_days = 7
success_criteria = ["All labs signed off"]
"#
        );
        let book = parse_rulebook_str(&toml, &PathBuf::from("rules.toml")).unwrap();
        assert_eq!(book.failing_templates("Operating System", &[]).count(), 0);
        assert_eq!(
            book.failing_templates("Operating System", &[RiskFactor::PoorLabCompletion])
                .count(),
            1
        );
    }

    #[test]
    fn suggestion_matching_follows_module_and_factor() {
        let book = RuleBook::builtin().unwrap();
        let areas = |module: &str, factors: &[RiskFactor]| -> Vec<String> {
            book.suggestions_for(module, factors)
                .into_iter()
                .map(|s| s.area)
                .collect()
        };

        assert_eq!(
            areas("Database Management", &[RiskFactor::LowAssessmentScores]),
            vec!["SQL Practice"]
        );
        // The very-low tier is a different factor and has no suggestion.
        assert!(areas("Database Management", &[RiskFactor::VeryLowAssessmentScores]).is_empty());
        assert_eq!(areas("Web Development", &[]), vec!["HTML/CSS/JavaScript"]);
        assert_eq!(
            areas("Computer Networks", &[RiskFactor::PoorAttendance]),
            vec!["Class Attendance"]
        );
    }

    #[test]
    fn template_placeholders_are_rendered() {
        let book = RuleBook::builtin().unwrap();
        assert_eq!(
            book.at_risk_goal.title_for("Operating System"),
            "Strengthen Operating System Foundation"
        );
        assert_eq!(
            book.at_risk_goal.description_for("Operating System"),
            "Improve understanding and performance in Operating System"
        );
    }

    #[test]
    fn failing_template_without_module_is_rejected() {
        let toml = format!(
            r#"{MINIMAL}
[[goals.failing]]
title = "Orphan"
goal_type = "skill_improvement"
deadline_days = 7
"#
        );
        let err = parse_rulebook_str(&toml, &PathBuf::from("rules.toml")).unwrap_err();
        assert!(err.to_string().contains("no module"));
    }

    #[test]
    fn non_positive_deadline_is_rejected() {
        let toml = MINIMAL.replace("deadline_days = 45", "deadline_days = 0");
        assert!(parse_rulebook_str(&toml, &PathBuf::from("rules.toml")).is_err());
    }

    #[test]
    fn unknown_factor_fails_to_parse() {
        let toml = format!(
            r#"{MINIMAL}
[[suggestions]]
factor = "Bad Vibes"
area = "Vibes"
action = "Relax"
timeline = "Now"
"#
        );
        assert!(parse_rulebook_str(&toml, &PathBuf::from("rules.toml")).is_err());
    }

    #[test]
    fn validation_flags_missing_fallback_and_catch_all_suggestion() {
        let toml = format!(
            r#"{MINIMAL}
[[suggestions]]
area = "Everything"
action = "Do it all"
timeline = "Always"
"#
        );
        let book = parse_rulebook_str(&toml, &PathBuf::from("rules.toml")).unwrap();
        let warnings = validate_rulebook(&book);
        assert!(warnings.iter().any(|w| w.message.contains("no fallback")));
        assert!(warnings.iter().any(|w| w.message.contains("every module")));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let book = load_rulebook(Some(&path)).unwrap();
        assert!(book.failing_goals.is_empty());
        assert!(load_rulebook(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
