//! Resource catalogs and the module directory.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use eduboost_core::model::{LearningResource, ModuleInfo, ModuleLevel, ResourceType};
use eduboost_core::resources::InMemoryCatalog;

/// Every module the programme offers: (name, code, description, level).
const MODULES: &[(&str, &str, &str, ModuleLevel)] = &[
    (
        "Introduction to Computer Science",
        "CS101",
        "Fundamental concepts of computer science and programming",
        ModuleLevel::Foundational,
    ),
    (
        "Mathematics for Computing",
        "MATH101",
        "Mathematical foundations for computer science",
        ModuleLevel::Foundational,
    ),
    (
        "Programming Fundamentals",
        "CS102",
        "Basic programming concepts and problem-solving",
        ModuleLevel::Foundational,
    ),
    (
        "Object Oriented Programming",
        "CS201",
        "Object-oriented design and programming principles",
        ModuleLevel::Intermediate,
    ),
    (
        "Computer Networks",
        "CS301",
        "Network protocols, architecture, and communication",
        ModuleLevel::Intermediate,
    ),
    (
        "Operating System",
        "CS302",
        "Operating system concepts and system programming",
        ModuleLevel::Intermediate,
    ),
    (
        "Introduction to Machine Learning",
        "CS401",
        "Machine learning algorithms and applications",
        ModuleLevel::Advanced,
    ),
    (
        "Web Development",
        "CS303",
        "Web technologies and full-stack development",
        ModuleLevel::Intermediate,
    ),
    (
        "Electronics and Computer System Architecture",
        "EE201",
        "Digital systems and computer architecture",
        ModuleLevel::Intermediate,
    ),
    (
        "Database Management",
        "CS304",
        "Database design, SQL, and database management systems",
        ModuleLevel::Intermediate,
    ),
];

/// Modules past this index only get the generic course and textbook.
const CURATED_MODULES: usize = 2;

/// The module directory, in programme order.
pub fn builtin_modules() -> Vec<ModuleInfo> {
    MODULES
        .iter()
        .map(|(name, code, description, level)| ModuleInfo {
            module_name: name.to_string(),
            module_code: code.to_string(),
            description: description.to_string(),
            level: *level,
        })
        .collect()
}

/// Look a module up by name or code, ignoring case.
pub fn find_module(query: &str) -> Option<ModuleInfo> {
    builtin_modules().into_iter().find(|m| {
        m.module_name.eq_ignore_ascii_case(query) || m.module_code.eq_ignore_ascii_case(query)
    })
}

#[allow(clippy::too_many_arguments)]
fn resource(
    module: &str,
    kind: ResourceType,
    title: &str,
    url: &str,
    author: &str,
    difficulty: u8,
    tags: &[&str],
    rating: f64,
    hours: u32,
    description: &str,
    is_free: bool,
) -> LearningResource {
    LearningResource {
        module_name: module.to_string(),
        resource_type: kind,
        title: title.to_string(),
        url: url.to_string(),
        author: author.to_string(),
        difficulty_level: difficulty,
        topic_tags: tags.iter().map(|t| t.to_string()).collect(),
        rating,
        estimated_hours: hours,
        description: description.to_string(),
        is_free,
    }
}

/// The seed catalog: curated entries for Database Management and
/// Programming Fundamentals, plus a generic course and textbook for every
/// module from Programming Fundamentals on.
pub fn builtin_catalog() -> InMemoryCatalog {
    let db = "Database Management";
    let pf = "Programming Fundamentals";

    let mut resources = vec![
        resource(
            db,
            ResourceType::Online,
            "W3Schools SQL Tutorial",
            "https://www.w3schools.com/sql/",
            "W3Schools",
            1,
            &["SQL", "Queries", "Database Design"],
            4.5,
            10,
            "Comprehensive SQL tutorial with interactive examples",
            true,
        ),
        resource(
            db,
            ResourceType::Book,
            "Database System Concepts",
            "https://www.db-book.com/",
            "Silberschatz, Korth, Sudarshan",
            3,
            &["Database Theory", "SQL", "Normalization"],
            4.7,
            40,
            "Comprehensive database textbook covering all concepts",
            false,
        ),
        resource(
            db,
            ResourceType::Practice,
            "SQLBolt Interactive Lessons",
            "https://sqlbolt.com/",
            "SQLBolt",
            2,
            &["SQL Practice", "Queries"],
            4.6,
            8,
            "Interactive SQL practice with step-by-step lessons",
            true,
        ),
        resource(
            pf,
            ResourceType::Online,
            "Codecademy Python Course",
            "https://www.codecademy.com/learn/learn-python-3",
            "Codecademy",
            1,
            &["Python", "Programming Basics", "Syntax"],
            4.4,
            25,
            "Interactive Python programming course for beginners",
            false,
        ),
        resource(
            pf,
            ResourceType::Practice,
            "HackerRank Python Domain",
            "https://www.hackerrank.com/domains/python",
            "HackerRank",
            2,
            &["Python Practice", "Problem Solving"],
            4.3,
            20,
            "Programming practice problems and challenges",
            true,
        ),
    ];

    for &(module, ..) in &MODULES[CURATED_MODULES..] {
        let slug = module.to_lowercase().replace(' ', "-");
        let first_word = module.split_whitespace().next().unwrap_or(module);

        resources.push(resource(
            module,
            ResourceType::Online,
            &format!("{module} - Online Course"),
            &format!("https://example.com/{slug}"),
            "EduBoost",
            2,
            &[first_word, "Fundamentals"],
            4.2,
            15,
            &format!("Comprehensive {module} course with practical examples"),
            true,
        ));
        resources.push(resource(
            module,
            ResourceType::Book,
            &format!("{module} Textbook"),
            &format!("https://example.com/books/{slug}"),
            "Academic Publisher",
            3,
            &[first_word, "Theory"],
            4.1,
            30,
            &format!("Academic textbook for {module}"),
            false,
        ));
    }

    InMemoryCatalog::new(resources)
}

#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    resources: Vec<LearningResource>,
}

/// Parse a catalog from a TOML string of `[[resources]]` entries.
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<InMemoryCatalog> {
    let parsed: TomlCatalog = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    for (i, r) in parsed.resources.iter().enumerate() {
        if r.module_name.trim().is_empty() || r.title.trim().is_empty() {
            anyhow::bail!(
                "{}: resource #{} needs a module_name and a title",
                source_path.display(),
                i + 1
            );
        }
        if !(1..=5).contains(&r.difficulty_level) {
            anyhow::bail!(
                "{}: resource '{}' has difficulty {} outside 1..=5",
                source_path.display(),
                r.title,
                r.difficulty_level
            );
        }
        if !(0.0..=5.0).contains(&r.rating) {
            anyhow::bail!(
                "{}: resource '{}' has rating {} outside 0..=5",
                source_path.display(),
                r.title,
                r.rating
            );
        }
    }

    Ok(InMemoryCatalog::new(parsed.resources))
}

/// Load a catalog file, or the built-in catalog when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<InMemoryCatalog> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read catalog: {}", p.display()))?;
            parse_catalog_str(&content, p)
        }
        None => Ok(builtin_catalog()),
    }
}

/// Catalog modules that are missing from the module directory.
pub fn unknown_catalog_modules(catalog: &InMemoryCatalog) -> Vec<String> {
    let known: BTreeSet<String> = builtin_modules().into_iter().map(|m| m.module_name).collect();
    catalog
        .modules()
        .into_iter()
        .filter(|m| !known.contains(*m))
        .map(str::to_string)
        .collect()
}
