//! Resource recommendations for a goal list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{Goal, LearningResource, ResourceType, GENERAL_MODULE};
use crate::traits::ResourceCatalog;

/// Upper bound on resources per category.
pub const MAX_PER_CATEGORY: usize = 5;

/// Catalog resources grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecommendations {
    pub books: Vec<LearningResource>,
    pub online_courses: Vec<LearningResource>,
    pub practice_platforms: Vec<LearningResource>,
    pub video_tutorials: Vec<LearningResource>,
}

impl ResourceRecommendations {
    fn category_mut(&mut self, kind: ResourceType) -> &mut Vec<LearningResource> {
        match kind {
            ResourceType::Book => &mut self.books,
            ResourceType::Online => &mut self.online_courses,
            ResourceType::Practice => &mut self.practice_platforms,
            ResourceType::Video => &mut self.video_tutorials,
        }
    }

    /// Categories with their display names, in a fixed order.
    pub fn categories(&self) -> [(&'static str, &[LearningResource]); 4] {
        [
            ("Books", self.books.as_slice()),
            ("Online Courses", self.online_courses.as_slice()),
            ("Practice Platforms", self.practice_platforms.as_slice()),
            ("Video Tutorials", self.video_tutorials.as_slice()),
        ]
    }

    pub fn total(&self) -> usize {
        self.categories().iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Looks goal modules up in a catalog.
pub struct ResourceRecommender<'a> {
    catalog: &'a dyn ResourceCatalog,
}

impl<'a> ResourceRecommender<'a> {
    pub fn new(catalog: &'a dyn ResourceCatalog) -> Self {
        Self { catalog }
    }

    /// Categorized resources for the modules the goals target.
    ///
    /// Modules are visited in order of first appearance. A module the
    /// catalog does not know contributes nothing.
    pub fn recommend(&self, goals: &[Goal]) -> Result<ResourceRecommendations, EngineError> {
        let mut seen = HashSet::new();
        let modules = goals
            .iter()
            .map(|goal| goal.module_name.as_str())
            .filter(|module| *module != GENERAL_MODULE)
            .filter(|module| seen.insert(*module));

        let mut recommendations = ResourceRecommendations::default();
        for module in modules {
            let mut resources = self
                .catalog
                .resources_for_module(module)
                .map_err(|e| EngineError::Catalog(format!("{module}: {e:#}")))?;
            rank(&mut resources);

            tracing::debug!(module, found = resources.len(), "catalog lookup");

            for resource in resources {
                recommendations
                    .category_mut(resource.resource_type)
                    .push(resource);
            }
        }

        for kind in [
            ResourceType::Book,
            ResourceType::Online,
            ResourceType::Practice,
            ResourceType::Video,
        ] {
            recommendations.category_mut(kind).truncate(MAX_PER_CATEGORY);
        }

        Ok(recommendations)
    }
}

/// Rating descending, then difficulty ascending. Stable.
fn rank(resources: &mut [LearningResource]) {
    resources.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then(a.difficulty_level.cmp(&b.difficulty_level))
    });
}

/// A catalog held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    resources: Vec<LearningResource>,
}

impl InMemoryCatalog {
    pub fn new(resources: Vec<LearningResource>) -> Self {
        Self { resources }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn resources(&self) -> &[LearningResource] {
        &self.resources
    }

    /// Distinct module names, in insertion order.
    pub fn modules(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.resources
            .iter()
            .map(|r| r.module_name.as_str())
            .filter(|m| seen.insert(*m))
            .collect()
    }
}

impl ResourceCatalog for InMemoryCatalog {
    fn resources_for_module(&self, module: &str) -> anyhow::Result<Vec<LearningResource>> {
        Ok(self
            .resources
            .iter()
            .filter(|r| r.module_name == module)
            .cloned()
            .collect())
    }
}
