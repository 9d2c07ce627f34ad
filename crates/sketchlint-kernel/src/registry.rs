//! Canonical rule catalog.
//!
//! The registry is assembled once at startup through `RegistryBuilder`, which
//! rejects duplicate rule ids, and is read-only afterwards. Iteration order is
//! always rule-id order, so every downstream consumer sees rules in the same
//! sequence.

use crate::error::KernelError;
use crate::project::ProjectType;
use crate::rule::{RuleDescriptor, RuleId};
use crate::severity::SeverityLevels;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub const REGISTRY_KIND: &str = "sketchlint.rule_registry.v1";

/// Collects descriptors and checks id uniqueness.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    rules: BTreeMap<RuleId, RuleDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one descriptor; a second descriptor with the same id is rejected.
    pub fn register(&mut self, descriptor: RuleDescriptor) -> Result<&mut Self, KernelError> {
        if self.rules.contains_key(descriptor.id()) {
            return Err(KernelError::DuplicateRuleId(descriptor.id().clone()));
        }
        self.rules.insert(descriptor.id().clone(), descriptor);
        Ok(self)
    }

    pub fn build(self) -> RuleRegistry {
        RuleRegistry { rules: self.rules }
    }
}

/// Immutable catalog of rule descriptors.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<RuleId, RuleDescriptor>,
}

impl RuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Build a registry from a descriptor list, failing on the first duplicate id.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = RuleDescriptor>,
    ) -> Result<Self, KernelError> {
        let mut builder = RegistryBuilder::new();
        for descriptor in descriptors {
            builder.register(descriptor)?;
        }
        Ok(builder.build())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &RuleId) -> Option<&RuleDescriptor> {
        self.rules.get(id)
    }

    pub fn contains(&self, id: &RuleId) -> bool {
        self.rules.contains_key(id)
    }

    /// All descriptors in rule-id order.
    pub fn rules(&self) -> impl Iterator<Item = &RuleDescriptor> {
        self.rules.values()
    }

    /// Descriptors whose applicability admits `project_type`, in rule-id order.
    pub fn applicable_rules(&self, project_type: ProjectType) -> Vec<&RuleDescriptor> {
        self.rules
            .values()
            .filter(|descriptor| descriptor.applies_to(project_type))
            .collect()
    }

    pub fn listing(&self) -> Vec<RuleListing> {
        self.rules
            .values()
            .map(|descriptor| RuleListing {
                id: descriptor.id().clone(),
                category: descriptor.category().to_string(),
                brief: descriptor.brief().to_string(),
                applies_to: descriptor.applicability().project_types(),
                levels: descriptor.levels(),
            })
            .collect()
    }

    pub fn registry_json(&self) -> Value {
        json!({
            "schema": 1,
            "registryKind": REGISTRY_KIND,
            "rules": self.listing(),
        })
    }
}

/// Serializable summary of one descriptor.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RuleListing {
    pub id: RuleId,
    pub category: String,
    pub brief: String,
    pub applies_to: Vec<ProjectType>,
    pub levels: SeverityLevels,
}
