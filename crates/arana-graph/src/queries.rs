//! Read-only skill search over the connection graph.

use std::collections::BTreeMap;

use arana_core::{Attributes, EdgeKind, NodeKind};
use serde::Serialize;

use crate::store::{ConnectionGraph, NodeRecord};

/// Everything a caller needs to display the Persons holding a skill.
///
/// All maps are keyed by label, so iteration is in ascending label order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillSearchResult {
    /// Matching Person label → full node attributes.
    pub matches: BTreeMap<String, Attributes>,
    /// Matching Person label → destination label → full edge attributes.
    pub neighbors: BTreeMap<String, BTreeMap<String, Attributes>>,
    /// One classified row per match, ordered by label.
    pub summaries: Vec<PersonSummary>,
}

impl SkillSearchResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// A matched Person with their neighbors grouped by relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonSummary {
    pub name: String,
    pub role: String,
    /// `BASEDIN` destinations.
    pub locations: Vec<String>,
    /// `ASSOCWITH` destinations.
    pub organizations: Vec<String>,
    /// `ONACCOUNT` destinations.
    pub accounts: Vec<String>,
    pub skills: String,
}

impl ConnectionGraph {
    /// Find every Person whose `skills` contains `skill` as a whole token.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace, but never
    /// matches substrings: `"python"` finds `"Python,Rust"`, not `"CPython"`.
    pub fn search_for_person_with_skill(&self, skill: &str) -> SkillSearchResult {
        let mut result = SkillSearchResult::default();

        for (label, node) in self.nodes() {
            if !person_has_skill(node, skill) {
                continue;
            }

            let mut summary = PersonSummary {
                name: label.clone(),
                role: node.get_str("role").unwrap_or_default().to_string(),
                skills: node.get_str("skills").unwrap_or_default().to_string(),
                ..PersonSummary::default()
            };

            let mut edges = BTreeMap::new();
            for (destination, edge) in self.outgoing(label) {
                let bucket = match edge.kind() {
                    EdgeKind::BasedIn => &mut summary.locations,
                    EdgeKind::AssocWith => &mut summary.organizations,
                    EdgeKind::OnAccount => &mut summary.accounts,
                };
                bucket.push(destination.to_string());
                edges.insert(destination.to_string(), edge.attributes());
            }

            result.matches.insert(label.clone(), node.attributes(label));
            result.neighbors.insert(label.clone(), edges);
            result.summaries.push(summary);
        }

        tracing::debug!(skill = %skill, matches = result.len(), "Skill search complete");
        result
    }
}

/// Whether `skills` (comma-delimited) contains `skill` as a token.
pub fn has_skill_token(skills: &str, skill: &str) -> bool {
    let wanted = skill.trim().to_lowercase();
    if wanted.is_empty() {
        return false;
    }
    skills
        .split(',')
        .any(|token| token.trim().to_lowercase() == wanted)
}

fn person_has_skill(node: &NodeRecord, skill: &str) -> bool {
    node.kind() == NodeKind::Person
        && node
            .get_str("skills")
            .is_some_and(|skills| has_skill_token(skills, skill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::Person;
    use arana_core::AttrValue;

    fn sample_graph() -> ConnectionGraph {
        let mut graph = ConnectionGraph::new();
        graph.add_person(
            &Person::new("John Doe")
                .role("engineer")
                .place("New York")
                .org("Company")
                .skills("Python,Rust"),
        );
        graph.add_person(&Person::new("Ada").place("London").skills("rust, ocaml"));
        graph.add_person(&Person::new("Carl").skills("CPython"));
        graph.add_person(&Person::new("Dee"));
        graph
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let graph = sample_graph();
        let result = graph.search_for_person_with_skill("python");

        assert!(result.matches.contains_key("John Doe"));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_search_never_matches_substrings() {
        let graph = sample_graph();
        let result = graph.search_for_person_with_skill("Python");
        assert!(!result.matches.contains_key("Carl"));

        let result = graph.search_for_person_with_skill("Pyth");
        assert!(result.is_empty());
    }

    #[test]
    fn test_search_trims_query_and_tokens() {
        let graph = sample_graph();
        let result = graph.search_for_person_with_skill("  OCaml ");
        assert_eq!(result.matches.keys().collect::<Vec<_>>(), vec!["Ada"]);
    }

    #[test]
    fn test_results_sorted_by_label() {
        let graph = sample_graph();
        let result = graph.search_for_person_with_skill("RUST");

        let names: Vec<&str> = result.summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "John Doe"]);
        assert_eq!(
            result.matches.keys().collect::<Vec<_>>(),
            vec!["Ada", "John Doe"]
        );
    }

    #[test]
    fn test_empty_skills_and_empty_query_never_match() {
        let graph = sample_graph();
        assert!(graph.search_for_person_with_skill("").is_empty());
        assert!(graph.search_for_person_with_skill("   ").is_empty());
    }

    #[test]
    fn test_only_person_nodes_match() {
        let mut graph = ConnectionGraph::new();
        let mut attrs = Attributes::new();
        attrs.insert("skills".to_string(), AttrValue::from("Python"));
        graph.insert_node("Snake Corp", NodeKind::Organization, attrs);

        assert!(graph.search_for_person_with_skill("python").is_empty());
    }

    #[test]
    fn test_neighbor_context_is_classified() {
        let mut graph = sample_graph();
        graph.add_person_account_edge("John Doe", "@jdoe");
        graph.add_person_org_edge("John Doe", "Side Project");

        let result = graph.search_for_person_with_skill("python");
        let neighbors = &result.neighbors["John Doe"];
        assert_eq!(neighbors.len(), 4);
        assert_eq!(
            neighbors["New York"].get("kind"),
            Some(&AttrValue::from("BASEDIN"))
        );

        let summary = &result.summaries[0];
        assert_eq!(summary.role, "engineer");
        assert_eq!(summary.skills, "Python,Rust");
        assert_eq!(summary.locations, vec!["New York"]);
        assert_eq!(summary.organizations, vec!["Company", "Side Project"]);
        assert_eq!(summary.accounts, vec!["@jdoe"]);
    }

    #[test]
    fn test_match_carries_full_attributes() {
        let graph = sample_graph();
        let result = graph.search_for_person_with_skill("rust");

        let ada = &result.matches["Ada"];
        assert_eq!(ada.get("kind"), Some(&AttrValue::from("PERSON")));
        assert_eq!(ada.get("size"), Some(&AttrValue::Double(10.0)));
    }

    #[test]
    fn test_result_serializes_for_display() {
        let graph = sample_graph();
        let result = graph.search_for_person_with_skill("python");

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["summaries"][0]["name"], "John Doe");
        assert_eq!(value["summaries"][0]["locations"][0], "New York");
        assert_eq!(value["matches"]["John Doe"]["r"], 217);
    }

    #[test]
    fn test_has_skill_token() {
        assert!(has_skill_token("Python,Rust", "rust"));
        assert!(has_skill_token("Python, Rust", "Rust"));
        assert!(!has_skill_token("", "rust"));
        assert!(!has_skill_token("Rusty", "rust"));
    }
}
