//! Person-centric relationship builders.
//!
//! Each builder expresses one domain relationship as a single call, creating
//! the destination node first when it is missing. Duplicates only warn, so a
//! multi-step [`ConnectionGraph::add_person`] always runs to completion.

use arana_core::{AttrValue, Attributes, EdgeKind, NodeKind};
use serde::{Deserialize, Serialize};

use crate::store::ConnectionGraph;

/// A person and the associations to record for them.
///
/// Empty `place`, `org` and `account` fields are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub account: String,
    /// Comma-delimited skill tokens.
    #[serde(default)]
    pub skills: String,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn place(mut self, place: impl Into<String>) -> Self {
        self.place = place.into();
        self
    }

    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.org = org.into();
        self
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    pub fn skills(mut self, skills: impl Into<String>) -> Self {
        self.skills = skills.into();
        self
    }
}

impl ConnectionGraph {
    /// Create or overwrite a Person node, then link it to each non-empty
    /// place, organization and account.
    pub fn add_person(&mut self, person: &Person) {
        let name = person.name.as_str();
        if self.contains_node(name) {
            tracing::warn!(label = %name, "Person already exists in the graph");
        }

        let mut attrs = Attributes::new();
        attrs.insert("skills".to_string(), AttrValue::from(person.skills.as_str()));
        attrs.insert("role".to_string(), AttrValue::from(person.role.as_str()));
        if !self.insert_node(name, NodeKind::Person, attrs) {
            // Empty name: no person node, so no edges either.
            return;
        }

        if !person.place.is_empty() {
            self.add_person_place_edge(name, &person.place);
        }
        if !person.org.is_empty() {
            self.add_person_org_edge(name, &person.org);
        }
        if !person.account.is_empty() {
            self.add_person_account_edge(name, &person.account);
        }
    }

    /// Link `name` to an Organization with an `ASSOCWITH` edge.
    pub fn add_person_org_edge(&mut self, name: &str, org: &str) {
        self.link_person(name, org, EdgeKind::AssocWith);
    }

    /// Link `name` to a Place with a `BASEDIN` edge.
    pub fn add_person_place_edge(&mut self, name: &str, place: &str) {
        self.link_person(name, place, EdgeKind::BasedIn);
    }

    /// Link `name` to an Account with an `ONACCOUNT` edge.
    pub fn add_person_account_edge(&mut self, name: &str, account: &str) {
        self.link_person(name, account, EdgeKind::OnAccount);
    }

    // `name` is assumed to be a Person; it is not checked.
    fn link_person(&mut self, name: &str, destination: &str, kind: EdgeKind) {
        if !self.contains_node(destination)
            && !self.insert_node(destination, kind.destination_kind(), Attributes::new())
        {
            tracing::error!(origin = %name, kind = %kind, "No destination node, skipping edge");
            return;
        }
        if self.contains_edge(name, destination) {
            tracing::warn!(
                origin = %name,
                destination = %destination,
                "Edge already exists in the graph"
            );
        }
        self.insert_edge(name, destination, kind, Attributes::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john_doe() -> Person {
        Person::new("John Doe")
            .place("New York")
            .org("Acme")
            .account("j@x.com")
            .skills("Python,Rust")
    }

    #[test]
    fn test_add_person_creates_destinations_and_edges() {
        let mut graph = ConnectionGraph::new();
        graph.add_person(&john_doe());

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.node("John Doe").unwrap().kind(), NodeKind::Person);
        assert_eq!(graph.node("New York").unwrap().kind(), NodeKind::Place);
        assert_eq!(graph.node("Acme").unwrap().kind(), NodeKind::Organization);
        assert_eq!(graph.node("j@x.com").unwrap().kind(), NodeKind::Account);

        assert_eq!(
            graph.edge("John Doe", "New York").unwrap().kind(),
            EdgeKind::BasedIn
        );
        assert_eq!(
            graph.edge("John Doe", "Acme").unwrap().kind(),
            EdgeKind::AssocWith
        );
        assert_eq!(
            graph.edge("John Doe", "j@x.com").unwrap().kind(),
            EdgeKind::OnAccount
        );
    }

    #[test]
    fn test_add_person_stores_skills_and_role() {
        let mut graph = ConnectionGraph::new();
        graph.add_person(&Person::new("Ana").role("analyst").skills("SQL"));

        let node = graph.node("Ana").unwrap();
        assert_eq!(node.get_str("skills"), Some("SQL"));
        assert_eq!(node.get_str("role"), Some("analyst"));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_empty_fields_record_empty_strings() {
        let mut graph = ConnectionGraph::new();
        graph.add_person(&Person::new("Bo"));

        let node = graph.node("Bo").unwrap();
        assert_eq!(node.get_str("skills"), Some(""));
        assert_eq!(node.get_str("role"), Some(""));
    }

    #[test]
    fn test_existing_destination_is_reused() {
        let mut graph = ConnectionGraph::new();
        let mut extra = Attributes::new();
        extra.insert("country".to_string(), AttrValue::from("US"));
        graph.insert_node("New York", NodeKind::Place, extra);

        graph.add_person_place_edge("Ana", "New York");

        let place = graph.node("New York").unwrap();
        assert_eq!(place.get_str("country"), Some("US"));
        assert!(graph.contains_edge("Ana", "New York"));
    }

    #[test]
    fn test_readding_person_overwrites_without_duplicating() {
        let mut graph = ConnectionGraph::new();
        graph.add_person(&john_doe());
        graph.add_person(&john_doe().role("lead").skills("Go"));

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        let node = graph.node("John Doe").unwrap();
        assert_eq!(node.get_str("skills"), Some("Go"));
        assert_eq!(node.get_str("role"), Some("lead"));
    }

    #[test]
    fn test_nameless_person_adds_nothing() {
        let mut graph = ConnectionGraph::new();
        graph.add_person(&Person::new("").place("Lima").org("Acme"));

        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_empty_destination_adds_no_edge() {
        let mut graph = ConnectionGraph::new();
        graph.add_person(&Person::new("Ana"));

        graph.add_person_place_edge("Ana", "");
        graph.add_person_org_edge("Ana", "");

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_destination_kind_is_not_checked() {
        let mut graph = ConnectionGraph::new();
        graph.insert_node("Paris", NodeKind::Organization, Attributes::new());

        graph.add_person_place_edge("Ana", "Paris");

        assert_eq!(graph.node("Paris").unwrap().kind(), NodeKind::Organization);
        assert_eq!(graph.edge("Ana", "Paris").unwrap().kind(), EdgeKind::BasedIn);
    }
}
