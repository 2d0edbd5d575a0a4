//! Display-category resolution for catalog items.
//!
//! An item's explicit category always wins. Items published without one get
//! a category inferred by keyword matching over their name and description,
//! using a fixed ordered rule table per item kind. Rule order is the
//! tie-break: the first matching rule wins.

use crate::types::{CatalogItem, ItemKind};

/// Label used when no rule matches and the item carries no category.
pub const GENERAL_CATEGORY: &str = "General";

/// `(keyword, label)` pairs, checked in order against the case-folded
/// name + description text.
type CategoryRules = &'static [(&'static str, &'static str)];

const SOLVER_CATEGORY_RULES: CategoryRules = &[
    ("qubo", "QUBO"),
    ("qaoa", "Quantum"),
    ("quantum", "Quantum"),
    ("neal", "QUBO"),
    ("tabu", "Heuristic"),
    ("grasp", "Heuristic"),
    ("heuristic", "Heuristic"),
    ("baseline", "Heuristic"),
    ("highs", "MILP"),
    ("ortools", "MILP"),
    ("scip", "MILP"),
    ("mip", "MILP"),
    ("milp", "MILP"),
    ("qp", "QP"),
];

const PLUGIN_CATEGORY_RULES: CategoryRules = &[
    ("calendar", "Scheduling"),
    ("schedule", "Scheduling"),
    ("planner", "Scheduling"),
    ("planning", "Scheduling"),
    ("timetable", "Scheduling"),
    ("workload", "Scheduling"),
    ("knapsack", "Combinatorial"),
    ("set_cover", "Combinatorial"),
    ("packing", "Combinatorial"),
    ("maxcut", "Graph"),
    ("graph", "Graph"),
    ("portfolio", "Portfolio"),
    ("tsp", "Routing"),
    ("route", "Routing"),
    ("vehicle", "Routing"),
    ("facility", "Routing"),
];

impl ItemKind {
    fn category_rules(&self) -> CategoryRules {
        match self {
            ItemKind::Solver => SOLVER_CATEGORY_RULES,
            ItemKind::DecisionPlugin => PLUGIN_CATEGORY_RULES,
        }
    }
}

/// Display category for an item: its explicit category verbatim when
/// non-blank, otherwise the inferred one.
pub fn resolve_category(kind: ItemKind, item: &CatalogItem) -> String {
    if let Some(explicit) = item
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
    {
        return explicit.to_string();
    }
    infer_category(kind, &item.name, &item.description).to_string()
}

/// First rule label whose keyword occurs in the case-folded name or
/// description; [`GENERAL_CATEGORY`] when none does.
pub fn infer_category(kind: ItemKind, name: &str, description: &str) -> &'static str {
    let haystack = format!("{name} {description}").to_lowercase();
    kind.category_rules()
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map(|(_, label)| *label)
        .unwrap_or(GENERAL_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;

    fn item(name: &str, description: &str, category: Option<&str>) -> CatalogItem {
        CatalogItem {
            id: 1,
            name: name.to_string(),
            version: "0.1.0".to_string(),
            description: description.to_string(),
            category: category.map(str::to_string),
            download_count: 0,
            rating: 0.0,
            owner: User {
                id: 1,
                username: "ada".to_string(),
                avatar_url: String::new(),
            },
        }
    }

    #[test]
    fn explicit_category_wins_verbatim() {
        let item = item("tabu-search", "a qubo solver", Some("My Niche"));
        assert_eq!(resolve_category(ItemKind::Solver, &item), "My Niche");
    }

    #[test]
    fn blank_explicit_category_falls_through_to_inference() {
        let item = item("simulated annealing with neal", "", Some("   "));
        assert_eq!(resolve_category(ItemKind::Solver, &item), "QUBO");
    }

    #[test]
    fn first_rule_in_table_order_wins() {
        // Both "tabu" and "qubo" match; the QUBO rule sits first.
        assert_eq!(
            infer_category(ItemKind::Solver, "tabu search", "warm starts for qubo models"),
            "QUBO"
        );
    }

    #[test]
    fn matching_is_case_folded() {
        assert_eq!(
            infer_category(ItemKind::Solver, "HiGHS frontend", ""),
            "MILP"
        );
    }

    #[test]
    fn plugin_rules_differ_from_solver_rules() {
        assert_eq!(
            infer_category(ItemKind::DecisionPlugin, "nurse timetable", ""),
            "Scheduling"
        );
        assert_eq!(
            infer_category(ItemKind::DecisionPlugin, "maxcut instances", ""),
            "Graph"
        );
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(infer_category(ItemKind::Solver, "mystery", "no keywords"), GENERAL_CATEGORY);
        let item = item("mystery", "no keywords", None);
        assert_eq!(resolve_category(ItemKind::Solver, &item), GENERAL_CATEGORY);
    }

    #[test]
    fn inference_is_deterministic() {
        let first = infer_category(ItemKind::Solver, "grasp heuristic", "baseline");
        for _ in 0..3 {
            assert_eq!(infer_category(ItemKind::Solver, "grasp heuristic", "baseline"), first);
        }
    }
}
