use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::schema::SchemaGraph;

/// Tables required for a run plus a referentially safe insertion order.
///
/// Computed fresh per generation request and immutable once produced.
#[derive(Debug, Clone)]
pub struct DependencyClosure {
    /// Every table that must contain rows (lowercased names).
    pub tables: BTreeSet<String>,
    /// Parents-first permutation of `tables`, up to ignored cycle edges.
    pub insertion_order: Vec<String>,
    /// Tables on at least one FK cycle; their back edges were ignored.
    pub cycle_members: Vec<String>,
}

/// Compute closure and insertion order in one step.
pub fn resolve(seeds: &[String], graph: &SchemaGraph) -> DependencyClosure {
    let tables = resolve_closure(seeds, graph);
    let (insertion_order, cycle_members) = order_with_cycles(&tables, graph);
    DependencyClosure {
        tables,
        insertion_order,
        cycle_members,
    }
}

/// Breadth-first transitive closure of FK-referenced tables from `seeds`.
///
/// Seeds are always included, even when absent from the graph. A foreign key
/// referencing a table the graph does not know is ignored.
pub fn resolve_closure(seeds: &[String], graph: &SchemaGraph) -> BTreeSet<String> {
    let mut closure: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    for seed in seeds {
        let key = seed.trim().to_lowercase();
        if !key.is_empty() && closure.insert(key.clone()) {
            queue.push_back(key);
        }
    }

    while let Some(current) = queue.pop_front() {
        let Some(table) = graph.table(&current) else {
            continue;
        };
        for fk in &table.foreign_keys {
            let referenced = fk.referenced_table.to_lowercase();
            if !graph.contains(&referenced) {
                continue;
            }
            if closure.insert(referenced.clone()) {
                queue.push_back(referenced);
            }
        }
    }

    closure
}

/// Parents-first order over `required` via cycle-tolerant depth-first visit.
pub fn insertion_order(required: &BTreeSet<String>, graph: &SchemaGraph) -> Vec<String> {
    order_with_cycles(required, graph).0
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

fn order_with_cycles(
    required: &BTreeSet<String>,
    graph: &SchemaGraph,
) -> (Vec<String>, Vec<String>) {
    let mut marks: HashMap<String, Mark> = HashMap::new();
    let mut order = Vec::with_capacity(required.len());
    let mut cycles: BTreeSet<String> = BTreeSet::new();

    for table in required {
        visit(table, required, graph, &mut marks, &mut order, &mut cycles);
    }

    (order, cycles.into_iter().collect())
}

fn visit(
    table: &str,
    required: &BTreeSet<String>,
    graph: &SchemaGraph,
    marks: &mut HashMap<String, Mark>,
    order: &mut Vec<String>,
    cycles: &mut BTreeSet<String>,
) {
    match marks.get(table) {
        Some(Mark::Done) => return,
        // Back edge into a table still on the visit stack: cycle member.
        // The edge is dropped for ordering purposes, never fatal.
        Some(Mark::InProgress) => {
            cycles.insert(table.to_string());
            return;
        }
        None => {}
    }

    marks.insert(table.to_string(), Mark::InProgress);

    if let Some(schema) = graph.table(table) {
        for fk in &schema.foreign_keys {
            let referenced = fk.referenced_table.to_lowercase();
            if required.contains(&referenced) {
                visit(&referenced, required, graph, marks, order, cycles);
            }
        }
    }

    marks.insert(table.to_string(), Mark::Done);
    order.push(table.to_string());
}
