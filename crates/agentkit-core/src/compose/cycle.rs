use crate::catalog::CapabilityCatalog;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Find cycles among `required_dependencies` edges restricted to `scope`.
///
/// Three-color depth-first search. Roots are taken from `scope` in sorted
/// order and edges in declaration order; each back-edge yields one cycle,
/// the DFS stack from the back-edge target to the top. Optional and
/// suggested dependencies are not edges of this graph.
pub fn find_cycles(catalog: &CapabilityCatalog, scope: &BTreeSet<String>) -> Vec<Vec<String>> {
    let mut dfs = Dfs {
        catalog,
        scope,
        marks: HashMap::new(),
        stack: Vec::new(),
        cycles: Vec::new(),
    };
    for id in scope {
        if dfs.mark(id) == Mark::White {
            dfs.visit(id);
        }
    }
    if !dfs.cycles.is_empty() {
        tracing::debug!(count = dfs.cycles.len(), "required-dependency cycles found");
    }
    dfs.cycles
}

/// [`find_cycles`] over every id in the catalog.
pub fn find_catalog_cycles(catalog: &CapabilityCatalog) -> Vec<Vec<String>> {
    let scope: BTreeSet<String> = catalog.ids().map(str::to_string).collect();
    find_cycles(catalog, &scope)
}

struct Dfs<'a> {
    catalog: &'a CapabilityCatalog,
    scope: &'a BTreeSet<String>,
    marks: HashMap<&'a str, Mark>,
    stack: Vec<&'a str>,
    cycles: Vec<Vec<String>>,
}

impl<'a> Dfs<'a> {
    fn mark(&self, id: &str) -> Mark {
        self.marks.get(id).copied().unwrap_or(Mark::White)
    }

    fn visit(&mut self, id: &'a str) {
        self.marks.insert(id, Mark::Gray);
        self.stack.push(id);

        let catalog = self.catalog;
        if let Some(record) = catalog.get(id) {
            for dep in &record.required_dependencies {
                let dep = dep.as_str();
                if !self.scope.contains(dep) {
                    continue;
                }
                match self.mark(dep) {
                    Mark::White => self.visit(dep),
                    Mark::Gray => {
                        // Gray nodes are exactly the ones on the stack.
                        if let Some(start) = self.stack.iter().rposition(|s| *s == dep) {
                            let cycle = self.stack[start..].iter().map(|s| s.to_string()).collect();
                            self.cycles.push(cycle);
                        }
                    }
                    Mark::Black => {}
                }
            }
        }

        self.stack.pop();
        self.marks.insert(id, Mark::Black);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
