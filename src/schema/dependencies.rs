use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Orders tables by their foreign-key dependencies
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = ALL_TABLES
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// All tables with every FK parent ahead of its children.
    ///
    /// Ties keep registry order, so the result is stable between runs.
    pub fn creation_order(&self) -> Result<Vec<&'static TableSchema>, String> {
        let mut placed: HashSet<&str> = HashSet::new();
        let mut result = Vec::with_capacity(ALL_TABLES.len());
        let mut pending: BTreeSet<usize> = (0..ALL_TABLES.len()).collect();

        while !pending.is_empty() {
            let ready = pending.iter().copied().find(|&idx| {
                let name = ALL_TABLES[idx].name;
                self.deps
                    .get(name)
                    .map(|parents| parents.iter().all(|p| placed.contains(p)))
                    .unwrap_or(true)
            });

            let Some(idx) = ready else {
                let stuck: Vec<_> = pending.iter().map(|&i| ALL_TABLES[i].name).collect();
                return Err(format!("Circular dependency among: {}", stuck.join(", ")));
            };

            pending.remove(&idx);
            placed.insert(ALL_TABLES[idx].name);
            result.push(ALL_TABLES[idx]);
        }

        Ok(result)
    }

    /// Children before parents: the reverse of [`creation_order`](Self::creation_order)
    pub fn drop_order(&self) -> Result<Vec<&'static TableSchema>, String> {
        let mut tables = self.creation_order()?;
        tables.reverse();
        Ok(tables)
    }

    /// Tables that reference `name` through a foreign key
    pub fn dependents(&self, name: &str) -> Result<Vec<&'static str>, String> {
        if get_table(name).is_none() {
            return Err(format!("Unknown table: {}", name));
        }

        Ok(ALL_TABLES
            .iter()
            .filter(|t| self.deps.get(t.name).is_some_and(|d| d.contains(name)))
            .map(|t| t.name)
            .collect())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}
