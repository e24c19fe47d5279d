use std::collections::{HashMap, HashSet};

use crate::menu::model::MenuItem;

/// Arena of menu items with a parent to children index.
///
/// Only items reachable from a root take part in the tree; items whose
/// parent is missing (or that sit on a parent cycle) are reported by
/// [`MenuTree::orphans`] and never rendered.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    items: HashMap<String, MenuItem>,
    by_menu_id: HashMap<i32, String>,
    roots: Vec<String>,
    children: HashMap<String, Vec<String>>,
    orphans: Vec<String>,
}

fn sort_siblings(identifiers: &mut [String], items: &HashMap<String, MenuItem>) {
    identifiers.sort_by(|a, b| {
        let order_a = items.get(a).map(|item| item.order).unwrap_or_default();
        let order_b = items.get(b).map(|item| item.order).unwrap_or_default();
        order_a.cmp(&order_b).then_with(|| a.cmp(b))
    });
}

impl MenuTree {
    pub fn build(records: Vec<MenuItem>) -> Self {
        let mut items: HashMap<String, MenuItem> = HashMap::new();
        let mut by_menu_id: HashMap<i32, String> = HashMap::new();

        for item in records {
            if items.contains_key(&item.identifier) {
                log::warn!("Duplicate menu identifier '{}', keeping the first record", item.identifier);
                continue;
            }
            if item.menu_id != 0 {
                by_menu_id.entry(item.menu_id).or_insert_with(|| item.identifier.clone());
            }
            items.insert(item.identifier.clone(), item);
        }

        let mut roots = Vec::new();
        let mut pending: HashMap<String, Vec<String>> = HashMap::new();
        for (identifier, item) in &items {
            match item.parent() {
                None => roots.push(identifier.clone()),
                Some(parent_id) => {
                    if let Some(parent) = by_menu_id.get(&parent_id) {
                        pending.entry(parent.clone()).or_default().push(identifier.clone());
                    }
                }
            }
        }
        sort_siblings(&mut roots, &items);

        // Keep only what is reachable from the roots
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut reachable: HashSet<String> = HashSet::new();
        let mut stack: Vec<String> = roots.clone();
        while let Some(identifier) = stack.pop() {
            if !reachable.insert(identifier.clone()) {
                continue;
            }
            if let Some(mut kids) = pending.remove(&identifier) {
                sort_siblings(&mut kids, &items);
                stack.extend(kids.iter().cloned());
                children.insert(identifier, kids);
            }
        }

        let mut orphans: Vec<String> = items
            .keys()
            .filter(|identifier| !reachable.contains(*identifier))
            .cloned()
            .collect();
        orphans.sort();
        for orphan in &orphans {
            log::warn!("Menu item '{}' has no reachable parent and is hidden", orphan);
        }

        Self {
            items,
            by_menu_id,
            roots,
            children,
            orphans,
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&MenuItem> {
        self.items.get(identifier)
    }

    pub fn get_by_menu_id(&self, menu_id: i32) -> Option<&MenuItem> {
        self.by_menu_id.get(&menu_id).and_then(|identifier| self.items.get(identifier))
    }

    /// Root identifiers in render order
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Child identifiers in render order
    pub fn children(&self, identifier: &str) -> &[String] {
        self.children.get(identifier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    /// Whether the item is part of the rendered tree
    pub fn is_reachable(&self, identifier: &str) -> bool {
        self.items.contains_key(identifier) && !self.orphans.iter().any(|o| o == identifier)
    }

    /// Depth-first walk in render order, yielding `(depth, item)`
    pub fn walk(&self) -> Vec<(usize, &MenuItem)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, &String)> = self.roots.iter().rev().map(|id| (0, id)).collect();
        while let Some((depth, identifier)) = stack.pop() {
            if let Some(item) = self.items.get(identifier) {
                out.push((depth, item));
            }
            for child in self.children(identifier).iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
