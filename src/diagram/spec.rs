//! Diagram intent (as supplied) and validated diagram specs.
use serde::Deserialize;

use super::Archetype;
use crate::error::DiagramSpecError;

/// Hard cap on pyramid levels.
pub const MAX_PYRAMID_LEVELS: usize = 8;

/// Edge between two labelled items, as supplied by the content producer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntentEdge {
    pub from: String,
    pub to: String,
}

impl IntentEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Diagram request before validation.
///
/// `archetype` is optional: without it the local heuristic in
/// [`classify`](super::classify) picks one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagramIntent {
    pub archetype: Option<Archetype>,
    pub items: Vec<String>,
    pub edges: Vec<IntentEdge>,
    /// Pyramid level per item, foundation first.
    pub levels: Option<Vec<u32>>,
    /// Edges are undirected overlaps rather than flow.
    pub overlap: bool,
}

impl DiagramIntent {
    pub fn new<I, S>(archetype: Archetype, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            archetype: Some(archetype),
            ..Self::untagged(items)
        }
    }

    /// Intent with no archetype tag.
    pub fn untagged<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push(IntentEdge::new(from, to));
        self
    }

    pub fn with_levels(mut self, levels: Vec<u32>) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn with_overlap(mut self) -> Self {
        self.overlap = true;
        self
    }

    /// Resolve labelled edges to item indices. The first item with a label wins.
    pub fn resolve_edges(&self) -> Result<Vec<Edge>, DiagramSpecError> {
        let index_of = |label: &str| {
            self.items
                .iter()
                .position(|item| item == label)
                .ok_or_else(|| DiagramSpecError::UnknownLabel(label.to_string()))
        };
        self.edges
            .iter()
            .map(|e| Ok(Edge::new(index_of(&e.from)?, index_of(&e.to)?)))
            .collect()
    }
}

/// Directed edge between item indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

impl Edge {
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// Validated diagram content. Immutable once built.
///
/// Process and cycle specs are normalised to their flow order: `items()` is
/// the sequence to draw and `edges()` links consecutive items.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSpec {
    archetype: Archetype,
    items: Vec<String>,
    edges: Vec<Edge>,
    levels: Option<Vec<u32>>,
}

impl DiagramSpec {
    pub fn new(
        archetype: Archetype,
        items: Vec<String>,
        edges: Vec<Edge>,
        levels: Option<Vec<u32>>,
    ) -> Result<Self, DiagramSpecError> {
        let n = items.len();
        if n == 0 && archetype != Archetype::List {
            return Err(DiagramSpecError::Empty { archetype });
        }
        for e in &edges {
            if e.from >= n || e.to >= n {
                return Err(DiagramSpecError::EdgeOutOfRange {
                    from: e.from,
                    to: e.to,
                    len: n,
                });
            }
        }

        match archetype {
            Archetype::List | Archetype::Relationship => Ok(Self {
                archetype,
                items,
                edges,
                levels: None,
            }),
            Archetype::Matrix => {
                if n != 4 {
                    return Err(DiagramSpecError::ItemCount {
                        archetype,
                        expected: 4,
                        got: n,
                    });
                }
                Ok(Self {
                    archetype,
                    items,
                    edges: Vec::new(),
                    levels: None,
                })
            },
            Archetype::Hierarchy => {
                check_forest(n, &edges)?;
                Ok(Self {
                    archetype,
                    items,
                    edges,
                    levels: None,
                })
            },
            Archetype::Process => {
                let order = if edges.is_empty() {
                    (0..n).collect()
                } else {
                    chain_order(n, &edges)?
                };
                let items = reorder(items, &order);
                let edges = (1..n).map(|i| Edge::new(i - 1, i)).collect();
                Ok(Self {
                    archetype,
                    items,
                    edges,
                    levels: None,
                })
            },
            Archetype::Cycle => {
                if n < 2 {
                    return Err(DiagramSpecError::ItemCount {
                        archetype,
                        expected: 2,
                        got: n,
                    });
                }
                let order = if edges.is_empty() {
                    (0..n).collect()
                } else {
                    loop_order(n, &edges)?
                };
                let items = reorder(items, &order);
                let edges = (0..n).map(|i| Edge::new(i, (i + 1) % n)).collect();
                Ok(Self {
                    archetype,
                    items,
                    edges,
                    levels: None,
                })
            },
            Archetype::Pyramid => {
                let levels = dense_levels(n, levels)?;
                let count = levels.last().map(|l| *l as usize + 1).unwrap_or(0);
                if count > MAX_PYRAMID_LEVELS {
                    return Err(DiagramSpecError::TooManyLevels {
                        archetype,
                        max: MAX_PYRAMID_LEVELS,
                        got: count,
                    });
                }
                Ok(Self {
                    archetype,
                    items,
                    edges: Vec::new(),
                    levels: Some(levels),
                })
            },
        }
    }

    /// Build a spec from an intent under an already chosen archetype.
    pub fn from_intent(intent: &DiagramIntent, archetype: Archetype) -> Result<Self, DiagramSpecError> {
        let edges = intent.resolve_edges()?;
        Self::new(archetype, intent.items.clone(), edges, intent.levels.clone())
    }

    /// List spec; never fails.
    pub fn list(items: Vec<String>) -> Self {
        Self {
            archetype: Archetype::List,
            items,
            edges: Vec::new(),
            levels: None,
        }
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Dense pyramid level per item (0 = foundation).
    pub fn levels(&self) -> Option<&[u32]> {
        self.levels.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn reorder(items: Vec<String>, order: &[usize]) -> Vec<String> {
    let mut slots: Vec<Option<String>> = items.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}

/// At most one parent per node and no cycles.
fn check_forest(n: usize, edges: &[Edge]) -> Result<(), DiagramSpecError> {
    let mut parent = vec![None; n];
    for e in edges {
        if e.from == e.to {
            return Err(DiagramSpecError::UnexpectedCycle {
                archetype: Archetype::Hierarchy,
            });
        }
        if parent[e.to].replace(e.from).is_some() {
            return Err(DiagramSpecError::MultipleParents(e.to));
        }
    }
    for start in 0..n {
        let mut steps = 0;
        let mut cursor = parent[start];
        while let Some(p) = cursor {
            steps += 1;
            if p == start || steps > n {
                return Err(DiagramSpecError::UnexpectedCycle {
                    archetype: Archetype::Hierarchy,
                });
            }
            cursor = parent[p];
        }
    }
    Ok(())
}

/// Successor table when every node has at most one outgoing and one
/// incoming edge.
fn successors(n: usize, edges: &[Edge], archetype: Archetype, expected: &'static str) -> Result<Vec<Option<usize>>, DiagramSpecError> {
    let mut next = vec![None; n];
    let mut has_pred = vec![false; n];
    for e in edges {
        if next[e.from].replace(e.to).is_some() || std::mem::replace(&mut has_pred[e.to], true) {
            return Err(DiagramSpecError::Shape { archetype, expected });
        }
    }
    Ok(next)
}

fn chain_order(n: usize, edges: &[Edge]) -> Result<Vec<usize>, DiagramSpecError> {
    const EXPECTED: &str = "a single chain through every item";
    let archetype = Archetype::Process;
    if edges.len() != n - 1 {
        return Err(DiagramSpecError::Shape { archetype, expected: EXPECTED });
    }
    let next = successors(n, edges, archetype, EXPECTED)?;
    let mut has_pred = vec![false; n];
    for e in edges {
        has_pred[e.to] = true;
    }
    let Some(start) = (0..n).find(|i| !has_pred[*i]) else {
        return Err(DiagramSpecError::UnexpectedCycle { archetype });
    };

    let mut order = Vec::with_capacity(n);
    let mut cursor = Some(start);
    while let Some(i) = cursor {
        if order.len() == n {
            return Err(DiagramSpecError::UnexpectedCycle { archetype });
        }
        order.push(i);
        cursor = next[i];
    }
    if order.len() != n {
        return Err(DiagramSpecError::Shape { archetype, expected: EXPECTED });
    }
    Ok(order)
}

fn loop_order(n: usize, edges: &[Edge]) -> Result<Vec<usize>, DiagramSpecError> {
    const EXPECTED: &str = "a single loop through every item";
    let archetype = Archetype::Cycle;
    if edges.len() != n {
        return Err(DiagramSpecError::Shape { archetype, expected: EXPECTED });
    }
    let next = successors(n, edges, archetype, EXPECTED)?;

    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    let mut cursor = 0;
    loop {
        visited[cursor] = true;
        order.push(cursor);
        match next[cursor] {
            Some(0) if order.len() == n => return Ok(order),
            Some(nxt) if nxt != 0 && !visited[nxt] => cursor = nxt,
            _ => return Err(DiagramSpecError::Shape { archetype, expected: EXPECTED }),
        }
    }
}

/// Map caller levels onto `0..L` preserving order; default is one level per item.
fn dense_levels(n: usize, levels: Option<Vec<u32>>) -> Result<Vec<u32>, DiagramSpecError> {
    let Some(levels) = levels else {
        return Ok((0..n as u32).collect());
    };
    if levels.len() != n || levels.windows(2).any(|w| w[1] < w[0]) {
        return Err(DiagramSpecError::InvalidLevels);
    }
    let mut dense = Vec::with_capacity(n);
    let mut rank = 0u32;
    for (i, level) in levels.iter().enumerate() {
        if i > 0 && *level != levels[i - 1] {
            rank += 1;
        }
        dense.push(rank);
    }
    Ok(dense)
}
