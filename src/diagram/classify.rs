//! Local archetype heuristic for intents that arrive without a tag.
use super::Archetype;
use super::spec::{DiagramIntent, DiagramSpec};

const CYCLE_WORDS: &[&str] = &["cycle", "loop", "repeat", "circular", "continuous", "iterate", "recurring"];
const PROCESS_WORDS: &[&str] = &["step", "phase", "stage", "then", "next", "after", "before", "workflow", "pipeline"];
const MATRIX_WORDS: &[&str] = &[
    "vs", "versus", "pros", "cons", "strengths", "weaknesses", "opportunities", "threats", "swot", "quadrant",
];
const PYRAMID_WORDS: &[&str] = &["foundation", "layer", "layers", "tier", "apex", "base"];

/// Pick an archetype for `intent`.
///
/// An explicit tag always wins. Otherwise structure decides (overlap flag,
/// levels, then the shape of the edges), and with no structure the labels'
/// vocabulary does.
pub fn classify(intent: &DiagramIntent) -> Archetype {
    classify_with_context(intent, "")
}

/// Like [`classify`], also scanning `context` (typically the slide title).
pub fn classify_with_context(intent: &DiagramIntent, context: &str) -> Archetype {
    if let Some(archetype) = intent.archetype {
        return archetype;
    }
    if intent.overlap {
        return Archetype::Relationship;
    }
    if intent.levels.is_some() {
        return Archetype::Pyramid;
    }
    if !intent.edges.is_empty() {
        return classify_edges(intent);
    }
    classify_vocabulary(intent, context)
}

fn classify_edges(intent: &DiagramIntent) -> Archetype {
    let Ok(edges) = intent.resolve_edges() else {
        return Archetype::List;
    };
    [Archetype::Cycle, Archetype::Process, Archetype::Hierarchy]
        .into_iter()
        .find(|archetype| DiagramSpec::new(*archetype, intent.items.clone(), edges.clone(), None).is_ok())
        .unwrap_or(Archetype::List)
}

fn classify_vocabulary(intent: &DiagramIntent, context: &str) -> Archetype {
    let mut text = context.to_lowercase();
    for item in &intent.items {
        text.push(' ');
        text.push_str(&item.to_lowercase());
    }
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mentions = |vocab: &[&str]| words.iter().any(|w| vocab.contains(w));

    let n = intent.items.len();
    if mentions(CYCLE_WORDS) && n >= 2 {
        Archetype::Cycle
    } else if mentions(MATRIX_WORDS) && n == 4 {
        Archetype::Matrix
    } else if mentions(PROCESS_WORDS) && n >= 2 {
        Archetype::Process
    } else if mentions(PYRAMID_WORDS) && n >= 2 {
        Archetype::Pyramid
    } else {
        Archetype::List
    }
}
