//! Palette slot assignment for diagram nodes and connectors.
use super::Archetype;
use super::geometry::{GeometryPlan, PlanNode};
use crate::design::color::hue_distance;
use crate::design::{ColorPalette, PaletteSlot, RgbColor, contrast_ratio, readable_text_color};

const ALTERNATING: [PaletteSlot; 2] = [PaletteSlot::Accent, PaletteSlot::GradientStart];
const ROTATING: [PaletteSlot; 3] = [
    PaletteSlot::Accent,
    PaletteSlot::GradientStart,
    PaletteSlot::GradientEnd,
];

/// Saturation below which a color reads as neutral.
const CHROMATIC_SATURATION: f64 = 0.2;
const HUE_CLASH_DEGREES: f64 = 30.0;
const MIN_CONNECTOR_CONTRAST: f64 = 1.5;

/// Fill slot for node `index` of `count` in a diagram of `archetype`.
pub fn node_fill(archetype: Archetype, index: usize, count: usize, level: u32) -> PaletteSlot {
    match archetype {
        Archetype::Hierarchy => ROTATING[level as usize % ROTATING.len()],
        Archetype::Relationship => ROTATING[index % ROTATING.len()],
        Archetype::Matrix => ALTERNATING[(index / 2 + index % 2) % 2],
        Archetype::Cycle if count > 1 && count % 2 == 1 && index == count - 1 => PaletteSlot::GradientEnd,
        Archetype::List | Archetype::Process | Archetype::Cycle | Archetype::Pyramid => {
            ALTERNATING[index % ALTERNATING.len()]
        },
    }
}

/// Connector slot given the fills of the nodes it touches.
pub fn connector_color<I>(palette: &ColorPalette, touching: I) -> PaletteSlot
where
    I: IntoIterator<Item = PaletteSlot>,
{
    let secondary = palette.secondary();
    if contrast_ratio(secondary, palette.background()) < MIN_CONNECTOR_CONTRAST {
        return PaletteSlot::TextSecondary;
    }
    let hsl = secondary.to_hsl();
    if hsl.s >= CHROMATIC_SATURATION {
        let clashes = touching
            .into_iter()
            .any(|slot| hue_distance(hsl.h, palette.slot(slot).to_hsl().h) < HUE_CLASH_DEGREES);
        if clashes {
            return PaletteSlot::TextSecondary;
        }
    }
    PaletteSlot::Secondary
}

/// Label color for a node: black or white, whichever reads better on its fill.
pub fn node_text_color(palette: &ColorPalette, node: &PlanNode) -> RgbColor {
    readable_text_color(palette.slot(node.fill))
}

/// Assign node fills and connector colors in place.
pub(crate) fn apply(plan: &mut GeometryPlan, palette: &ColorPalette) {
    let count = plan.nodes.len();
    let archetype = plan.archetype;
    for (i, node) in plan.nodes.iter_mut().enumerate() {
        node.fill = node_fill(archetype, i, count, node.level);
    }
    let nodes = &plan.nodes;
    for connector in &mut plan.connectors {
        let touching = connector
            .nodes
            .into_iter()
            .flat_map(|(a, b)| [a, b])
            .filter_map(|i| nodes.get(i).map(|n| n.fill));
        connector.color = connector_color(palette, touching);
    }
}
