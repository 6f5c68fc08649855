use section_lib::SceneGroup;
use serde_json::{json, Value};

/// Slot, solid and bounds summary of a compiled scene
pub fn inspect_scene(scene: &SceneGroup) -> Value {
    let layers: Vec<Value> = scene
        .slots
        .iter()
        .map(|slot| {
            json!({
                "index": slot.index,
                "name": slot.name,
                "start": slot.start,
                "end": slot.end(),
                "thickness": slot.thickness,
                "solids": scene.layer(slot.index).map_or(0, |v| v.solid_count()),
            })
        })
        .collect();

    let bounding_box = scene
        .bounds()
        .map(|(min, max)| json!({ "min": min.to_array(), "max": max.to_array() }));

    json!({
        "layers": layers,
        "solids": scene.solid_count(),
        "span": scene.span,
        "bounding_box": bounding_box,
        "warnings": scene.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
    })
}
