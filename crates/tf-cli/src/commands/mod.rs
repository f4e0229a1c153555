pub mod arena;
pub mod check;
pub mod chess;
pub mod raycast;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use tf_sim::Definitions;

/// Load definitions from a JSON file, or the built-in set when no path
/// is given.
fn load_definitions(path: Option<&Path>) -> Result<Arc<Definitions>, String> {
    let defs = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            Definitions::from_json_str(&json)
                .map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => Definitions::builtin().map_err(|e| format!("built-in definitions: {e}"))?,
    };
    Ok(Arc::new(defs))
}

/// Parse "X,Y,Z" into a vector.
fn parse_vec3(text: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected X,Y,Z but got '{text}'"));
    };
    let component = |value: &str| {
        value
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("'{value}' is not a number in '{text}'"))
    };
    Ok(Vec3::new(component(x)?, component(y)?, component(z)?))
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
