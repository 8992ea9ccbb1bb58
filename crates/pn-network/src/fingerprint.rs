//! Structural fingerprints of propulsor assemblies.

use crate::error::NetworkResult;
use pn_assembly::{PropulsorAssembly, PropulsorVariant};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

#[derive(Serialize)]
struct Structure<'a> {
    variant: &'a PropulsorVariant,
    thrust_axis: [f64; 3],
}

/// Stage names label a stage, they do not shape it.
fn strip_names(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("name");
            map.values_mut().for_each(strip_names);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_names),
        _ => {}
    }
}

/// SHA-256 over the design parameters and thrust axis of an assembly.
///
/// Tag, origin and the identical/active flags do not contribute, so
/// propulsors that differ only in placement share a fingerprint.
pub fn structural_fingerprint(assembly: &PropulsorAssembly) -> NetworkResult<String> {
    let axis = assembly.thrust_axis();
    let mut value = serde_json::to_value(Structure {
        variant: assembly.variant(),
        thrust_axis: [axis.x, axis.y, axis.z],
    })?;
    strip_names(&mut value);

    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_string(&value)?.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
