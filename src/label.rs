use serde_json::Value;

use crate::error::LabelError;

/// Pick the single classification label for a frame.
///
/// The first tuple holding at least one value wins and its leading value becomes
/// the label; every later tuple in the frame is ignored. Returns `Ok(None)` when
/// the frame has no non-empty tuple.
pub fn extract_frame_label(frame_annotations: &Value) -> Result<Option<String>, LabelError> {
    let tuples = frame_annotations
        .as_array()
        .ok_or_else(|| LabelError::NotAList(frame_annotations.clone()))?;

    for tuple in tuples {
        let values = tuple
            .as_array()
            .ok_or_else(|| LabelError::TupleNotAList(tuple.clone()))?;
        if let Some(first) = values.first() {
            return class_id(first).map(|id| Some(id.to_string()));
        }
    }

    Ok(None)
}

// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive
fn float_to_i64(f: f64) -> Option<i64> {
    let f = f.trunc();
    (f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

/// Interpret an annotation value as an integer class id, truncating floats.
/// Values outside the `i64` range are rejected rather than saturated.
fn class_id(value: &Value) -> Result<i64, LabelError> {
    let id = match value {
        Value::Number(n) if n.is_u64() => n.as_i64(),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_to_i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.ok_or_else(|| LabelError::NotAnInteger(value.clone()))
}
