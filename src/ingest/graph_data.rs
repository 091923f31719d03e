/// Real-time graph payload extraction.
///
/// The graph service returns a JSON object keyed by stringified sensor id:
///
///   { "46": { "provisional": 1.23, ... }, "47": { "provisional": 45.6, ... } }
///
/// Only the `provisional` value of the two requested sensors is used. A
/// sensor missing from the payload is an error; a sensor whose
/// `provisional` value is null or absent yields `None`.

use serde_json::Value;

use crate::model::{GraphDataPoint, SensorIds, WaterOfficeError, PROVISIONAL_COMMENT};

/// Decodes a graph response body.
pub fn parse_graph_payload(json: &str) -> Result<Value, WaterOfficeError> {
    serde_json::from_str(json)
        .map_err(|e| WaterOfficeError::Malformed(format!("JSON deserialization failed: {}", e)))
}

/// Extracts the provisional water level and discharge for `sensors`.
///
/// # Errors
/// - `WaterOfficeError::MissingSensor` - a sensor key is absent.
/// - `WaterOfficeError::Malformed` - the payload is not an object, or a
///   `provisional` value is neither a number nor null.
pub fn extract_graph_point(json: &Value, sensors: SensorIds) -> Result<GraphDataPoint, WaterOfficeError> {
    if !json.is_object() {
        return Err(WaterOfficeError::Malformed(
            "graph payload is not a JSON object".to_string(),
        ));
    }

    Ok(GraphDataPoint {
        comment: PROVISIONAL_COMMENT.to_string(),
        water_level: provisional_value(json, sensors.water_level)?,
        discharge_level: provisional_value(json, sensors.discharge)?,
    })
}

fn provisional_value(json: &Value, sensor_id: u32) -> Result<Option<f64>, WaterOfficeError> {
    let sensor = json
        .get(sensor_id.to_string())
        .ok_or(WaterOfficeError::MissingSensor(sensor_id))?;

    match sensor.get("provisional") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(WaterOfficeError::Malformed(format!(
            "sensor {} provisional value is not a number: {}",
            sensor_id, other
        ))),
    }
}
