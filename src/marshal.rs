//! Host/engine value marshalling.
//!
//! Opaque values cross the embedding boundary as `serde_json::Value`: arguments
//! are converted into engine values before the call, results converted back
//! after settlement. This is in-process conversion only - wire serialization is
//! the caller's job.

use rquickjs::{Array, Ctx, Object, Type, Value};
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{InvokeError, Result};

/// Convert a JSON value into an engine value.
///
/// Integers that fit in an i32 keep the engine's integer representation;
/// everything else numeric goes through f64.
pub fn json_to_js<'js>(ctx: &Ctx<'js>, value: &JsonValue) -> rquickjs::Result<Value<'js>> {
    match value {
        JsonValue::Null => Ok(Value::new_null(ctx.clone())),
        JsonValue::Bool(b) => Ok(Value::new_bool(ctx.clone(), *b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Ok(Value::new_int(ctx.clone(), small)),
                    Err(_) => Ok(Value::new_float(ctx.clone(), i as f64)),
                }
            } else if let Some(u) = n.as_u64() {
                Ok(Value::new_float(ctx.clone(), u as f64))
            } else {
                Ok(Value::new_float(ctx.clone(), n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        JsonValue::String(s) => {
            rquickjs::String::from_str(ctx.clone(), s).map(Value::from_string)
        }
        JsonValue::Array(items) => {
            let array = Array::new(ctx.clone())?;
            for (index, item) in items.iter().enumerate() {
                array.set(index, json_to_js(ctx, item)?)?;
            }
            Ok(Value::from_array(array))
        }
        JsonValue::Object(entries) => {
            let object = Object::new(ctx.clone())?;
            for (key, entry) in entries {
                object.set(key.as_str(), json_to_js(ctx, entry)?)?;
            }
            Ok(Value::from_object(object))
        }
    }
}

/// Convert an engine value back into a JSON value.
///
/// `undefined` and `null` both map to JSON null. Non-finite numbers map to null
/// (matching `JSON.stringify`). Values with no JSON representation at all
/// (functions, symbols, bigints) are a marshalling failure rather than a
/// silent null.
pub fn js_to_json(value: &Value<'_>) -> Result<JsonValue> {
    match value.type_of() {
        Type::Uninitialized | Type::Undefined | Type::Null => Ok(JsonValue::Null),
        Type::Bool => Ok(JsonValue::Bool(value.as_bool().unwrap_or(false))),
        Type::Int => Ok(JsonValue::from(value.as_int().unwrap_or(0))),
        Type::Float => {
            let f = value.as_float().unwrap_or(f64::NAN);
            Ok(Number::from_f64(f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null))
        }
        Type::String => {
            let s = value
                .as_string()
                .ok_or_else(|| InvokeError::Marshal("string value unavailable".to_string()))?
                .to_string()
                .map_err(|e| InvokeError::Marshal(e.to_string()))?;
            Ok(JsonValue::String(s))
        }
        Type::Array => {
            let array = value
                .as_array()
                .ok_or_else(|| InvokeError::Marshal("array value unavailable".to_string()))?;
            let mut items = Vec::with_capacity(array.len());
            for item in array.iter::<Value>() {
                let item = item.map_err(|e| InvokeError::Marshal(e.to_string()))?;
                items.push(js_to_json(&item)?);
            }
            Ok(JsonValue::Array(items))
        }
        Type::Object | Type::Exception => {
            let object = value
                .as_object()
                .ok_or_else(|| InvokeError::Marshal("object value unavailable".to_string()))?;
            let mut entries = Map::new();
            for prop in object.props::<String, Value>() {
                let (key, entry) = prop.map_err(|e| InvokeError::Marshal(e.to_string()))?;
                entries.insert(key, js_to_json(&entry)?);
            }
            Ok(JsonValue::Object(entries))
        }
        other => Err(InvokeError::Marshal(format!(
            "{other} value cannot be represented as JSON"
        ))),
    }
}
