#![forbid(unsafe_code)]

use crate::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message received from the upstream source of truth.
///
/// `cmd` is an ordered list of candidate command names; a plain string is the
/// single-candidate case. `raw` is the message as received, echoed back in error
/// reports.
#[derive(Clone, Debug, PartialEq)]
pub struct Inbound {
    pub cmd: Vec<String>,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
    pub raw: Value,
}

impl Inbound {
    pub fn from_value(raw: Value) -> Result<Self, DispatchError> {
        let Some(obj) = raw.as_object() else {
            return Err(DispatchError::invalid_command(format!(
                "Message should be a JSON object not {}.",
                json_type_name(&raw)
            )));
        };
        let cmd = match obj.get("cmd") {
            None | Some(Value::Null) => {
                return Err(DispatchError::unknown_command(
                    "Console sent message missing \"cmd\" field.",
                ));
            }
            Some(Value::String(name)) => vec![name.clone()],
            Some(Value::Array(items)) => {
                let mut names = Vec::with_capacity(items.len());
                for item in items {
                    let Some(name) = item.as_str() else {
                        return Err(DispatchError::invalid_command(format!(
                            "\"msg.cmd\" should only contain strings, found {item}."
                        )));
                    };
                    names.push(name.to_string());
                }
                names
            }
            Some(other) => {
                return Err(DispatchError::invalid_command(format!(
                    "\"msg.cmd\" should have type \"Array\" not \"{}\".",
                    json_type_name(other)
                )));
            }
        };
        if cmd.is_empty() {
            return Err(DispatchError::invalid_command("\"msg.cmd\" is empty."));
        }
        let args = match obj.get("args") {
            None => {
                return Err(DispatchError::invalid_command(
                    "Message is missing the \"args\" field.",
                ));
            }
            Some(Value::Array(items)) => items.clone(),
            Some(other) => {
                return Err(DispatchError::invalid_command(format!(
                    "\"msg.args\" should have type \"Array\" not \"{}\".",
                    json_type_name(other)
                )));
            }
        };
        let kwargs = match obj.get("kwargs") {
            None => {
                return Err(DispatchError::invalid_command(
                    "Message is missing the \"kwargs\" field.",
                ));
            }
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(DispatchError::invalid_command(format!(
                    "\"msg.kwargs\" should have type \"Object\" not \"{}\".",
                    json_type_name(other)
                )));
            }
        };
        Ok(Self {
            cmd,
            args,
            kwargs,
            raw,
        })
    }

    /// First candidate name; used when no candidate resolves.
    pub fn primary_cmd(&self) -> &str {
        self.cmd.first().map(String::as_str).unwrap_or("")
    }

    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key).filter(|v| !v.is_null())
    }

    pub fn required_kwarg(&self, key: &str) -> Result<&Value, DispatchError> {
        self.kwarg(key).ok_or_else(|| {
            DispatchError::validation(format!(
                "Command \"{}\" is missing keyword argument \"{key}\".",
                self.primary_cmd()
            ))
        })
    }
}

/// Message sent upstream. `args` is always empty; payloads travel in `kwargs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outbound {
    pub cmd: String,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl Outbound {
    pub fn new(cmd: impl Into<String>, kwargs: Value) -> Result<Self, DispatchError> {
        let Value::Object(kwargs) = kwargs else {
            return Err(DispatchError::validation(format!(
                "Argument \"kwargs\" expected to have type \"Object\" not \"{}\".",
                json_type_name(&kwargs)
            )));
        };
        if kwargs.contains_key("cmd") {
            return Err(DispatchError::validation(
                "Tried to send message with top level \"cmd\" key.",
            ));
        }
        Ok(Self {
            cmd: cmd.into(),
            args: Vec::new(),
            kwargs,
        })
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "Boolean",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}
