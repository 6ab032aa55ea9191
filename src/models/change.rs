use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Content Patcher action every migrated entry is normalized to
pub const LOAD_ACTION: &str = "Load";

/// Keys that only make sense for `EditImage` and are dropped on conversion to `Load`
const IMAGE_EDIT_KEYS: [&str; 3] = ["FromArea", "ToArea", "PatchMode"];

/// One element of the `Changes` array in `content.json`.
///
/// Only `Action`, `Target` and `FromFile` are interpreted; any other key (`When`,
/// `LogName`, `Update`, ...) is carried through untouched and in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeEntry {
    fields: Map<String, Value>,
}

impl ChangeEntry {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn target(&self) -> Option<&str> {
        self.str_field("Target")
    }

    pub fn from_file(&self) -> Option<&str> {
        self.str_field("FromFile")
    }

    /// Copy of this entry rewritten as a `Load` of `from_file` into `target`.
    pub fn to_load(&self, target: &str, from_file: &str) -> Self {
        let mut fields = self.fields.clone();
        for key in IMAGE_EDIT_KEYS {
            fields.shift_remove(key);
        }
        fields.insert("Action".to_string(), Value::from(LOAD_ACTION));
        fields.insert("Target".to_string(), Value::from(target));
        fields.insert("FromFile".to_string(), Value::from(from_file));
        Self { fields }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Splits a change target into its parent path and asset name.
///
/// `Portraits/Abigail` yields `("Portraits", "Abigail")`. Targets without a
/// separator have no parent.
pub fn split_target(target: &str) -> Option<(&str, &str)> {
    let target = target.trim().trim_end_matches(['/', '\\']);
    let index = target.rfind(['/', '\\'])?;
    let (parent, asset) = (&target[..index], &target[index + 1..]);
    if asset.is_empty() {
        None
    } else {
        Some((parent, asset))
    }
}
