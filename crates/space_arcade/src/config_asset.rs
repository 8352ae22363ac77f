//! Shared rules for JSON asset configs
//!
//! Every config lives under a mod directory (`<modDir>/Assets/...`) and
//! knows the one file path that represents it on disk.

use std::path::{Path, PathBuf};

use arcade_engine::foundation::math::Vec3;
use serde_json::{Map, Value};

/// Directory name separating a mod root from its asset files
pub const ASSETS_DIR: &str = "Assets";

/// A config stored as a JSON file inside a mod
pub trait ConfigAsset {
    /// Config name (file stem for most configs)
    fn name(&self) -> &str;

    /// Mod directory the config was loaded from
    fn owning_mod_dir(&self) -> &Path;

    /// Where this config is read from and saved to
    fn representative_file_path(&self) -> PathBuf;

    /// Resolve a mod-relative path against the owning mod
    fn resolve_mod_path(&self, relative: &str) -> PathBuf {
        self.owning_mod_dir().join(relative)
    }
}

/// Mod root of a file somewhere below `<modDir>/Assets/`
///
/// Falls back to the file's parent directory when no `Assets` component is
/// present.
pub fn mod_dir_from_path(path: &Path) -> PathBuf {
    path.ancestors()
        .find(|ancestor| ancestor.file_name().is_some_and(|name| name == ASSETS_DIR))
        .and_then(Path::parent)
        .or_else(|| path.parent())
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Serde adapter writing vectors as `{"x":..,"y":..,"z":..}`
///
/// Reading goes through [`json::vec3`] so mistyped vectors fall back to
/// defaults instead of failing the document.
pub mod vec3_xyz {
    use arcade_engine::foundation::math::Vec3;
    use serde::{Serialize, Serializer};

    #[derive(Serialize)]
    struct Xyz {
        x: f32,
        y: f32,
        z: f32,
    }

    /// Serialize as an xyz object
    pub fn serialize<S: Serializer>(value: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        Xyz {
            x: value.x,
            y: value.y,
            z: value.z,
        }
        .serialize(serializer)
    }
}

/// Lenient readers for hand-edited JSON
///
/// Missing or wrongly typed fields yield `None` so callers keep their
/// defaults.
pub mod json {
    use super::{Map, Value, Vec3};

    /// String field
    pub fn string(obj: &Value, key: &str) -> Option<String> {
        obj.get(key)?.as_str().map(str::to_string)
    }

    /// Integer field
    pub fn int(obj: &Value, key: &str) -> Option<i64> {
        obj.get(key)?.as_i64()
    }

    /// Non-negative integer field
    pub fn index(obj: &Value, key: &str) -> Option<usize> {
        as_index(obj.get(key)?)
    }

    /// Non-negative integer, also accepting integral floats such as `1.0`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_index(value: &Value) -> Option<usize> {
        if let Some(v) = value.as_u64() {
            return usize::try_from(v).ok();
        }
        let v = value.as_f64()?;
        (v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX)).then(|| v as usize)
    }

    /// Float field
    #[allow(clippy::cast_possible_truncation)]
    pub fn float(obj: &Value, key: &str) -> Option<f32> {
        obj.get(key)?.as_f64().map(|v| v as f32)
    }

    /// Boolean field
    pub fn boolean(obj: &Value, key: &str) -> Option<bool> {
        obj.get(key)?.as_bool()
    }

    /// Array field
    pub fn array<'a>(obj: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
        obj.get(key)?.as_array()
    }

    /// Vector field stored as `{"x","y","z"}`; missing components are zero
    #[allow(clippy::cast_possible_truncation)]
    pub fn vec3(obj: &Value, key: &str) -> Option<Vec3> {
        let value = obj.get(key)?.as_object()?;
        let component = |name: &str| value.get(name).and_then(Value::as_f64).unwrap_or(0.0) as f32;
        Some(Vec3::new(component("x"), component("y"), component("z")))
    }

    /// Encode a vector as `{"x","y","z"}`
    pub fn vec3_value(v: &Vec3) -> Value {
        let mut obj = Map::new();
        obj.insert("x".to_string(), Value::from(v.x));
        obj.insert("y".to_string(), Value::from(v.y));
        obj.insert("z".to_string(), Value::from(v.z));
        Value::Object(obj)
    }
}
