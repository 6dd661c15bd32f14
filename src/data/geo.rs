use std::fs;
use std::path::Path;

use serde_json::Value;

use super::DataError;

/// State boundary polygons as a GeoJSON `FeatureCollection`, with every
/// feature's `id` set to its `properties.name` so choropleth locations can
/// be given as full state names.
#[derive(Debug, Clone)]
pub struct Boundaries {
    geojson: Value,
    names: Vec<String>,
}

impl Boundaries {
    pub fn from_value(path: &Path, mut geojson: Value) -> Result<Self, DataError> {
        let bad = |reason: &str| DataError::BadGeoJson {
            path: path.display().to_string(),
            reason: reason.to_string(),
        };

        if geojson.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(bad("top-level type is not FeatureCollection"));
        }
        let features = geojson
            .get_mut("features")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| bad("missing features array"))?;

        let mut names = Vec::with_capacity(features.len());
        for (i, feature) in features.iter_mut().enumerate() {
            let name = feature
                .pointer("/properties/name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| bad(&format!("feature {} has no properties.name", i)))?;
            let obj = feature
                .as_object_mut()
                .ok_or_else(|| bad(&format!("feature {} is not an object", i)))?;
            obj.insert("id".to_string(), Value::String(name.clone()));
            names.push(name);
        }

        Ok(Self { geojson, names })
    }

    pub fn as_value(&self) -> &Value {
        &self.geojson
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

pub fn load_boundaries(path: &Path) -> Result<Boundaries, DataError> {
    let raw = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| DataError::BadGeoJson {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Boundaries::from_value(path, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_features_get_name_ids() {
        let raw = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "01", "properties": {"name": "Alabama"}, "geometry": null},
                {"type": "Feature", "properties": {"name": "Alaska"}, "geometry": null}
            ]
        });
        let b = Boundaries::from_value(Path::new("mem.json"), raw).unwrap();
        assert_eq!(b.names(), ["Alabama", "Alaska"]);
        assert_eq!(b.as_value()["features"][0]["id"], "Alabama");
        assert_eq!(b.as_value()["features"][1]["id"], "Alaska");
        assert!(b.contains("Alaska"));
    }

    #[test]
    fn test_rejects_feature_without_name() {
        let raw = json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {}}]
        });
        let err = Boundaries::from_value(Path::new("mem.json"), raw).unwrap_err();
        assert!(matches!(err, DataError::BadGeoJson { .. }));
    }

    #[test]
    fn test_rejects_non_collection() {
        let raw = json!({"type": "Feature"});
        assert!(Boundaries::from_value(Path::new("mem.json"), raw).is_err());
    }
}
