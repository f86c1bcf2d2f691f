//! Fixture files for CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}

pub(super) fn write_value(path: &Utf8Path, value: &Value) {
    let payload = serde_json::to_string_pretty(value).expect("serialise fixture");
    write_utf8(path, payload.as_bytes());
}

/// Two adjacent coastal regions: Ocean Grove east of lng 144.50 and Barwon
/// Heads to the west.
pub(super) fn boundaries() -> Value {
    json!([
        {
            "name": "Ocean Grove",
            "ring": [[144.50, -38.28], [144.55, -38.28], [144.55, -38.24], [144.50, -38.24]]
        },
        {
            "name": "Barwon Heads",
            "ring": [[144.45, -38.30], [144.50, -38.30], [144.50, -38.26], [144.45, -38.26]]
        }
    ])
}

pub(super) fn post(id: &str, category: &str, lat: f64, lng: f64, visibility: &str) -> Value {
    json!({
        "kind": "post",
        "id": id,
        "title": format!("Post {id}"),
        "category": category,
        "location": { "latitude": lat, "longitude": lng },
        "visibility": visibility
    })
}

pub(super) fn business(id: &str, business_type: &str, lat: f64, lng: f64) -> Value {
    json!({
        "kind": "business",
        "id": id,
        "name": format!("Business {id}"),
        "business_type": business_type,
        "latitude": lat,
        "longitude": lng
    })
}

pub(super) fn event(id: &str, lat: f64, lng: f64) -> Value {
    json!({
        "kind": "event",
        "id": id,
        "title": format!("Event {id}"),
        "venue": { "coordinates": { "lat": lat, "lng": lng } }
    })
}

/// Temporary directory holding regions and record files.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write the standard boundaries to `regions.json` and return its path.
    pub(super) fn write_regions(&self) -> Utf8PathBuf {
        let path = self.path("regions.json");
        write_value(&path, &boundaries());
        path
    }

    pub(super) fn write_records(&self, name: &str, records: &[Value]) -> Utf8PathBuf {
        let path = self.path(name);
        write_value(&path, &Value::Array(records.to_vec()));
        path
    }
}
