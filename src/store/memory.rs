//! In-memory output store.
//!
//! Records groups, attributes, datasets and links in a sorted tree.
//! Enforces the same create-once discipline as the binary backend so
//! serializer bugs surface in tests instead of corrupting containers.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::util::{path, Error, Result};

use super::{Array, ArrayData, Scalar, Store};

/// One entry in the store tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    /// A group with its attributes.
    Group {
        /// Attributes written on the group.
        attributes: BTreeMap<String, Scalar>,
    },
    /// A dataset.
    Dataset(Array),
    /// A hard link to an existing payload.
    Link {
        /// Absolute path of the link target.
        target: String,
    },
}

/// A store backed by a sorted path map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Entry>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` holds any entry.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// The entry at `path`, if any.
    pub fn entry(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    /// The entry at `path` with links resolved.
    pub fn resolve(&self, path: &str) -> Option<&Entry> {
        let mut current = self.entries.get(path)?;
        let mut hops = 0;
        while let Entry::Link { target } = current {
            current = self.entries.get(target)?;
            hops += 1;
            if hops > 64 {
                return None;
            }
        }
        Some(current)
    }

    /// The link target recorded at `path`, if the entry is a link.
    pub fn link_target(&self, path: &str) -> Option<&str> {
        match self.entries.get(path) {
            Some(Entry::Link { target }) => Some(target),
            _ => None,
        }
    }

    /// An attribute value on the group at `path`.
    pub fn attribute(&self, path: &str, name: &str) -> Option<&Scalar> {
        match self.resolve(path) {
            Some(Entry::Group { attributes }) => attributes.get(name),
            _ => None,
        }
    }

    /// The dataset at `path`, links resolved.
    pub fn dataset(&self, path: &str) -> Option<&Array> {
        match self.resolve(path) {
            Some(Entry::Dataset(array)) => Some(array),
            _ => None,
        }
    }

    /// Names of the direct children of `path`, sorted.
    pub fn children(&self, parent: &str) -> Vec<&str> {
        let prefix = if parent == "/" {
            "/".to_string()
        } else {
            format!("{parent}/")
        };
        self.entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, _)| {
                let rest = &key[prefix.len()..];
                if rest.is_empty() || rest.contains('/') {
                    None
                } else {
                    Some(rest)
                }
            })
            .collect()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All paths whose entry is a link.
    pub fn link_paths(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|(key, entry)| match entry {
                Entry::Link { .. } => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }

    fn require_parent(&self, entry_path: &str) -> Result<()> {
        let parent = path::parent_of(entry_path);
        if parent == "/" {
            return Ok(());
        }
        match self.entries.get(parent) {
            Some(Entry::Group { .. }) => Ok(()),
            Some(_) => Err(Error::store(parent, "parent is not a group")),
            None => Err(Error::store(parent, "parent group does not exist")),
        }
    }

    fn insert(&mut self, entry_path: String, entry: Entry) -> Result<()> {
        if self.entries.contains_key(&entry_path) {
            return Err(Error::store(entry_path, "path already exists"));
        }
        self.require_parent(&entry_path)?;
        self.entries.insert(entry_path, entry);
        Ok(())
    }

    /// Render the whole tree as JSON, for tests and debugging.
    pub fn to_json(&self) -> Value {
        let mut tree = serde_json::Map::new();
        for (entry_path, entry) in &self.entries {
            tree.insert(entry_path.clone(), entry_to_json(entry));
        }
        Value::Object(tree)
    }
}

fn scalar_to_json(value: &Scalar) -> Value {
    match value {
        Scalar::Text(text) => json!(text),
        Scalar::Int(value) => json!(value),
        Scalar::Float(value) => json!(value),
        Scalar::Double(value) => json!(value),
    }
}

fn entry_to_json(entry: &Entry) -> Value {
    match entry {
        Entry::Group { attributes } => {
            let attrs: serde_json::Map<String, Value> = attributes
                .iter()
                .map(|(name, value)| (name.clone(), scalar_to_json(value)))
                .collect();
            json!({ "group": attrs })
        }
        Entry::Dataset(array) => {
            let data = match &array.data {
                ArrayData::Int(values) => json!(values),
                ArrayData::Float(values) => json!(values),
                ArrayData::Double(values) => json!(values),
                ArrayData::Text(values) => json!(values),
            };
            json!({ "dataset": { "shape": array.shape.sizes(), "data": data } })
        }
        Entry::Link { target } => json!({ "link": target }),
    }
}

impl Store for MemoryStore {
    fn create_group(&mut self, group_path: &str) -> Result<()> {
        self.insert(
            group_path.to_string(),
            Entry::Group { attributes: BTreeMap::new() },
        )
    }

    fn write_attribute(&mut self, group_path: &str, name: &str, value: Scalar) -> Result<()> {
        match self.entries.get_mut(group_path) {
            Some(Entry::Group { attributes }) => {
                if attributes.contains_key(name) {
                    return Err(Error::store(
                        group_path,
                        format!("attribute {name} already exists"),
                    ));
                }
                attributes.insert(name.to_string(), value);
                Ok(())
            }
            Some(_) => Err(Error::store(group_path, "entry is not a group")),
            None => Err(Error::store(group_path, "group does not exist")),
        }
    }

    fn write_dataset(&mut self, group_path: &str, name: &str, value: Array) -> Result<()> {
        let entry_path = path::join(group_path, name);
        self.insert(entry_path, Entry::Dataset(value))
    }

    fn create_link(&mut self, target: &str, link_path: &str) -> Result<()> {
        if !self.entries.contains_key(target) {
            return Err(Error::LinkTargetNotFound(target.to_string()));
        }
        self.insert(link_path.to_string(), Entry::Link { target: target.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Shape;

    #[test]
    fn test_groups_and_attributes() {
        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create /odb");
        store.create_group("/odb/jobData").expect("create jobData");
        store
            .write_attribute("/odb", "name", Scalar::text("model"))
            .expect("write attribute");

        assert!(store.contains("/odb/jobData"));
        assert_eq!(store.attribute("/odb", "name"), Some(&Scalar::text("model")));
        assert_eq!(store.children("/odb"), vec!["jobData"]);
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create /odb");
        assert!(matches!(
            store.create_group("/odb"),
            Err(Error::Store { .. })
        ));
    }

    #[test]
    fn test_missing_parent_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.create_group("/odb/steps"),
            Err(Error::Store { .. })
        ));
    }

    #[test]
    fn test_datasets() {
        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create /odb");
        store
            .write_dataset("/odb", "coords", Array::floats(vec![1.0, 2.0, 3.0]))
            .expect("write dataset");

        let array = store.dataset("/odb/coords").expect("dataset");
        assert_eq!(array.shape, Shape::d1(3));
        assert_eq!(array.data, ArrayData::Float(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_links_resolve() {
        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create /odb");
        store.create_group("/odb/a").expect("create a");
        store.create_group("/odb/b").expect("create b");
        store
            .write_dataset("/odb/a", "7", Array::floats(vec![1.0, 2.0, 3.0]))
            .expect("write dataset");
        store.create_link("/odb/a/7", "/odb/b/7").expect("create link");

        assert_eq!(store.link_target("/odb/b/7"), Some("/odb/a/7"));
        assert_eq!(store.dataset("/odb/b/7"), store.dataset("/odb/a/7"));
        assert_eq!(store.link_paths(), vec!["/odb/b/7"]);
    }

    #[test]
    fn test_link_target_must_exist() {
        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create /odb");
        assert!(matches!(
            store.create_link("/odb/missing", "/odb/alias"),
            Err(Error::LinkTargetNotFound(_))
        ));
    }

    #[test]
    fn test_to_json() {
        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create /odb");
        store
            .write_attribute("/odb", "name", Scalar::text("model"))
            .expect("write attribute");
        let rendered = store.to_json();
        assert_eq!(rendered["/odb"]["group"]["name"], "model");
    }
}
