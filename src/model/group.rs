use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};

/// A dynamic collection of monitored resources.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Group {
    pub id: Option<String>,
    /// Full resource name, `projects/<project>/groups/<id>`.
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub parent_id: Option<String>,
    pub parent_name: Option<String>,
    pub filter: Option<String>,
    pub is_cluster: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupRepr {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    parent_name: Option<String>,
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    is_cluster: bool,
}

/// Extracts the group ID from a `projects/<project>/groups/<id>` name.
pub fn group_id_from_name(name: &str) -> Option<&str> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^projects/[^/]+/groups/([^/]+)$").unwrap();
    }

    RE.captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl Group {
    /// Wire form with only the fields that are set.
    pub fn to_wire(&self) -> Value {
        let mut info = Map::new();
        if let Some(name) = &self.name {
            info.insert("name".into(), json!(name));
        }
        if let Some(display_name) = &self.display_name {
            info.insert("displayName".into(), json!(display_name));
        }
        if let Some(parent_name) = &self.parent_name {
            info.insert("parentName".into(), json!(parent_name));
        }
        if let Some(filter) = &self.filter {
            info.insert("filter".into(), json!(filter));
        }
        info.insert("isCluster".into(), json!(self.is_cluster));
        Value::Object(info)
    }

    pub fn from_wire(info: &Value) -> Result<Self> {
        let repr = GroupRepr::deserialize(info)
            .map_err(|e| Error::malformed("couldn't decode group").caused_by(e))?;

        let id = group_id_from_name(&repr.name)
            .ok_or_else(|| Error::malformed(format!("unexpected group name '{}'", repr.name)))?;

        // An empty parent name means a top-level group.
        let parent_name = repr.parent_name.filter(|n| !n.is_empty());
        let parent_id = match &parent_name {
            Some(name) => Some(
                group_id_from_name(name)
                    .ok_or_else(|| Error::malformed(format!("unexpected parent name '{}'", name)))?
                    .to_string(),
            ),
            None => None,
        };

        Ok(Self {
            id: Some(id.to_string()),
            name: Some(repr.name.clone()),
            display_name: repr.display_name,
            parent_id,
            parent_name,
            filter: repr.filter,
            is_cluster: repr.is_cluster,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_group_id_from_name() {
        #[rustfmt::skip]
        let tests = [
            ("projects/my-project/groups/GROUP_ID", Some("GROUP_ID")),
            ("projects/my-project/groups/", None),
            ("groups/GROUP_ID", None),
            ("projects/my-project/groups/a/b", None),
        ];

        for (input, expected) in &tests {
            assert_eq!(*expected, group_id_from_name(input), "{}", input);
        }
    }

    #[test]
    fn test_from_wire() {
        let group = Group::from_wire(&json!({
            "name": "projects/my-project/groups/GROUP_ID",
            "displayName": "My Group",
            "parentName": "projects/my-project/groups/PARENT_ID",
            "filter": "resource.type = \"gce_instance\"",
            "isCluster": false,
        }))
        .unwrap();

        assert_eq!(Some("GROUP_ID"), group.id.as_deref());
        assert_eq!(Some("PARENT_ID"), group.parent_id.as_deref());
        assert_eq!(Some("My Group"), group.display_name.as_deref());
        assert_eq!(Some("resource.type = \"gce_instance\""), group.filter.as_deref());
        assert!(!group.is_cluster);
    }

    #[test]
    fn test_from_wire_top_level() {
        let group = Group::from_wire(&json!({
            "name": "projects/my-project/groups/G",
            "parentName": "",
            "isCluster": true,
        }))
        .unwrap();

        assert_eq!(None, group.parent_id);
        assert_eq!(None, group.parent_name);
        assert!(group.is_cluster);
    }

    #[test]
    fn test_wire_round_trip() {
        let wire = json!({
            "name": "projects/p/groups/G",
            "displayName": "G",
            "parentName": "projects/p/groups/P",
            "isCluster": true,
        });
        assert_eq!(wire, Group::from_wire(&wire).unwrap().to_wire());
    }

    #[test]
    fn test_from_wire_bad_name() {
        let err = Group::from_wire(&json!({"name": "nope"})).unwrap_err();
        assert_eq!(ErrorKind::MalformedResponse, err.kind());
    }
}
