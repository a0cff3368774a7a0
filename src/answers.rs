//! Ordered store of resolved answers

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Answers collected during a session, keyed by question name in the order
/// the questions were answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(IndexMap<String, Value>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Stores `value` under `name`. Re-answering a name keeps its original
    /// position and replaces the value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// JSON object view, used as the template context for question files.
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Builds answers from a JSON object; anything else yields no answers.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => Self::default(),
        }
    }
}

impl FromIterator<(String, Value)> for Answers {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Map<String, Value>> for Answers {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl IntoIterator for Answers {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_answer_order() {
        let mut answers = Answers::new();
        answers.insert("zeta", json!(1));
        answers.insert("alpha", json!(2));
        answers.insert("mid", json!(3));
        assert_eq!(answers.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_name_overwrites_in_place() {
        let mut answers = Answers::new();
        answers.insert("a", json!("first"));
        answers.insert("b", json!(true));
        answers.insert("a", json!("second"));
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get("a"), Some(&json!("second")));
        assert_eq!(answers.keys().next(), Some("a"));
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let mut answers = Answers::new();
        answers.insert("ok", json!(true));
        answers.insert("n", json!("Ada"));
        let serialized = serde_json::to_string(&answers).unwrap();
        assert_eq!(serialized, r#"{"ok":true,"n":"Ada"}"#);
        assert_eq!(answers.to_json(), json!({"ok": true, "n": "Ada"}));
    }

    #[test]
    fn from_json_ignores_non_objects() {
        assert!(Answers::from_json(json!([1, 2])).is_empty());
        let answers = Answers::from_json(json!({"name": "John"}));
        assert_eq!(answers.get("name"), Some(&json!("John")));
    }
}
