//! Annotated document tree consumed by selectors and rule functions.
//!
//! A position-aware parser lives outside this crate; it produces `Node` trees.
//! `Node::from_yaml` converts position-less `serde_yaml` values for callers
//! (and tests) that do not need locations.

use specguard_types::Position;

#[derive(Clone, Debug, PartialEq)]
pub enum NodeValue {
    Null,
    Scalar(String),
    Sequence(Vec<Node>),
    /// Key/value pairs in document order. Keys are nodes so they keep their own position.
    Mapping(Vec<(Node, Node)>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub value: NodeValue,
    pub position: Position,
}

impl Default for Node {
    fn default() -> Self {
        Node::null()
    }
}

impl Node {
    pub fn null() -> Self {
        Self {
            value: NodeValue::Null,
            position: Position::default(),
        }
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Self {
            value: NodeValue::Scalar(value.into()),
            position: Position::default(),
        }
    }

    pub fn sequence(items: Vec<Node>) -> Self {
        Self {
            value: NodeValue::Sequence(items),
            position: Position::default(),
        }
    }

    pub fn mapping(entries: Vec<(Node, Node)>) -> Self {
        Self {
            value: NodeValue::Mapping(entries),
            position: Position::default(),
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.position = Position::new(line, column);
        self
    }

    pub fn from_yaml(value: &serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Node::null(),
            Value::Bool(b) => Node::scalar(b.to_string()),
            Value::Number(n) => Node::scalar(n.to_string()),
            Value::String(s) => Node::scalar(s.clone()),
            Value::Sequence(items) => Node::sequence(items.iter().map(Node::from_yaml).collect()),
            Value::Mapping(map) => Node::mapping(
                map.iter()
                    .map(|(k, v)| (Node::scalar(key_text(k)), Node::from_yaml(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from_yaml(&tagged.value),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        Ok(Node::from_yaml(&value))
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match &self.value {
            NodeValue::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, NodeValue::Null)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.value, NodeValue::Mapping(_))
    }

    /// Key/value pairs of a mapping; empty for any other node kind.
    pub fn entries(&self) -> &[(Node, Node)] {
        match &self.value {
            NodeValue::Mapping(entries) => entries,
            _ => &[],
        }
    }

    pub fn items(&self) -> &[Node] {
        match &self.value {
            NodeValue::Sequence(items) => items,
            _ => &[],
        }
    }

    pub fn get_entry(&self, key: &str) -> Option<(&Node, &Node)> {
        self.entries()
            .iter()
            .find(|(k, _)| k.as_scalar() == Some(key))
            .map(|(k, v)| (k, v))
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.get_entry(key).map(|(_, v)| v)
    }

    /// Direct children: mapping values, or sequence items.
    pub fn children(&self) -> Vec<&Node> {
        match &self.value {
            NodeValue::Mapping(entries) => entries.iter().map(|(_, v)| v).collect(),
            NodeValue::Sequence(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Truthiness for `truthy`: present, non-null, and not `false`, `0`, or empty.
    pub fn is_truthy(&self) -> bool {
        match &self.value {
            NodeValue::Null => false,
            NodeValue::Scalar(s) => !matches!(s.as_str(), "" | "false" | "0"),
            NodeValue::Sequence(items) => !items.is_empty(),
            NodeValue::Mapping(entries) => !entries.is_empty(),
        }
    }
}

fn key_text(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
