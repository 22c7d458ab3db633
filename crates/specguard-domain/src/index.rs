//! Structural index of an API description, built once per run and shared read-only.

use crate::document::Node;
use crate::error::EvaluationError;
use crate::selector;

pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

#[derive(Clone, Copy, Debug)]
pub struct OperationRef<'a> {
    pub path: &'a str,
    pub method: &'a str,
    pub node: &'a Node,
}

#[derive(Clone, Debug)]
pub struct SpecIndex<'a> {
    root: &'a Node,
    paths: Option<&'a Node>,
    operations: Vec<OperationRef<'a>>,
    schemas: Vec<(&'a str, &'a Node)>,
}

impl<'a> SpecIndex<'a> {
    pub fn new(root: &'a Node) -> Self {
        let paths = root.get("paths").filter(|p| p.is_mapping());

        let mut operations = Vec::new();
        for (key, item) in paths.map(Node::entries).unwrap_or_default() {
            let Some(path) = key.as_scalar() else { continue };
            for (method_key, op) in item.entries() {
                let Some(method) = method_key.as_scalar() else { continue };
                if HTTP_METHODS.contains(&method) {
                    operations.push(OperationRef {
                        path,
                        method,
                        node: op,
                    });
                }
            }
        }

        // OpenAPI 3 keeps schemas under components; Swagger 2 under definitions.
        let schema_root = root
            .get("components")
            .and_then(|c| c.get("schemas"))
            .or_else(|| root.get("definitions"));
        let schemas = schema_root
            .map(Node::entries)
            .unwrap_or_default()
            .iter()
            .filter_map(|(k, v)| k.as_scalar().map(|name| (name, v)))
            .collect();

        Self {
            root,
            paths,
            operations,
            schemas,
        }
    }

    pub fn root(&self) -> &'a Node {
        self.root
    }

    /// The mapping under `paths`, if the document has one.
    pub fn get_paths_node(&self) -> Option<&'a Node> {
        self.paths
    }

    /// Path-template key nodes in document order.
    pub fn path_template_keys(&self) -> Vec<&'a Node> {
        self.paths
            .map(|p| p.entries().iter().map(|(k, _)| k).collect())
            .unwrap_or_default()
    }

    pub fn operations(&self) -> &[OperationRef<'a>] {
        &self.operations
    }

    pub fn schemas(&self) -> &[(&'a str, &'a Node)] {
        &self.schemas
    }

    pub fn find_nodes(&self, expression: &str) -> Result<Vec<&'a Node>, EvaluationError> {
        selector::select(self.root, expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OAS3: &str = r#"
openapi: 3.0.0
paths:
  /pets:
    parameters: []
    get: {}
    post: {}
  /pets/{id}:
    delete: {}
components:
  schemas:
    Pet: {type: object}
    Error: {type: object}
"#;

    #[test]
    fn indexes_operations_and_schemas() {
        let doc = Node::from_yaml_str(OAS3).expect("yaml");
        let index = SpecIndex::new(&doc);

        let ops: Vec<(&str, &str)> = index
            .operations()
            .iter()
            .map(|o| (o.path, o.method))
            .collect();
        assert_eq!(
            ops,
            vec![("/pets", "get"), ("/pets", "post"), ("/pets/{id}", "delete")]
        );

        let names: Vec<&str> = index.schemas().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Pet", "Error"]);

        let keys: Vec<&str> = index
            .path_template_keys()
            .into_iter()
            .filter_map(Node::as_scalar)
            .collect();
        assert_eq!(keys, vec!["/pets", "/pets/{id}"]);
    }

    #[test]
    fn swagger_definitions_are_schemas() {
        let doc = Node::from_yaml_str("swagger: '2.0'\ndefinitions:\n  Pet: {}\n").expect("yaml");
        let index = SpecIndex::new(&doc);
        assert_eq!(index.schemas().len(), 1);
        assert!(index.get_paths_node().is_none());
        assert!(index.operations().is_empty());
    }
}
