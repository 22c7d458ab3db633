//! Fuzz target for selector expressions.
//!
//! Goal: Resolving any expression against a fixed document should **never panic**.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_selector
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use specguard_domain::{Node, selector};

const DOC: &str = r#"
openapi: 3.0.0
info: {title: Pets, description: all the pets}
paths:
  /pets/{id}:
    get: {operationId: getPet, tags: [a, b]}
"#;

fuzz_target!(|data: &[u8]| {
    if let Ok(expression) = std::str::from_utf8(data) {
        if let Ok(root) = Node::from_yaml_str(DOC) {
            let _ = selector::select(&root, expression);
        }
    }
});
