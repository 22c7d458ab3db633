//! Fuzz target for path ambiguity detection.
//!
//! Goal: Any set of path keys should be analyzed without panicking, and
//! every flagged template must be one of the inputs.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_ambiguous_paths
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use specguard_domain::{AmbiguousPaths, Node, RuleFunction, RuleFunctionContext, SpecIndex};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let paths = text
        .lines()
        .take(64)
        .map(|line| (Node::scalar(line), Node::mapping(Vec::new())))
        .collect();
    let root = Node::mapping(vec![(Node::scalar("paths"), Node::mapping(paths))]);
    let index = SpecIndex::new(&root);
    let context = RuleFunctionContext {
        index: Some(&index),
        ..RuleFunctionContext::default()
    };

    for result in AmbiguousPaths.run_rule(&[&root], &context) {
        assert!(text.lines().any(|line| result.path == ["paths", line]));
    }
});
