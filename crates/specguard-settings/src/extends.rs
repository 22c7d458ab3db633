//! Flattening of `extends` chains into a single ruleset.

use std::collections::BTreeMap;
use std::sync::Arc;

use specguard_domain::{Error, Rule, RuleOverride, RuleSet};
use specguard_types::ids;
use tracing::debug;

use crate::catalog::RulesetCatalog;

/// Inherited rules in declaration order, each with its enabled flag.
#[derive(Default)]
struct Layer {
    order: Vec<String>,
    rules: BTreeMap<String, (Arc<Rule>, bool)>,
}

impl Layer {
    fn put(&mut self, rule: Arc<Rule>, enabled: bool) {
        if !self.rules.contains_key(&rule.id) {
            self.order.push(rule.id.clone());
        }
        self.rules.insert(rule.id.clone(), (rule, enabled));
    }

    fn into_rule_set(self, template: &RuleSet) -> RuleSet {
        let mut out = RuleSet::new();
        out.documentation_url = template.documentation_url.clone();
        out.description = template.description.clone();
        let Layer { order, mut rules } = self;
        for id in order {
            if let Some((rule, true)) = rules.remove(&id) {
                out.insert_rule(rule);
            }
        }
        out
    }
}

/// Resolve `extends` into a flat ruleset holding only enabled rules.
///
/// Parents are applied in declaration order (later parents win), then the
/// ruleset's own definitions, then its overrides. A cycle, an unknown parent, an
/// unknown variant, or an override of a rule that does not exist is a
/// configuration error named after the offending id.
pub fn resolve_extends(rule_set: &RuleSet, catalog: &RulesetCatalog) -> Result<RuleSet, Error> {
    let mut stack = Vec::new();
    let layer = flatten(rule_set, catalog, &mut stack)?;
    Ok(layer.into_rule_set(rule_set))
}

fn flatten(
    rule_set: &RuleSet,
    catalog: &RulesetCatalog,
    stack: &mut Vec<String>,
) -> Result<Layer, Error> {
    let mut layer = Layer::default();

    for (parent_id, variant) in rule_set.extends_entries() {
        if stack.contains(&parent_id) {
            return Err(Error::configuration(
                &parent_id,
                format!("extends cycle: {} -> {parent_id}", stack.join(" -> ")),
            ));
        }
        let parent = catalog
            .get(&parent_id)
            .ok_or_else(|| Error::configuration(&parent_id, "unknown ruleset in extends"))?;

        debug!(ruleset = %parent_id, %variant, "resolving extends");
        stack.push(parent_id.clone());
        let inherited = flatten(parent, catalog, stack)?;
        stack.pop();

        let Layer { order, mut rules } = inherited;
        for id in order {
            let Some((rule, enabled)) = rules.remove(&id) else {
                continue;
            };
            let enabled = match variant.as_str() {
                ids::VARIANT_ALL => true,
                ids::VARIANT_OFF => false,
                v if v == ids::VARIANT_RECOMMENDED || v == parent_id => {
                    enabled && rule.recommended
                }
                other => {
                    return Err(Error::configuration(
                        &parent_id,
                        format!("unknown variant '{other}'"),
                    ));
                }
            };
            layer.put(rule, enabled);
        }
    }

    for rule in rule_set.rules() {
        layer.put(Arc::clone(rule), true);
    }

    for (id, over) in &rule_set.overrides {
        let Some((rule, enabled)) = layer.rules.get_mut(id) else {
            return Err(Error::configuration(id, "override of a rule that is not defined"));
        };
        match over {
            RuleOverride::Disable => *enabled = false,
            RuleOverride::Enable => *enabled = true,
            RuleOverride::Severity(severity) => {
                *rule = Arc::new(rule.with_severity(*severity));
                *enabled = true;
            }
        }
    }

    Ok(layer)
}
