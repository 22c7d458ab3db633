//! Resolves `given` selector expressions against a document tree.
//!
//! Supported subset: `$`, `.name`, `['name']`, `['a','b']`, `.*`, `[*]`, `[N]`, `..name`, `..*`.

use crate::document::Node;
use crate::error::EvaluationError;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Step {
    Child(String),
    Union(Vec<String>),
    Wildcard,
    Index(usize),
    Descendant(String),
    AnyDescendant,
}

pub fn select<'a>(root: &'a Node, expression: &str) -> Result<Vec<&'a Node>, EvaluationError> {
    let steps = parse(expression).map_err(|reason| EvaluationError::Selector {
        expression: expression.to_string(),
        reason,
    })?;

    let mut current = vec![root];
    for step in &steps {
        let mut next = Vec::new();
        for node in current {
            match step {
                Step::Child(name) => next.extend(node.get(name)),
                Step::Union(names) => next.extend(
                    node.entries()
                        .iter()
                        .filter(|(k, _)| {
                            k.as_scalar().is_some_and(|k| names.iter().any(|n| n == k))
                        })
                        .map(|(_, v)| v),
                ),
                Step::Wildcard => next.extend(node.children()),
                Step::Index(i) => next.extend(node.items().get(*i)),
                Step::Descendant(name) => {
                    let mut all = vec![node];
                    collect_descendants(node, &mut all);
                    next.extend(all.into_iter().filter_map(|n| n.get(name)));
                }
                Step::AnyDescendant => collect_descendants(node, &mut next),
            }
        }
        current = next;
    }
    Ok(current)
}

fn collect_descendants<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    for child in node.children() {
        out.push(child);
        collect_descendants(child, out);
    }
}

fn parse(expression: &str) -> Result<Vec<Step>, String> {
    let expression = expression.trim();
    let Some(mut rest) = expression.strip_prefix('$') else {
        return Err("expression must start with '$'".to_string());
    };

    let mut steps = Vec::new();
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("..") {
            let (name, remaining) = take_name(after);
            steps.push(match name {
                "" => return Err("recursive descent needs a property name or '*'".to_string()),
                "*" => Step::AnyDescendant,
                _ => Step::Descendant(name.to_string()),
            });
            rest = remaining;
        } else if let Some(after) = rest.strip_prefix('.') {
            let (name, remaining) = take_name(after);
            steps.push(match name {
                "" => return Err("empty property name".to_string()),
                "*" => Step::Wildcard,
                _ => Step::Child(name.to_string()),
            });
            rest = remaining;
        } else if let Some(after) = rest.strip_prefix('[') {
            let close = outside_quotes(after, ']')
                .next()
                .ok_or_else(|| "unterminated '['".to_string())?;
            let inner = after[..close].trim();
            steps.push(parse_bracket(inner)?);
            rest = &after[close + 1..];
        } else {
            return Err(format!("unexpected input '{rest}'"));
        }
    }
    Ok(steps)
}

fn take_name(input: &str) -> (&str, &str) {
    let end = input.find(['.', '[']).unwrap_or(input.len());
    (&input[..end], &input[end..])
}

/// Byte offsets of `target` that are not inside a quoted name.
fn outside_quotes(input: &str, target: char) -> impl Iterator<Item = usize> + '_ {
    let mut quote: Option<char> = None;
    input.char_indices().filter_map(move |(i, c)| {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == target => return Some(i),
            None => {}
        }
        None
    })
}

fn parse_bracket(inner: &str) -> Result<Step, String> {
    if inner == "*" {
        return Ok(Step::Wildcard);
    }
    let commas: Vec<usize> = outside_quotes(inner, ',').collect();
    if !commas.is_empty() {
        let mut start = 0;
        let mut parts = Vec::with_capacity(commas.len() + 1);
        for comma in commas {
            parts.push(&inner[start..comma]);
            start = comma + 1;
        }
        parts.push(&inner[start..]);
        let names = parts
            .into_iter()
            .map(|part| match parse_bracket(part.trim())? {
                Step::Child(name) => Ok(name),
                _ => Err(format!("unsupported union member in [{inner}]")),
            })
            .collect::<Result<Vec<_>, String>>()?;
        return Ok(Step::Union(names));
    }
    for quote in ['\'', '"'] {
        if let Some(quoted) = inner.strip_prefix(quote) {
            return quoted
                .strip_suffix(quote)
                .map(|name| Step::Child(name.to_string()))
                .ok_or_else(|| format!("unterminated quote in [{inner}]"));
        }
    }
    inner
        .parse::<usize>()
        .map(Step::Index)
        .map_err(|_| format!("unsupported bracket expression [{inner}]"))
}
