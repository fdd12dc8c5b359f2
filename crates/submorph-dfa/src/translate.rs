//! Turns a [`DSLTemplate`]'s generative body (everything before the fixed
//! `.{{root}}` suffix) into regex text the rest of this crate understands:
//! every placeholder expands to an explicit alternation of its possible
//! values, so the translated pattern is always a finite language.

use submorph_core::{DSLTemplate, DSLVariable, NumberRange};

/// Convert `template` to regex text. The `.{{root}}` suffix is dropped —
/// it names a fixed literal, not a generative slot, and the rest of this
/// crate only needs to count the generative part.
#[must_use]
pub fn template_to_regex(template: &DSLTemplate) -> String {
    let body = template
        .template
        .strip_suffix(".{{root}}")
        .unwrap_or(&template.template);

    let mut out = String::new();
    let mut i = 0;
    while i < body.len() {
        if body[i..].starts_with("{{") {
            let close = body[i..]
                .find("}}")
                .map_or(body.len(), |offset| i + offset);
            let name = &body[i + 2..close];
            if let Some(var) = template.variables.iter().find(|v| v.name() == name) {
                out.push_str(&render_variable(var));
            }
            i = close + 2;
        } else {
            let ch = body[i..].chars().next().expect("i < body.len()");
            out.push(ch);
            i += ch.len_utf8();
        }
    }
    out
}

fn render_variable(var: &DSLVariable) -> String {
    match var {
        DSLVariable::Payload { payloads, .. } => format!("({})", payloads.join("|")),
        DSLVariable::Number { range, .. } => format!("({})", render_number_range(range)),
    }
}

fn render_number_range(range: &NumberRange) -> String {
    let step = i64::from(range.step.max(1));
    let mut values = Vec::new();
    let mut n = range.start;
    while n <= range.end {
        values.push(format_number(n, &range.format));
        n += step;
    }
    values.join("|")
}

fn format_number(n: i64, format: &str) -> String {
    if let Some(width) = format
        .strip_prefix("%0")
        .and_then(|s| s.strip_suffix('d'))
        .and_then(|w| w.parse::<usize>().ok())
    {
        format!("{n:0width$}")
    } else {
        n.to_string()
    }
}
