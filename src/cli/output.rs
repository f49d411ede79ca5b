//! Output formatting utilities

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::core::callbacks::Choice;
use crate::core::component::Component;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if is_list {
                OutputFormat::Tsv
            } else {
                OutputFormat::Tree
            }
        }
        other => other,
    }
}

/// Print a serializable value as YAML or JSON
pub fn print_serialized<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
        }
        _ => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "PATH")]
    path: String,
    #[tabled(rename = "PART")]
    part: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "ITERATION")]
    iteration: u32,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

/// Print a resolved structure
pub fn print_structure(root: &Component, format: OutputFormat) -> Result<()> {
    match effective_format(format, false) {
        OutputFormat::Tree | OutputFormat::Auto => print!("{}", render_tree(root)),
        OutputFormat::Tsv => {
            println!("depth\tpath\tpart\tversion\titeration\tamount");
            root.walk(&mut |node, depth| {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    depth,
                    node.path,
                    node.number(),
                    node.version(),
                    node.retained_iteration.iteration,
                    format_amount(node.amount)
                );
            });
        }
        OutputFormat::Table => {
            let mut rows = Vec::new();
            root.walk(&mut |node, depth| {
                rows.push(NodeRow {
                    path: if node.path.is_empty() {
                        "-".to_string()
                    } else {
                        node.path.clone()
                    },
                    part: format!("{}{}", "  ".repeat(depth), node.number()),
                    version: node.version().to_string(),
                    iteration: node.retained_iteration.iteration,
                    amount: format_amount(node.amount),
                });
            });
            println!("{}", Table::new(rows).with(Style::sharp()));
        }
        other => print_serialized(root, other)?,
    }
    Ok(())
}

/// Render a structure as an indented tree
pub fn render_tree(root: &Component) -> String {
    fn label(node: &Component) -> String {
        let name = node
            .part_master
            .name
            .as_deref()
            .map(|n| format!(" {}", style(truncate_str(n, 40)).dim()))
            .unwrap_or_default();
        format!(
            "{} {}{}",
            style(node.number()).cyan(),
            style(format!(
                "{}.{}",
                node.version(),
                node.retained_iteration.iteration
            ))
            .yellow(),
            name
        )
    }

    fn push_children<'a>(
        stack: &mut Vec<(&'a Component, String, bool)>,
        node: &'a Component,
        prefix: &str,
    ) {
        let count = node.children.len();
        for (idx, child) in node.children.iter().enumerate().rev() {
            stack.push((child, prefix.to_string(), idx + 1 == count));
        }
    }

    let mut out = format!("{}\n", label(root));
    // Each entry: node, prefix inherited from its parent, last among siblings
    let mut stack = Vec::new();
    push_children(&mut stack, root, "");
    while let Some((node, prefix, last)) = stack.pop() {
        let connector = if last { "└── " } else { "├── " };
        out.push_str(&format!(
            "{}{}{} x{} {}\n",
            prefix,
            connector,
            label(node),
            format_amount(node.amount),
            style(format!("[{}]", node.path)).dim()
        ));
        let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
        push_children(&mut stack, node, &next);
    }
    out
}

#[derive(Tabled)]
struct ChoiceRow {
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "SUBJECT")]
    subject: String,
    #[tabled(rename = "OPTIONS")]
    options: String,
}

/// Print the open decisions collected during a walk
pub fn print_choices(choices: &[Choice], format: OutputFormat) -> Result<()> {
    match effective_format(format, true) {
        OutputFormat::Tsv | OutputFormat::Auto | OutputFormat::Tree => {
            println!("kind\tsubject\toptions");
            for choice in choices {
                println!(
                    "{}\t{}\t{}",
                    choice.kind,
                    choice.subject,
                    choice.options.join(",")
                );
            }
        }
        OutputFormat::Table => {
            let rows: Vec<ChoiceRow> = choices
                .iter()
                .map(|c| ChoiceRow {
                    kind: c.kind.to_string(),
                    subject: c.subject.clone(),
                    options: c.options.join(", "),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
        }
        other => print_serialized(&choices, other)?,
    }
    Ok(())
}

/// Warn on stderr about decisions a lenient walk skipped over
pub fn warn_choices(choices: &[Choice]) {
    if choices.is_empty() {
        return;
    }
    eprintln!(
        "{} {} open decision(s):",
        style("!").yellow(),
        choices.len()
    );
    for choice in choices {
        eprintln!(
            "  {} {} {}",
            style(choice.kind).yellow(),
            choice.subject,
            style(choice.options.join(", ")).dim()
        );
    }
}

/// Amounts without a trailing `.0` when whole
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}
