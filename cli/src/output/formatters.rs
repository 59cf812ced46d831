//! Text formatting for routes, tables and rendered pages

use colored::Colorize;
use sheetnav_core::router::RouteRecord;
use sheetnav_core::{NavigationError, Rendered, RenderStatus, ResolvedRoute, RouteTarget};

/// One-line summary plus detail lines for a resolved route
pub fn format_resolution(input: &str, route: &ResolvedRoute) -> String {
    let mut out = format!(
        "{} -> {} (page {})",
        input,
        route.name.green().bold(),
        route.page
    );
    if let Some(from) = &route.redirected_from {
        out.push_str(&format!(", redirected from {}", from.yellow()));
    }

    if !route.params.is_empty() {
        let params: Vec<String> = route
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        out.push_str(&format!("\n    params:  {}", params.join(" ")));
    }
    if !route.query.is_empty() {
        let query: Vec<String> = route
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        out.push_str(&format!("\n    query:   {}", query.join(" ")));
    }
    if let Some(hash) = &route.hash {
        out.push_str(&format!("\n    hash:    {}", hash));
    }
    out.push_str(&format!("\n    path:    {}", route.full_path));
    out.push_str(&format!("\n    matched: {}", route.matched.join(" > ")));
    out
}

/// Failed resolution line
pub fn format_failure(input: &str, error: &NavigationError) -> String {
    format!("{} -> {} {}", input, "error:".red().bold(), error)
}

/// One line per record, in match order, indented by nesting depth
pub fn format_table(records: &[RouteRecord]) -> String {
    let name_width = records
        .iter()
        .map(|r| r.name.len() + 2 * (r.chain.len() - 1))
        .max()
        .unwrap_or(0);

    records
        .iter()
        .map(|record| {
            let indent = "  ".repeat(record.chain.len() - 1);
            let name = format!("{}{}", indent, record.name);
            let target = match &record.target {
                RouteTarget::Page(page) => format!("page {}", page),
                RouteTarget::Redirect(to) => format!("redirect -> {}", to),
            };
            format!(
                "{:<width$}  {:<32}  {}",
                name,
                record.pattern.to_string(),
                target,
                width = name_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A rendered page for the interactive shell
pub fn format_rendered(rendered: &Rendered) -> String {
    let header = match rendered.status {
        RenderStatus::Ok => format!("== {} ==", rendered.title).bold().to_string(),
        RenderStatus::NotFound => format!("== {} (not found) ==", rendered.title)
            .red()
            .to_string(),
    };
    format!("{}\n{}", header, rendered.body)
}
