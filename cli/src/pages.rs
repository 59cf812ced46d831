//! Plain-text page renderers for the builtin cheat-sheet pages

use sheetnav_core::config::pages;
use sheetnav_core::{ResolvedRoute, Router, SiteShellBuilder};

fn sheet_index(_route: &ResolvedRoute) -> String {
    [
        "Reference sheets for game mechanics.",
        "Open one with `open sheet sheetid=<id>` or `go /sheets/<id>`.",
    ]
    .join("\n")
}

fn sheet(route: &ResolvedRoute) -> String {
    let mut body = format!("Sheet: {}", route.param("sheetid").unwrap_or("-"));
    if let Some(section) = route.param("section") {
        body.push_str(&format!("\nSection: {}", section));
    }
    if let Some(hash) = &route.hash {
        body.push_str(&format!("\nAnchor: #{}", hash));
    }
    body
}

fn not_found(path: &str) -> String {
    format!("Nothing here: {}\nTry `go /sheets`.", path)
}

/// Shell builder with the builtin renderers registered
pub fn shell_builder(router: Router, title: &str) -> SiteShellBuilder {
    SiteShellBuilder::new(router)
        .title(title)
        .page(pages::SHEET_INDEX, sheet_index)
        .page(pages::SHEET, sheet)
        .page(pages::NOT_FOUND, |route: &ResolvedRoute| {
            not_found(&route.full_path)
        })
        .fallback(not_found)
}
