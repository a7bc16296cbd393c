use crate::domain::model::{BookmarkRecord, CleanedLabel, RejectedLink};
use crate::infrastructure::folder_tree::{FolderTree, Handle, Item};
use crate::infrastructure::url_sanitizer::sanitize_href;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use std::fmt::Write as _;
use tokio::fs;

#[derive(Debug, Clone, Default)]
pub struct ParsedExport {
    pub records: Vec<BookmarkRecord>,
    pub rejected: Vec<RejectedLink>,
}

/// Flatten a Netscape bookmark export into records, in document order.
///
/// Every `href` goes through [`sanitize_href`]; refused anchors land in
/// `rejected` and take no source index. The folder path comes from the
/// `<H3>` headings of the enclosing `<DT>` entries.
pub fn parse_bookmarks_html(html: &str) -> Result<ParsedExport> {
    let doc = Html::parse_document(html);
    let anchors =
        Selector::parse("a[href]").map_err(|e| anyhow!("invalid anchor selector: {e}"))?;

    let mut out = ParsedExport::default();
    for a in doc.select(&anchors) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let title = collapse(&a.text().collect::<String>());
        let url = match sanitize_href(href) {
            Ok(url) => url,
            Err(reason) => {
                out.rejected.push(RejectedLink {
                    href: href.to_string(),
                    title,
                    reason,
                });
                continue;
            }
        };
        let record = BookmarkRecord::new(url, title, out.records.len())?;
        out.records.push(
            record
                .with_add_date(a.value().attr("add_date").map(str::to_string))
                .with_icon(a.value().attr("icon").map(str::to_string))
                .with_folder_path(folder_path_of(&a)),
        );
    }
    Ok(out)
}

fn folder_path_of(anchor: &ElementRef<'_>) -> Vec<String> {
    let mut path: Vec<String> = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "dt")
        .filter_map(|dt| {
            dt.children()
                .filter_map(ElementRef::wrap)
                .find(|c| c.value().name() == "h3")
                .map(|h3| collapse(&h3.text().collect::<String>()))
        })
        .collect();
    path.reverse();
    path
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render `(record, label)` pairs as an importable Netscape bookmark file,
/// nested by each record's folder path.
pub fn render_bookmarks_html<'a>(
    entries: impl IntoIterator<Item = (&'a BookmarkRecord, &'a CleanedLabel)>,
) -> String {
    let entries: Vec<(&BookmarkRecord, &CleanedLabel)> = entries.into_iter().collect();

    let mut tree = FolderTree::new();
    for (pos, (record, _)) in entries.iter().enumerate() {
        tree.push_link(record.folder_path(), pos);
    }

    let mut out = String::new();
    out.push_str("<!DOCTYPE NETSCAPE-Bookmark-file-1>\n");
    out.push_str("<!-- This is an automatically generated file.\n");
    out.push_str("     It will be read and overwritten.\n");
    out.push_str("     DO NOT EDIT! -->\n");
    out.push_str("<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n");
    out.push_str("<TITLE>Bookmarks</TITLE>\n");
    out.push_str("<H1>Bookmarks</H1>\n");
    render_folder(&tree, FolderTree::ROOT, &entries, &mut out);
    out
}

fn render_folder(
    tree: &FolderTree,
    h: Handle,
    entries: &[(&BookmarkRecord, &CleanedLabel)],
    out: &mut String,
) {
    let node = tree.node(h);
    let indent = "    ".repeat(node.depth);
    let _ = writeln!(out, "{indent}<DL><p>");
    for item in &node.items {
        match *item {
            Item::Folder(child) => {
                let _ = writeln!(
                    out,
                    "{indent}    <DT><H3>{}</H3>",
                    escape_html(&tree.node(child).name)
                );
                render_folder(tree, child, entries, out);
            }
            Item::Link(pos) => {
                let (record, label) = entries[pos];
                let _ = write!(out, "{indent}    <DT><A HREF=\"{}\"", escape_html(record.url()));
                if let Some(d) = record.add_date() {
                    let _ = write!(out, " ADD_DATE=\"{}\"", escape_html(d));
                }
                if let Some(icon) = record.icon() {
                    let _ = write!(out, " ICON=\"{}\"", escape_html(icon));
                }
                let _ = writeln!(out, ">{}</A>", escape_html(&label.to_string()));
            }
        }
    }
    let _ = writeln!(out, "{indent}</DL><p>");
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub async fn read_bookmarks_html(path: &str) -> Result<ParsedExport> {
    let raw = fs::read_to_string(path).await?;
    parse_bookmarks_html(&raw)
}

pub async fn write_bookmarks_html(path: &str, html: &str) -> Result<()> {
    fs::write(path, html).await?;
    Ok(())
}
