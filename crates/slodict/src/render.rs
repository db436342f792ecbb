//! HTML for inflection sections and definition pages.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use sloleks_db::SskjEntry;
use sloleks_inflect::{AnnotatedForm, InflectionSection, Table};
use sloleks_types::Entry;

const BASE_HTML: &str = include_str!("../templates/base.html");
const STYLE_CSS: &str = include_str!("../templates/style.css");
const FOOTER_HTML: &str = include_str!("../templates/footer.html");
const SCRIPT_JS: &str = include_str!("../templates/script.js");

/// Wrap `body` in the page shell.
pub fn render_page(title: &str, body: &str) -> String {
    BASE_HTML
        .replace("{{title}}", &text(title))
        .replace("{{style}}", STYLE_CSS)
        .replace("{{footer}}", FOOTER_HTML)
        .replace("{{scripts}}", &format!("<script>{SCRIPT_JS}</script>"))
        .replace("{{body}}", body)
}

/// One entry of a lemma together with its assembled tables.
pub struct RenderedEntry<'a> {
    pub entry: &'a Entry,
    pub section: InflectionSection,
}

/// Full page for a lemma: one collapsible inflection section per entry,
/// then the explanatory definitions when there are any.
pub fn render_lemma_page(
    lemma: &str,
    entries: &[RenderedEntry<'_>],
    definitions: &[&SskjEntry],
) -> String {
    let mut body = format!("<h1>{}</h1>\n", text(lemma));
    for (idx, rendered) in entries.iter().enumerate() {
        let id = format!("inflection_{idx}");
        let _ = write!(
            body,
            r#"<div class="container"><button class="button" data-target="{id}">inflections</button><div class="content" id="{id}">"#,
            id = attr(&id),
        );
        body.push_str(&render_section(rendered.entry, &rendered.section));
        body.push_str("</div></div>\n");
    }
    if !definitions.is_empty() {
        body.push_str(&render_definitions(definitions));
    }
    render_page(lemma, &body)
}

/// Heading with part of speech, form count and lemma features, followed by
/// every table.
pub fn render_section(entry: &Entry, section: &InflectionSection) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<p class=\"heading\"><b>{}-{}</b>",
        text(entry.part_of_speech()),
        entry.grammar_names().count()
    );
    let features: Vec<String> = entry
        .lemma_features()
        .iter()
        .map(|(name, value)| format!("<em>{}: {}</em>", text(name), text(value)))
        .collect();
    if !features.is_empty() {
        out.push_str("; ");
        out.push_str(&features.join(", "));
    }
    out.push_str("</p>\n");
    for table in &section.tables {
        out.push_str(&render_table(table));
    }
    out
}

pub fn render_table(table: &Table) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<p class=\"lineabove\"><b>{}</b></p>\n<table class=\"inflection\">\n",
        text(&title_case(&table.name))
    );
    if table.column_headers {
        out.push_str("<tr>");
        if table.row_headers {
            out.push_str("<th></th>");
        }
        for column in &table.columns {
            let _ = write!(out, "<th>{}</th>", text(column));
        }
        out.push_str("</tr>\n");
    }
    for (row_label, row) in table.rows.iter().zip(&table.cells) {
        out.push_str("<tr>");
        if table.row_headers {
            let _ = write!(out, "<th>{}</th>", text(row_label));
        }
        for cell in row {
            let _ = write!(out, "<td title=\"{}\">", attr(&cell.key.to_string()));
            for form in &cell.forms {
                out.push_str(&render_form(form));
            }
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

/// A form with bolded non-stem segments, graying, weirdness label and the
/// pronunciation popup.
pub fn render_form(form: &AnnotatedForm) -> String {
    let mut word = String::new();
    for segment in &form.segments {
        if segment.emphasized {
            let _ = write!(word, "<b>{}</b>", text(&segment.text));
        } else {
            word.push_str(&text(&segment.text));
        }
    }
    if form.deemphasized {
        word = format!("<span class=\"gray\">{word}</span>");
    }
    if let Some(reason) = form.weirdness {
        let _ = write!(word, "<br><span class=\"gray-small-ital\">{reason}</span>");
    }

    let mut popup = String::new();
    if !form.accentuation.is_empty() {
        popup.push_str(&lines(&form.accentuation));
        popup.push_str("<br>");
    }
    popup.push_str("Pronunciation:");
    for (script, pronunciation) in &form.pronunciation {
        let _ = write!(popup, "<br>{}: {}", text(script), lines(pronunciation));
    }
    if !form.norms.is_empty() {
        let _ = write!(
            popup,
            "<br><span class=\"gray-small-ital\">{}</span>",
            text(&form.norms.join(", "))
        );
    }

    format!(
        "<span class=\"pop-up\" title=\"{}\">{word}<span class=\"pop-up-content\">{popup}</span></span>",
        attr(&form.grammar_name)
    )
}

pub fn render_definitions(definitions: &[&SskjEntry]) -> String {
    let mut out = String::from("<section class=\"definitions lineabove\">\n");
    for entry in definitions {
        let _ = writeln!(
            out,
            "<p class=\"accentuation\">{}</p>",
            text(&entry.accentuation)
        );
        if entry.definitions.is_empty() {
            continue;
        }
        out.push_str("<ol>\n");
        for definition in &entry.definitions {
            let _ = writeln!(out, "<li>{}</li>", text(definition));
        }
        out.push_str("</ol>\n");
    }
    out.push_str("</section>\n");
    out
}

fn lines(raw: &str) -> String {
    raw.lines()
        .map(|l| text(l).into_owned())
        .collect::<Vec<_>>()
        .join("<br>")
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
