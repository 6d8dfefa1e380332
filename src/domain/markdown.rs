//! Markdown rendering for assistant answers.
//!
//! Backend text is untrusted. Both renderers neutralize embedded markup:
//! raw HTML is emitted as escaped text, script-capable link destinations are
//! replaced, and terminal control characters are dropped.

use crossterm::style::{Attribute, Color, ContentStyle};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// URL schemes that can execute code when followed.
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

/// Convert markdown to sanitized HTML. Pure: the same input always yields the same output.
///
/// Kept for HTML front ends embedding the library; the bundled terminal client
/// uses [`to_terminal`].
pub fn to_html(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, options()).map(sanitize_event);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    // Browsers ignore embedded whitespace/control chars in schemes ("java\tscript:").
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if BLOCKED_SCHEMES.iter().any(|s| normalized.starts_with(s)) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

/// Remove control characters (ANSI escapes, BEL, ...) except newline and tab.
pub fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Render markdown as ANSI-styled terminal text.
pub fn to_terminal(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut styles = vec![ContentStyle::new()];
    // One entry per open list: next ordinal for ordered lists, None for bullets.
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Strong => push_attribute(&mut styles, Attribute::Bold),
                Tag::Emphasis => push_attribute(&mut styles, Attribute::Italic),
                Tag::Strikethrough => push_attribute(&mut styles, Attribute::CrossedOut),
                Tag::Link { .. } => push_attribute(&mut styles, Attribute::Underlined),
                Tag::Heading { .. } => {
                    ensure_line_start(&mut out);
                    push_attribute(&mut styles, Attribute::Bold);
                }
                Tag::CodeBlock(_) => {
                    ensure_line_start(&mut out);
                    push_color(&mut styles, Color::DarkYellow);
                }
                Tag::List(start) => {
                    ensure_line_start(&mut out);
                    lists.push(start);
                }
                Tag::Item => {
                    ensure_line_start(&mut out);
                    out.push_str(&"  ".repeat(lists.len().saturating_sub(1)));
                    match lists.last_mut() {
                        Some(Some(n)) => {
                            out.push_str(&format!("{}. ", n));
                            *n += 1;
                        }
                        _ => out.push_str("• "),
                    }
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough | TagEnd::Link => {
                    pop_style(&mut styles);
                }
                TagEnd::Heading(_) => {
                    pop_style(&mut styles);
                    end_block(&mut out, &lists);
                }
                TagEnd::Paragraph => end_block(&mut out, &lists),
                TagEnd::CodeBlock => {
                    pop_style(&mut styles);
                    out.push('\n');
                }
                TagEnd::Item => ensure_line_start(&mut out),
                TagEnd::List(_) => {
                    lists.pop();
                    if lists.is_empty() {
                        out.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                push_styled(&mut out, current(&styles), &text);
            }
            Event::Code(code) => {
                let mut style = current(&styles);
                style.foreground_color = Some(Color::Yellow);
                push_styled(&mut out, style, &code);
            }
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::Rule => {
                ensure_line_start(&mut out);
                out.push_str("────────\n");
            }
            Event::TaskListMarker(done) => out.push_str(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn current(styles: &[ContentStyle]) -> ContentStyle {
    styles.last().copied().unwrap_or_default()
}

fn push_attribute(styles: &mut Vec<ContentStyle>, attribute: Attribute) {
    let mut style = current(styles);
    style.attributes.set(attribute);
    styles.push(style);
}

fn push_color(styles: &mut Vec<ContentStyle>, color: Color) {
    let mut style = current(styles);
    style.foreground_color = Some(color);
    styles.push(style);
}

fn pop_style(styles: &mut Vec<ContentStyle>) {
    if styles.len() > 1 {
        styles.pop();
    }
}

fn ensure_line_start(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Blank line between top-level blocks; single break inside lists.
fn end_block(out: &mut String, lists: &[Option<u64>]) {
    if lists.is_empty() {
        out.push_str("\n\n");
    } else {
        ensure_line_start(out);
    }
}

fn push_styled(out: &mut String, style: ContentStyle, text: &str) {
    let clean = strip_controls(text);
    if clean.is_empty() {
        return;
    }
    if style.attributes.is_empty() && style.foreground_color.is_none() {
        out.push_str(&clean);
    } else {
        out.push_str(&style.apply(clean).to_string());
    }
}
