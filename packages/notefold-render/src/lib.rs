use std::collections::{HashMap, HashSet};

use ammonia::Builder;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

const ALLOWED_TAGS: &[&str] = &[
	"p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "blockquote", "code", "pre",
	"strong", "em", "a", "img", "table", "thead", "tbody", "tr", "th", "td", "br", "hr", "input",
	"del", "sup", "sub",
];

/// Renders Markdown into HTML safe to store and serve verbatim.
pub fn render_markdown(markdown: &str) -> String {
	sanitize_html(&markdown_to_html(markdown))
}

/// Converts Markdown to raw, unsanitized HTML with tables, task lists,
/// strikethrough, and generated heading ids enabled.
pub fn markdown_to_html(markdown: &str) -> String {
	let mut options = Options::empty();

	options.insert(Options::ENABLE_TABLES);
	options.insert(Options::ENABLE_TASKLISTS);
	options.insert(Options::ENABLE_STRIKETHROUGH);

	let events = with_heading_ids(Parser::new_ext(markdown, options));
	let mut out = String::new();

	html::push_html(&mut out, events.into_iter());

	out
}

/// Reduces HTML to the allowlisted tag and attribute set. Disallowed markup is
/// stripped rather than escaped; script and style content is removed entirely.
pub fn sanitize_html(html: &str) -> String {
	let mut tag_attributes = HashMap::new();

	tag_attributes.insert("a", HashSet::from(["href", "title"]));
	tag_attributes.insert("img", HashSet::from(["src", "alt", "title"]));
	tag_attributes.insert("input", HashSet::from(["type", "checked", "disabled"]));

	let mut builder = Builder::default();

	builder.tags(ALLOWED_TAGS.iter().copied().collect());
	builder.generic_attributes(HashSet::new());
	builder.tag_attributes(tag_attributes);
	builder.link_rel(None);

	builder.clean(html).to_string()
}

fn with_heading_ids(parser: Parser<'_>) -> Vec<Event<'_>> {
	let events: Vec<Event> = parser.collect();
	let mut seen = HashMap::new();
	let mut out = Vec::with_capacity(events.len());

	for (index, event) in events.iter().enumerate() {
		if let Event::Start(Tag::Heading { level, id: None, classes, attrs }) = event {
			let text = heading_text(&events[index + 1..]);

			out.push(Event::Start(Tag::Heading {
				level: *level,
				id: unique_slug(&mut seen, &text).map(CowStr::from),
				classes: classes.clone(),
				attrs: attrs.clone(),
			}));
		} else {
			out.push(event.clone());
		}
	}

	out
}

fn heading_text(events: &[Event<'_>]) -> String {
	let mut text = String::new();

	for event in events {
		match event {
			Event::End(TagEnd::Heading(_)) => break,
			Event::Text(chunk) | Event::Code(chunk) => text.push_str(chunk),
			_ => {},
		}
	}

	text
}

fn unique_slug(seen: &mut HashMap<String, usize>, text: &str) -> Option<String> {
	let mut slug = String::new();

	for ch in text.chars() {
		if ch.is_alphanumeric() {
			slug.extend(ch.to_lowercase());
		} else if !slug.is_empty() && !slug.ends_with('-') {
			slug.push('-');
		}
	}
	while slug.ends_with('-') {
		slug.pop();
	}

	if slug.is_empty() {
		return None;
	}

	let count = seen.entry(slug.clone()).or_insert(0);

	*count += 1;

	if *count > 1 { Some(format!("{slug}-{}", *count - 1)) } else { Some(slug) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_emphasis() {
		let html = render_markdown("**bold** and _italic_");

		assert!(html.contains("<strong>bold</strong>"));
		assert!(html.contains("<em>italic</em>"));
	}

	#[test]
	fn renders_task_list_inputs() {
		let html = render_markdown("- [x] done\n- [ ] open");

		assert!(html.contains("<input"));
		assert!(html.contains("checkbox"));
		assert!(html.contains("checked"));
	}

	#[test]
	fn renders_tables() {
		let html = render_markdown("| a | b |\n| - | - |\n| 1 | 2 |");

		assert!(html.contains("<table>"));
		assert!(html.contains("<th>a</th>"));
		assert!(html.contains("<td>1</td>"));
	}

	#[test]
	fn renders_strikethrough() {
		let html = render_markdown("~~gone~~");

		assert!(html.contains("<del>gone</del>"));
	}

	#[test]
	fn strips_script_entirely() {
		let html = render_markdown("hello <script>alert('x')</script> world");

		assert!(!html.contains("script"));
		assert!(!html.contains("alert"));
		assert!(html.contains("hello"));
	}

	#[test]
	fn removes_style_content() {
		let html = render_markdown("<style>body { display: none; }</style>\n\nvisible");

		assert!(!html.contains("display"));
		assert!(html.contains("visible"));
	}

	#[test]
	fn strips_event_handler_attributes() {
		let html = render_markdown(r#"<p onclick="steal()">text</p>"#);

		assert!(!html.contains("onclick"));
		assert!(html.contains("text"));
	}

	#[test]
	fn keeps_link_href_and_title_only() {
		let html = render_markdown(r#"[docs](https://example.com "Docs")"#);

		assert!(html.contains(r#"href="https://example.com""#));
		assert!(html.contains(r#"title="Docs""#));
		assert!(!html.contains("rel="));
	}

	#[test]
	fn keeps_image_attributes() {
		let html = render_markdown(r#"![diagram](https://example.com/x.png "Caption")"#);

		assert!(html.contains("<img"));
		assert!(html.contains(r#"src="https://example.com/x.png""#));
		assert!(html.contains(r#"alt="diagram""#));
		assert!(html.contains(r#"title="Caption""#));
	}

	#[test]
	fn keeps_inline_sup_and_sub() {
		let html = render_markdown("E = mc<sup>2</sup> and H<sub>2</sub>O");

		assert!(html.contains("<sup>2</sup>"));
		assert!(html.contains("<sub>2</sub>"));
	}

	#[test]
	fn generates_heading_ids_with_duplicate_suffixes() {
		let raw = markdown_to_html("# Intro\n\n## Setup notes\n\n# Intro");

		assert!(raw.contains(r#"<h1 id="intro">"#));
		assert!(raw.contains(r#"<h2 id="setup-notes">"#));
		assert!(raw.contains(r#"<h1 id="intro-1">"#));
	}

	#[test]
	fn sanitizer_drops_heading_ids() {
		let html = render_markdown("# Intro");

		assert!(!html.contains("id="));
		assert!(html.contains("<h1>Intro</h1>"));
	}

	#[test]
	fn sanitizer_drops_code_language_class() {
		let raw = markdown_to_html("```rust\nfn main() {}\n```");

		assert!(raw.contains("language-rust"));

		let html = render_markdown("```rust\nfn main() {}\n```");

		assert!(!html.contains("language-rust"));
		assert!(html.contains("<code>"));
		assert!(html.contains("fn main()"));
	}

	#[test]
	fn empty_input_renders_empty() {
		assert!(render_markdown("").is_empty());
	}

	#[test]
	fn preserves_unicode_text() {
		let html = render_markdown("# 给我的笔记\n\nср пятница");

		assert!(html.contains("给我的笔记"));
		assert!(html.contains("ср пятница"));
	}
}
