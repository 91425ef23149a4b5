//! Heading-based section tree extraction

use crate::extractor::text::{
    content_text, heading_level, inside_navigation, normalize_whitespace, selector,
};
use crate::extractor::{slugify, Section};
use scraper::{ElementRef, Html};
use std::collections::HashMap;

/// A heading with its accumulated body, before nesting
struct FlatSection {
    id: String,
    title: String,
    level: u8,
    body_text: String,
}

/// Builds the section tree of a document
///
/// Every heading in document order becomes a section whose body is the
/// sibling content up to the next heading of equal or shallower level.
/// Sections are nested with a level-ordered stack, so each child's level is
/// strictly greater than its parent's.
pub fn extract_sections(document: &Html) -> Vec<Section> {
    let Some(heading_selector) = selector("h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    let mut slug_counts: HashMap<String, usize> = HashMap::new();
    let flat: Vec<FlatSection> = document
        .select(&heading_selector)
        .filter_map(|heading| flatten_heading(heading, &mut slug_counts))
        .collect();

    build_tree(flat)
}

fn flatten_heading(
    heading: ElementRef<'_>,
    slug_counts: &mut HashMap<String, usize>,
) -> Option<FlatSection> {
    let level = heading_level(heading.value().name())?;
    if inside_navigation(&heading) {
        return None;
    }

    let title = content_text(heading);
    if title.is_empty() {
        return None;
    }

    Some(FlatSection {
        id: unique_slug(&title, slug_counts),
        body_text: section_body(heading, level),
        title,
        level,
    })
}

/// Gives repeated heading slugs a numeric suffix (`overview`, `overview-1`)
fn unique_slug(title: &str, slug_counts: &mut HashMap<String, usize>) -> String {
    let base = slugify(title);
    let count = slug_counts.entry(base.clone()).or_insert(0);
    let slug = if *count == 0 {
        base
    } else {
        format!("{}-{}", base, count)
    };
    *count += 1;
    slug
}

/// Accumulates sibling content after a heading until a heading of equal or
/// shallower level
fn section_body(heading: ElementRef<'_>, level: u8) -> String {
    let mut body = String::new();

    for sibling in heading.next_siblings() {
        if let Some(text) = sibling.value().as_text() {
            body.push_str(text);
            continue;
        }

        let Some(element) = ElementRef::wrap(sibling) else {
            continue;
        };

        if let Some(next_level) = heading_level(element.value().name()) {
            if next_level <= level {
                break;
            }
        }

        body.push(' ');
        body.push_str(&content_text(element));
    }

    normalize_whitespace(&body)
}

/// Nests flat sections using a stack of open ancestors
fn build_tree(flat: Vec<FlatSection>) -> Vec<Section> {
    let mut roots: Vec<Section> = Vec::new();
    let mut stack: Vec<Section> = Vec::new();

    for item in flat {
        while stack.last().is_some_and(|top| top.level >= item.level) {
            if let Some(done) = stack.pop() {
                attach(done, &mut stack, &mut roots);
            }
        }

        stack.push(Section {
            id: item.id,
            title: item.title,
            level: item.level,
            body_text: item.body_text,
            children: Vec::new(),
        });
    }

    while let Some(done) = stack.pop() {
        attach(done, &mut stack, &mut roots);
    }

    roots
}

fn attach(section: Section, stack: &mut [Section], roots: &mut Vec<Section>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(section),
        None => roots.push(section),
    }
}
