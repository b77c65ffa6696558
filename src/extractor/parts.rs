// file: src/extractor/parts.rs
// description: replacement part and brand resolution from issue lines
// reference: hyperlink-first part naming with text heuristics as fallback

use crate::config::LinkConfig;
use crate::extractor::patterns::{NON_SEARCH_CHARS, URL_IN_PARENS};
use crate::models::{Brand, Part};
use crate::parser::Hyperlink;

const ADVANTAGE_MARKER: &str = "eEuroparts Advantage:";

pub struct PartResolver<'a> {
    links: &'a LinkConfig,
}

impl<'a> PartResolver<'a> {
    pub fn new(links: &'a LinkConfig) -> Self {
        Self { links }
    }

    /// Builds a part from one line of the "Parts to Replace" field. The first
    /// labelled hyperlink of the paragraph names the part when present.
    pub fn resolve(&self, text: &str, hyperlinks: &[Hyperlink]) -> Part {
        let text = text.trim();

        if let Some(link) = hyperlinks.iter().find(|link| !link.is_raw_url()) {
            return Self::from_hyperlink(text, link);
        }

        if let Some(caps) = URL_IN_PARENS.captures(text)
            && let (Some(whole), Some(url)) = (caps.get(0), caps.get(1))
        {
            return Part {
                name: text[..whole.start()].trim().to_string(),
                description: with_separator(&text[whole.end()..]),
                link: url.as_str().trim().to_string(),
            };
        }

        self.from_plain_text(text)
    }

    /// Brand list from the text after the "Brands" label.
    pub fn brands(&self, text: &str) -> Vec<Brand> {
        let text = match text.find(ADVANTAGE_MARKER) {
            Some(idx) => &text[..idx],
            None => text,
        };

        text.replace(" and ", ",")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Brand::new(name, &self.links.brand_base_url))
            .collect()
    }

    fn from_hyperlink(text: &str, link: &Hyperlink) -> Part {
        let text = URL_IN_PARENS.replace(text, "");
        let description = text
            .find(link.text.as_str())
            .map(|idx| with_separator(&text[idx + link.text.len()..]))
            .unwrap_or_default();

        Part {
            name: link.text.clone(),
            description,
            link: link.url.clone(),
        }
    }

    fn from_plain_text(&self, text: &str) -> Part {
        let (mut name, mut description) = match split_article(text) {
            Some((name, article, rest)) => (name.trim().to_string(), format!("{}{}", article, rest.trim())),
            None => (text.to_string(), String::new()),
        };

        if let Some((head, tail)) = name.split_once(" The ") {
            description = format!(" The {}{}", tail.trim(), description);
            name = head.trim().to_string();
        }

        // Lowercase words glued to a model code belong to the description.
        if name.chars().any(|c| c.is_ascii_digit())
            && let Some((idx, c)) = name
                .char_indices()
                .rev()
                .find(|(_, c)| c.is_ascii_digit() || c.is_uppercase())
        {
            let cut = idx + c.len_utf8();
            description = format!("{}{}", &name[cut..], description);
            name.truncate(cut);
        }

        let link = self.search_link(&name);
        Part {
            name,
            description,
            link,
        }
    }

    fn search_link(&self, name: &str) -> String {
        let query = NON_SEARCH_CHARS
            .replace_all(name, "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("+");
        format!("{}{}", self.links.part_search_url, query)
    }
}

fn split_article(text: &str) -> Option<(&str, &'static str, &str)> {
    [" is a ", " is an "].into_iter().find_map(|article| {
        text.split_once(article)
            .map(|(name, rest)| (name, article, rest))
    })
}

fn with_separator(rest: &str) -> String {
    let rest = rest.trim();
    if rest.is_empty() {
        String::new()
    } else {
        format!(" {}", rest)
    }
}
