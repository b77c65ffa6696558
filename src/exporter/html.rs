// file: src/exporter/html.rs
// description: html report rendering of a parsed vehicle guide
// reference: https://docs.rs/html-escape

use crate::config::RenderConfig;
use crate::error::{ReportError, Result};
use crate::models::{Issue, IssueCategory, SpecCategory, VehicleGuide, ViewName};
use crate::utils::template::PageTemplate;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::collections::HashMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const DEFAULT_ISSUES_HEADING: &str = "Common Issues";

pub struct HtmlRenderer {
    template: PageTemplate,
}

impl HtmlRenderer {
    pub fn new(template: PageTemplate) -> Self {
        Self { template }
    }

    /// Uses the configured template file, or the built-in page.
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        let template = match &config.template_path {
            Some(path) => {
                debug!("Loading template from {}", path.display());
                PageTemplate::from_file(path)?
            }
            None => PageTemplate::builtin(),
        };

        let names = template.placeholders();
        for required in ["heading", "specs", "issues"] {
            if !names.contains(&required) {
                warn!("Template has no {{{}}} placeholder", required);
            }
        }

        Ok(Self::new(template))
    }

    pub fn render(&self, guide: &VehicleGuide) -> String {
        let mut values: HashMap<&str, String> = HashMap::new();

        values.insert("heading", text(&guide.heading).into_owned());
        values.insert("description", description_fragment(&guide.description));
        let issues_heading = if guide.issues_heading.is_empty() {
            DEFAULT_ISSUES_HEADING
        } else {
            guide.issues_heading.as_str()
        };
        values.insert("issues_heading", text(issues_heading).into_owned());

        for view in ViewName::ALL {
            let url = guide.images.get(&view).map(String::as_str).unwrap_or("");
            values.insert(image_placeholder(view), attr(url).into_owned());
        }

        values.insert("specs", specs_fragment(guide));
        values.insert("issues", issues_fragment(guide));
        values.insert("issue_count", guide.issue_count().to_string());

        self.template.render(&values)
    }

    /// Renders and writes the page, creating parent directories as needed.
    pub fn write(&self, guide: &VehicleGuide, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ReportError::FileOperation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let html = self.render(guide);
        fs::write(output, &html).map_err(|source| ReportError::FileOperation {
            path: output.to_path_buf(),
            source,
        })?;

        info!("Wrote {} ({} bytes)", output.display(), html.len());
        Ok(())
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(PageTemplate::builtin())
    }
}

fn image_placeholder(view: ViewName) -> &'static str {
    match view {
        ViewName::Front => "image_front",
        ViewName::Side => "image_side",
        ViewName::Rear => "image_rear",
        ViewName::Quarter => "image_quarter",
    }
}

fn description_fragment(description: &str) -> String {
    description
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("<p>{}</p>", text(p.trim())))
        .collect::<Vec<_>>()
        .join("\n")
}

fn specs_fragment(guide: &VehicleGuide) -> String {
    let mut html = String::new();

    for category in SpecCategory::ALL {
        let Some(table) = guide.specs.get(&category).filter(|t| !t.is_empty()) else {
            continue;
        };

        let _ = writeln!(html, "<section class=\"spec-category\">");
        let _ = writeln!(html, "<h3>{}</h3>", text(category.as_str()));
        let _ = writeln!(html, "<table class=\"spec-table\">");
        for entry in table.iter() {
            let _ = writeln!(
                html,
                "<tr><th>{}</th><td>{}</td></tr>",
                text(&entry.key),
                text(&entry.value)
            );
        }
        let _ = writeln!(html, "</table>\n</section>");
    }

    html
}

fn issues_fragment(guide: &VehicleGuide) -> String {
    let mut html = String::new();

    for category in IssueCategory::ALL {
        let issues = guide.issues_in(category);
        if issues.is_empty() {
            continue;
        }

        let _ = writeln!(html, "<section class=\"issue-category\">");
        let _ = writeln!(html, "<h3>{}</h3>", text(category.as_str()));
        for issue in issues {
            issue_fragment(&mut html, issue);
        }
        let _ = writeln!(html, "</section>");
    }

    html
}

fn issue_fragment(html: &mut String, issue: &Issue) {
    let _ = writeln!(html, "<article class=\"issue\">");
    let _ = writeln!(html, "<h4>{}</h4>", text(&issue.title));

    if !issue.fault_codes.is_empty() {
        let _ = writeln!(
            html,
            "<p class=\"fault-codes\"><strong>Fault Codes:</strong> {}</p>",
            text(&issue.fault_codes)
        );
    }
    if !issue.why.is_empty() {
        let _ = writeln!(
            html,
            "<p class=\"why\"><strong>Why it happens:</strong> {}</p>",
            text(&issue.why)
        );
    }

    if !issue.symptoms.is_empty() {
        let _ = writeln!(html, "<div class=\"symptoms\"><strong>Symptoms:</strong>\n<ul>");
        for symptom in &issue.symptoms {
            let _ = writeln!(html, "<li>{}</li>", text(symptom));
        }
        let _ = writeln!(html, "</ul>\n</div>");
    }

    if !issue.parts.is_empty() {
        let _ = writeln!(html, "<div class=\"parts\"><strong>Parts to Replace:</strong>\n<ul>");
        for part in &issue.parts {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a>{}</li>",
                attr(&part.link),
                text(&part.name),
                text(&part.description)
            );
        }
        let _ = writeln!(html, "</ul>\n</div>");
    }

    if !issue.brands.is_empty() {
        let links = issue
            .brands
            .iter()
            .map(|b| format!("<a href=\"{}\">{}</a>", attr(&b.link), text(&b.name)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(html, "<p class=\"brands\"><strong>Brands:</strong> {}</p>", links);
    }

    let _ = writeln!(html, "</article>");
}
