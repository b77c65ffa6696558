// file: src/extractor/issue.rs
// description: forward-only field state machine for a single diagnostic issue
// reference: title, fault codes, why, symptoms, parts and brands in canonical order

use crate::extractor::parts::PartResolver;
use crate::extractor::patterns::{
    AFTER_FAULT_CODES, AFTER_PARTS, AFTER_SYMPTOMS, AFTER_WHY, BRANDS_LABEL, FAULT_CODES_LABEL,
    PARTS_LABEL, SYMPTOMS_LABEL, TITLE_FIELD, WHY_LABEL, is_numbered, strip_numbering, value_end,
};
use crate::extractor::sections::issue_category_for;
use crate::models::Issue;
use crate::parser::{HyperlinkResolver, LineRecord, ParagraphId};
use tracing::debug;

const MAX_TITLE_CHARS: usize = 200;
const MAX_IMPLICIT_KEY_CHARS: usize = 50;
const EMPTY_FAULT_CODES: [&str; 3] = ["n/a", "none", "null"];

/// Issue fields in the order they appear in a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Title,
    FaultCodes,
    Why,
    Symptoms,
    Parts,
    Brands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Fields,
    /// Greedy symptom capture. Implicit lists also stop at numbered lines.
    SymptomList { implicit: bool },
    PartList,
}

/// Where a field line sits. Title lines carry a whole issue inline, so every
/// later label on them is applied. Field lines only continue into Why after
/// Fault Codes and into Brands after Parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineScope {
    Title,
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    End,
}

struct IssueState {
    issue: Issue,
    closed: Field,
    mode: Mode,
}

impl IssueState {
    fn new(title: String) -> Self {
        Self {
            issue: Issue::new(title),
            closed: Field::Title,
            mode: Mode::Fields,
        }
    }

    fn is_open(&self, field: Field) -> bool {
        field > self.closed
    }

    /// Closes `field` and every field before it.
    fn close(&mut self, field: Field) {
        self.closed = self.closed.max(field);
    }

    fn push_symptom(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let key = strip_numbering(text).to_lowercase();
        let exists = self
            .issue
            .symptoms
            .iter()
            .any(|s| strip_numbering(s).to_lowercase() == key);
        if !exists {
            self.issue.symptoms.push(text.to_string());
        }
    }

    fn extend_title(&mut self, text: &str) {
        let title = &mut self.issue.title;
        if title.is_empty() {
            title.push_str(text);
        } else if title.chars().count() < MAX_TITLE_CHARS {
            title.push(' ');
            title.push_str(text);
        }
    }

    fn finish(mut self) -> Option<Issue> {
        self.issue.title = strip_numbering(&self.issue.title).to_string();
        if self.issue.title.is_empty() {
            debug!("Dropping issue without a title");
            return None;
        }
        Some(self.issue)
    }
}

/// Parses the issue blocks of a category section.
pub struct IssueParser<'a> {
    hyperlinks: HyperlinkResolver<'a>,
    parts: PartResolver<'a>,
}

impl<'a> IssueParser<'a> {
    pub fn new(hyperlinks: HyperlinkResolver<'a>, parts: PartResolver<'a>) -> Self {
        Self { hyperlinks, parts }
    }

    /// Parses the issue seeded at `lines[start]`. Returns the issue, if it has
    /// a title, and the index of the line that ended the block. That line has
    /// not been consumed.
    pub fn parse_block(&self, lines: &[LineRecord], start: usize) -> (Option<Issue>, usize) {
        let Some(seed) = lines.get(start) else {
            return (None, start);
        };

        let mut state = self.seed(seed);
        let mut next = start + 1;

        while let Some(line) = lines.get(next) {
            if issue_category_for(&line.text).is_some() {
                break;
            }
            if self.step(&mut state, line) == Step::End {
                break;
            }
            next += 1;
        }

        (state.finish(), next)
    }

    fn seed(&self, line: &LineRecord) -> IssueState {
        let text = line.text.trim();

        match TITLE_FIELD.find(text) {
            Some(m) => {
                let mut state = IssueState::new(text[..m.start()].trim().to_string());
                self.apply_field(&mut state, &text[m.start()..], line.paragraph, LineScope::Title);
                state
            }
            None => IssueState::new(text.to_string()),
        }
    }

    fn step(&self, state: &mut IssueState, line: &LineRecord) -> Step {
        let text = line.text.trim();

        match state.mode {
            Mode::SymptomList { implicit } => {
                let stops = PARTS_LABEL.is_match(text)
                    || BRANDS_LABEL.is_match(text)
                    || (implicit && is_numbered(text));
                if !stops {
                    state.push_symptom(text);
                    return Step::Continue;
                }
                state.mode = Mode::Fields;
            }
            Mode::PartList => {
                if !BRANDS_LABEL.is_match(text) {
                    let part = self.parts.resolve(text, &self.hyperlinks.resolve(line.paragraph));
                    state.issue.parts.push(part);
                    return Step::Continue;
                }
                state.mode = Mode::Fields;
            }
            Mode::Fields => {}
        }

        if self.apply_field(state, text, line.paragraph, LineScope::Field) {
            return Step::Continue;
        }

        if Self::is_implicit_symptom(state, text) {
            state.close(Field::Symptoms);
            state.push_symptom(text);
            state.mode = Mode::SymptomList { implicit: true };
            return Step::Continue;
        }

        if !state.is_open(Field::Brands) || state.issue.has_content() {
            return Step::End;
        }

        state.extend_title(text);
        Step::Continue
    }

    /// Applies a labelled field at the start of `segment`. Values captured
    /// inline stop at the next label. What follows depends on `scope`.
    fn apply_field(
        &self,
        state: &mut IssueState,
        segment: &str,
        paragraph: ParagraphId,
        scope: LineScope,
    ) -> bool {
        let segment = segment.trim();

        if state.is_open(Field::FaultCodes)
            && let Some(m) = FAULT_CODES_LABEL.find(segment)
        {
            state.close(Field::FaultCodes);
            let rest = &segment[m.end()..];
            let end = value_end(rest, &AFTER_FAULT_CODES);
            let value = rest[..end].trim();
            if !EMPTY_FAULT_CODES.contains(&value.to_lowercase().as_str()) {
                state.issue.fault_codes = value.to_string();
            }

            let tail = rest[end..].trim();
            if scope == LineScope::Title || WHY_LABEL.is_match(tail) {
                self.apply_remainder(state, tail, paragraph, scope);
            }
            return true;
        }

        if state.is_open(Field::Why)
            && let Some(m) = WHY_LABEL.find(segment)
        {
            state.close(Field::Why);
            let rest = &segment[m.end()..];
            let end = value_end(rest, &AFTER_WHY);
            state.issue.why = rest[..end].trim().to_string();
            if scope == LineScope::Title {
                self.apply_remainder(state, &rest[end..], paragraph, scope);
            }
            return true;
        }

        if state.is_open(Field::Symptoms)
            && let Some(m) = SYMPTOMS_LABEL.find(segment)
        {
            state.close(Field::Symptoms);
            let rest = segment[m.end()..].trim();

            if scope == LineScope::Field {
                // The whole line after the label is one symptom unless a
                // later label starts it.
                if !self.apply_field(state, rest, paragraph, scope) {
                    state.push_symptom(rest);
                    state.mode = Mode::SymptomList { implicit: false };
                }
                return true;
            }

            let end = value_end(rest, &AFTER_SYMPTOMS);
            state.push_symptom(&rest[..end]);
            if rest[end..].trim().is_empty() {
                state.mode = Mode::SymptomList { implicit: false };
            } else {
                self.apply_remainder(state, &rest[end..], paragraph, scope);
            }
            return true;
        }

        if state.is_open(Field::Parts)
            && let Some(m) = PARTS_LABEL.find(segment)
        {
            state.close(Field::Parts);
            let rest = &segment[m.end()..];
            let end = value_end(rest, &AFTER_PARTS);
            let value = rest[..end].trim();
            if !value.is_empty() {
                let part = self.parts.resolve(value, &self.hyperlinks.resolve(paragraph));
                state.issue.parts.push(part);
            }

            let tail = rest[end..].trim();
            let follows = scope == LineScope::Title || BRANDS_LABEL.is_match(tail);
            if tail.is_empty() || !follows {
                state.mode = Mode::PartList;
            } else {
                self.apply_remainder(state, tail, paragraph, scope);
            }
            return true;
        }

        if state.is_open(Field::Brands)
            && let Some(m) = BRANDS_LABEL.find(segment)
        {
            state.close(Field::Brands);
            state.issue.brands = self.parts.brands(&segment[m.end()..]);
            return true;
        }

        false
    }

    fn apply_remainder(&self, state: &mut IssueState, rest: &str, paragraph: ParagraphId, scope: LineScope) {
        if !rest.trim().is_empty() {
            self.apply_field(state, rest, paragraph, scope);
        }
    }

    /// A short `key: value` line ahead of the parts field reads as a symptom.
    fn is_implicit_symptom(state: &IssueState, text: &str) -> bool {
        let Some((key, _)) = text.split_once(':') else {
            return false;
        };
        let key = key.trim().to_lowercase();

        !state.issue.title.is_empty()
            && state.is_open(Field::Parts)
            && key.chars().count() < MAX_IMPLICIT_KEY_CHARS
            && !key.contains("note")
            && !key.contains("important")
            && !is_numbered(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkConfig;
    use crate::parser::{HyperlinkRef, LineNormalizer, Paragraph, WordDocument};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn parse(document: &WordDocument) -> (Option<Issue>, usize) {
        let links = LinkConfig::default();
        let lines = LineNormalizer::new().normalize(document);
        let parser = IssueParser::new(HyperlinkResolver::new(document), PartResolver::new(&links));
        parser.parse_block(&lines, 0)
    }

    fn parse_texts(texts: &[&str]) -> (Option<Issue>, usize) {
        parse(&WordDocument::from_texts(texts.iter().copied()))
    }

    #[test]
    fn test_fully_inline_issue() {
        let (issue, next) = parse_texts(&[
            "Squealing brake pads Fault Codes: C1201 Why it happens: pad wear Symptoms: squeal noise \
             Parts to Replace: Brake Pad Set Brands: Bosch, ATE",
        ]);
        let issue = issue.unwrap();

        assert_eq!(next, 1);
        assert_eq!(issue.title, "Squealing brake pads");
        assert_eq!(issue.fault_codes, "C1201");
        assert_eq!(issue.why, "pad wear");
        assert_eq!(issue.symptoms, vec!["squeal noise"]);
        assert_eq!(issue.parts.len(), 1);
        assert_eq!(issue.parts[0].name, "Brake Pad Set");
        assert_eq!(
            issue.parts[0].link,
            "https://eeuroparts.com/parts/search?q=Brake+Pad+Set"
        );
        let brands: Vec<_> = issue.brands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(brands, vec!["Bosch", "ATE"]);
    }

    #[test]
    fn test_inline_follow_ons_on_field_lines() {
        let (issue, next) = parse_texts(&[
            "Rough idle",
            "Fault Codes: P0171 Why it happens: vacuum leak",
            "Parts to Replace: Intake Gasket Brands: Elring, Victor Reinz",
        ]);
        let issue = issue.unwrap();

        assert_eq!(next, 3);
        assert_eq!(issue.fault_codes, "P0171");
        assert_eq!(issue.why, "vacuum leak");
        assert_eq!(issue.parts.len(), 1);
        assert_eq!(issue.parts[0].name, "Intake Gasket");
        let brands: Vec<_> = issue.brands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(brands, vec!["Elring", "Victor Reinz"]);
    }

    #[test]
    fn test_label_words_in_why_prose_stay_out_of_later_fields() {
        let (issue, next) = parse_texts(&[
            "Squealing pads",
            "Why it happens: cheap pads that some brands sell glaze quickly",
            "Symptoms:",
            "Squeal noise",
            "Parts to Replace: Brake Pad Set",
            "Brands: Bosch",
        ]);
        let issue = issue.unwrap();

        assert_eq!(next, 6);
        assert_eq!(issue.symptoms, vec!["Squeal noise"]);
        assert_eq!(issue.parts.len(), 1);
        assert_eq!(issue.parts[0].name, "Brake Pad Set");
        let brands: Vec<_> = issue.brands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(brands, vec!["Bosch"]);

        let (issue, _) = parse_texts(&[
            "Overheating",
            "Why it happens: heat soak makes symptoms worse in summer",
            "Symptoms:",
            "Temperature gauge climbs",
        ]);
        assert_eq!(issue.unwrap().symptoms, vec!["Temperature gauge climbs"]);
    }

    #[test]
    fn test_earlier_label_after_parts_is_a_part() {
        let (issue, next) = parse_texts(&[
            "Sticking caliper",
            "Parts to Replace:",
            "Brake Caliper",
            "Why it happens: corrosion",
        ]);
        let issue = issue.unwrap();

        assert_eq!(next, 4);
        assert_eq!(issue.why, "");
        let parts: Vec<_> = issue.parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(parts, vec!["Brake Caliper", "Why it happens: corrosion"]);
    }

    #[test]
    fn test_symptoms_line_keeps_whole_text() {
        let (issue, _) = parse_texts(&[
            "Hard shifting",
            "Symptoms: delayed engagement, brands of fluid matter",
            "Flare between gears",
            "Parts to Replace: Valve Body",
        ]);
        let issue = issue.unwrap();

        assert_eq!(
            issue.symptoms,
            vec!["delayed engagement, brands of fluid matter", "Flare between gears"]
        );
        assert_eq!(issue.parts.len(), 1);
        assert!(issue.brands.is_empty());
    }

    #[test]
    fn test_one_field_per_line() {
        let (issue, next) = parse_texts(&[
            "1. Misfire under load",
            "Fault Codes: P0300, P0301",
            "Why it happens: worn coil packs",
            "Symptoms:",
            "1. Rough idle",
            "2. Check engine light",
            "Parts to Replace:",
            "Ignition Coil",
            "Spark Plug Set",
            "Brands: Bosch and NGK",
            "2. Next issue title",
        ]);
        let issue = issue.unwrap();

        assert_eq!(next, 10);
        assert_eq!(issue.title, "Misfire under load");
        assert_eq!(issue.fault_codes, "P0300, P0301");
        assert_eq!(issue.symptoms, vec!["1. Rough idle", "2. Check engine light"]);
        let parts: Vec<_> = issue.parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(parts, vec!["Ignition Coil", "Spark Plug Set"]);
        assert_eq!(issue.brands.len(), 2);
    }

    #[test]
    fn test_duplicate_symptoms_are_dropped() {
        let (issue, _) = parse_texts(&[
            "Grinding brakes",
            "Symptoms:",
            "1. Squeal noise",
            "2. Squeal noise",
            "3. SQUEAL NOISE",
        ]);

        assert_eq!(issue.unwrap().symptoms, vec!["1. Squeal noise"]);
    }

    #[test]
    fn test_missing_brands_leave_empty_list() {
        let (issue, next) = parse_texts(&[
            "Leaking water pump",
            "Why it happens: impeller failure",
            "Parts to Replace: Water Pump",
        ]);
        let issue = issue.unwrap();

        assert_eq!(next, 3);
        assert!(issue.brands.is_empty());
        assert_eq!(issue.parts.len(), 1);
        assert_eq!(issue.fault_codes, "");
    }

    #[test]
    fn test_placeholder_fault_codes_are_not_stored() {
        let (issue, _) = parse_texts(&["Loose trim", "Fault Codes: N/A", "Why it happens: clips break"]);
        let issue = issue.unwrap();

        assert_eq!(issue.fault_codes, "");
        assert_eq!(issue.why, "clips break");
    }

    #[test]
    fn test_symptom_list_folds_earlier_labels() {
        let (issue, _) = parse_texts(&[
            "Stalling",
            "Symptoms:",
            "Engine stalls at idle",
            "Fault Codes: P0505",
            "Parts to Replace: Idle Control Valve",
        ]);
        let issue = issue.unwrap();

        assert_eq!(issue.fault_codes, "");
        assert_eq!(issue.symptoms, vec!["Engine stalls at idle", "Fault Codes: P0505"]);
    }

    #[test]
    fn test_implicit_symptoms_stop_at_numbered_line() {
        let (issue, next) = parse_texts(&[
            "1. Noisy timing chain",
            "Cold start: rattle for two seconds",
            "Under load: metallic ticking",
            "2. Failed thermostat",
        ]);
        let issue = issue.unwrap();

        assert_eq!(next, 3);
        assert_eq!(
            issue.symptoms,
            vec!["Cold start: rattle for two seconds", "Under load: metallic ticking"]
        );
    }

    #[test]
    fn test_multi_line_title() {
        let (issue, _) = parse_texts(&[
            "Intermittent loss of power",
            "on the highway",
            "Why it happens: clogged filter",
        ]);
        let issue = issue.unwrap();

        assert_eq!(issue.title, "Intermittent loss of power on the highway");
        assert_eq!(issue.why, "clogged filter");
    }

    #[test]
    fn test_unclassified_line_after_content_ends_block() {
        let (issue, next) = parse_texts(&[
            "Worn control arm bushings",
            "Why it happens: rubber ages",
            "Clunking over bumps",
        ]);

        assert_eq!(issue.unwrap().title, "Worn control arm bushings");
        assert_eq!(next, 2);
    }

    #[test]
    fn test_category_header_ends_block() {
        let (issue, next) = parse_texts(&["Weak battery", "Symptoms:", "Slow crank", "Electrical", "Dead cell"]);

        assert_eq!(issue.unwrap().symptoms, vec!["Slow crank"]);
        assert_eq!(next, 3);
    }

    #[test]
    fn test_numbering_only_title_is_dropped() {
        let (issue, next) = parse_texts(&["1.", "Why it happens: unknown"]);
        assert!(issue.is_none());
        assert_eq!(next, 2);
    }

    #[test]
    fn test_part_uses_paragraph_hyperlink() {
        let mut rels = HashMap::new();
        rels.insert("rId7".to_string(), "https://eeuroparts.com/p/coil?ref=guide".to_string());
        let document = WordDocument::new(
            vec![
                Paragraph::plain("Misfire"),
                Paragraph::plain("Parts to Replace:"),
                Paragraph::with_hyperlinks(
                    "Ignition Coil for cylinder one",
                    vec![HyperlinkRef::new("rId7", "Ignition Coil")],
                ),
            ],
            rels,
        );

        let (issue, _) = parse(&document);
        let part = &issue.unwrap().parts[0];

        assert_eq!(part.name, "Ignition Coil");
        assert_eq!(part.link, "https://eeuroparts.com/p/coil");
        assert_eq!(part.description, " for cylinder one");
    }
}
