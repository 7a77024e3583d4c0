//! Verification policies — decide whether a final answer may stand.
//!
//! After the model stops requesting tools, the loop asks the configured
//! policy to judge the goal against the structured tool records. A failing
//! verdict carries the report lines and the corrective message the loop
//! injects before calling the model again.

use crate::conversation::ToolRecord;

/// Characters of the vision analysis quoted in a failure report.
const EXCERPT_CHARS: usize = 200;

/// Closing report line when the loop goes round again.
pub const RETRY_CONCLUSION: &str =
    "CONCLUSION: Scene does NOT match request. FORCING AGENT TO CONTINUE ITERATING...";

#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    /// The goal is not something this policy checks.
    NotApplicable,
    /// The goal is checkable but there was nothing to check against
    /// (no vision analysis yet, or no recognised objects).
    Inconclusive,
    Pass,
    Fail(VerificationFailure),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VerificationFailure {
    pub requested: Vec<String>,
    /// Start of the lowercased vision analysis.
    pub excerpt: String,
    pub missing: Vec<String>,
    pub wrong_descriptions: Vec<String>,
}

impl VerificationFailure {
    /// Findings shown to the user, in order.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "❌ VERIFICATION FAILED!".to_string(),
            format!("REQUESTED: {}", self.requested.join(", ")),
            format!("VISION ANALYSIS: {}...", self.excerpt),
        ];
        if !self.missing.is_empty() {
            lines.push(format!("MISSING OBJECTS: {}", self.missing.join(", ")));
        }
        if !self.wrong_descriptions.is_empty() {
            lines.push(format!(
                "WRONG DESCRIPTIONS: {}",
                self.wrong_descriptions.join(", ")
            ));
        }
        lines
    }

    /// User message appended so the model keeps working.
    pub fn corrective_message(&self) -> String {
        let objects = self.requested.join(", ");
        format!(
            "❌ VERIFICATION FAILED! The vision analysis shows vague descriptions instead of \
             clearly identifying {objects}. You MUST continue working to fix this scene. Try \
             different positioning, scaling, or add more objects to make the {objects} clearly \
             recognizable. Do not stop until vision clearly describes '{objects}' without vague \
             terms like 'possibly' or 'appears to'."
        )
    }
}

pub trait VerificationPolicy: Send + Sync {
    fn check(&self, goal: &str, records: &[ToolRecord]) -> Verdict;

    fn name(&self) -> &str;
}

/// Accepts every answer.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysPass;

impl VerificationPolicy for AlwaysPass {
    fn check(&self, _goal: &str, _records: &[ToolRecord]) -> Verdict {
        Verdict::NotApplicable
    }

    fn name(&self) -> &str {
        "always-pass"
    }
}

/// A description that contradicts a requested object.
#[derive(Clone, Debug)]
pub struct Misdescription {
    pub object: String,
    /// Any of these in the analysis means the object was misread.
    pub terms: Vec<String>,
    pub note: String,
}

/// Keyword heuristic over the most recent vision analysis.
///
/// Applies when the goal mentions a trigger word. Each known object named in
/// the goal must appear in the analysis, and no misdescription term for a
/// requested object may.
#[derive(Clone, Debug)]
pub struct KeywordVerification {
    pub triggers: Vec<String>,
    pub objects: Vec<String>,
    pub misdescriptions: Vec<Misdescription>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for KeywordVerification {
    fn default() -> Self {
        Self {
            triggers: strings(&["create", "scene", "fox", "tree", "robot", "target"]),
            objects: strings(&["fox", "tree", "robot", "target"]),
            misdescriptions: vec![
                Misdescription {
                    object: "fox".into(),
                    terms: strings(&["bird", "elongated shape"]),
                    note: "Vision describes 'bird' or vague shape instead of 'fox'".into(),
                },
                Misdescription {
                    object: "tree".into(),
                    terms: strings(&["horizontal", "cylindrical"]),
                    note: "Vision describes 'horizontal cylinder' instead of 'vertical tree'"
                        .into(),
                },
            ],
        }
    }
}

/// The newest `vlm_analysis` among the tool records, lowercased.
fn last_analysis(records: &[ToolRecord]) -> Option<String> {
    records
        .iter()
        .rev()
        .find_map(|r| r.output.get("vlm_analysis")?.as_str())
        .map(str::to_lowercase)
}

impl VerificationPolicy for KeywordVerification {
    fn check(&self, goal: &str, records: &[ToolRecord]) -> Verdict {
        let goal = goal.to_lowercase();
        if !self.triggers.iter().any(|t| goal.contains(t.as_str())) {
            return Verdict::NotApplicable;
        }

        let requested: Vec<String> = self
            .objects
            .iter()
            .filter(|o| goal.contains(o.as_str()))
            .cloned()
            .collect();
        let Some(analysis) = last_analysis(records) else {
            return Verdict::Inconclusive;
        };
        if requested.is_empty() {
            return Verdict::Inconclusive;
        }

        let missing: Vec<String> = requested
            .iter()
            .filter(|o| !analysis.contains(o.as_str()))
            .cloned()
            .collect();
        let wrong_descriptions: Vec<String> = self
            .misdescriptions
            .iter()
            .filter(|m| requested.contains(&m.object))
            .filter(|m| m.terms.iter().any(|t| analysis.contains(t.as_str())))
            .map(|m| m.note.clone())
            .collect();

        if missing.is_empty() && wrong_descriptions.is_empty() {
            return Verdict::Pass;
        }
        Verdict::Fail(VerificationFailure {
            requested,
            excerpt: analysis.chars().take(EXCERPT_CHARS).collect(),
            missing,
            wrong_descriptions,
        })
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
