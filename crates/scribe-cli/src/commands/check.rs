use super::{CommandContext, read_input};
use crate::OutputFormat;
use anyhow::Result;
use scribe_common::{AnalysisResult, Issue};
use scribe_engine::Provider;
use std::sync::Arc;

pub async fn run_check(ctx: &CommandContext, input: &str, format: OutputFormat, dedup: bool, sequential: bool) -> Result<()> {
    let text = read_input(input)?;
    let request = ctx.request(text.as_str());

    let mut result = if sequential {
        ctx.provider.analyze(&request)?
    } else {
        Arc::clone(&ctx.provider).analyze_async(Arc::new(request)).await
    };
    if dedup {
        result = result.deduplicated();
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print!("{}", render_report(input, &text, &result)),
    }

    Ok(())
}

/// One line per issue plus a summary line
pub fn render_report(source: &str, text: &str, result: &AnalysisResult) -> String {
    let mut report = String::new();
    for issue in result.issues() {
        report.push_str(&format_issue(source, text, issue));
        report.push('\n');
    }
    report.push_str(&format!("{} issue(s) found in {}ms\n", result.len(), result.elapsed_millis()));
    report
}

/// `source:line:col: severity [RULE] message (suggestions: a, b)`
pub fn format_issue(source: &str, text: &str, issue: &Issue) -> String {
    let (line, column) = line_col(text, issue.start());
    let mut formatted = format!("{}:{}:{}: {} [{}] {}", source, line, column, issue.severity(), issue.rule_id(), issue.message());
    if !issue.replacements().is_empty() {
        formatted.push_str(&format!(" (suggestions: {})", issue.replacements().join(", ")));
    }
    formatted
}

/// 1-based line and column of a character offset
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for c in text.chars().take(offset) {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_common::{IssueCategory, Severity};
    use std::time::Duration;

    #[test]
    fn test_line_col() {
        let text = "first line\nsécond teh";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 11), (2, 1));
        assert_eq!(line_col(text, 18), (2, 8));
    }

    #[test]
    fn test_report_format() {
        let text = "Fix teh fox.";
        let issue = Issue::builder(IssueCategory::Spelling, 4, 7)
            .rule_id("SPELL_TEH")
            .severity(Severity::Warning)
            .message("Did you mean \"the\"?")
            .replacement("the")
            .build()
            .unwrap();
        let result = AnalysisResult::new(vec![issue], Duration::from_millis(2), "composite");

        assert_eq!(
            render_report("draft.txt", text, &result),
            "draft.txt:1:5: warning [SPELL_TEH] Did you mean \"the\"? (suggestions: the)\n1 issue(s) found in 2ms\n"
        );
    }
}
