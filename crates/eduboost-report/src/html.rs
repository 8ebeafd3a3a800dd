//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use eduboost_core::model::RiskLevel;
use eduboost_core::report::{CohortReport, GoalsReport, PerformanceReport, PlannerReport};
use serde::Serialize;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn risk_class(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "high",
        RiskLevel::Medium => "medium",
        RiskLevel::Low => "low",
    }
}

/// Wrap a body in the page shell, with the report JSON appended.
fn page<T: Serialize>(title: &str, meta: &str, body: &str, raw: &T) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>eduboost: {}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(title)));
    html.push_str(&format!("<p class=\"meta\">{meta}</p>\n"));
    html.push_str("</header>\n");

    html.push_str(body);

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(raw).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// A sortable table. Cells are inserted as-is; escape them first.
fn table(id: &str, headers: &[&str], rows: &[(Option<&str>, Vec<String>)]) -> String {
    let mut html = format!("<table class=\"sortable\" id=\"{id}\">\n<thead><tr>");
    for (i, h) in headers.iter().enumerate() {
        html.push_str(&format!(
            "<th onclick=\"sortTable('{id}', {i})\">{}</th>",
            html_escape(h)
        ));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for (class, cells) in rows {
        match class {
            Some(c) => html.push_str(&format!("<tr class=\"{c}\">")),
            None => html.push_str("<tr>"),
        }
        for c in cells {
            html.push_str(&format!("<td>{c}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");
    html
}

pub fn generate_performance_html(report: &PerformanceReport) -> String {
    let analysis = &report.analysis;
    let summary = &report.summary;
    let mut body = String::new();

    body.push_str("<section class=\"dashboard\">\n<h2>Summary</h2>\n");
    body.push_str(&format!(
        "<p>{} modules: {} failing, {} at risk, {} strong. GPA {:.2}, attendance {:.1}%, lab completion {:.1}%.</p>\n",
        summary.total_modules,
        summary.failing_modules,
        summary.at_risk_modules,
        summary.strong_modules,
        summary.overall_gpa,
        summary.average_attendance,
        summary.average_lab_completion,
    ));
    let scores: Vec<(String, f64)> = analysis
        .assessments
        .iter()
        .map(|a| (a.module_name.clone(), a.risk_score))
        .collect();
    if !scores.is_empty() {
        body.push_str(&generate_bar_chart(&scores));
    }
    if !analysis.lecturer_attention_needed.is_empty() {
        body.push_str(&format!(
            "<p class=\"alert\">Lecturer attention needed: {}</p>\n",
            html_escape(&analysis.lecturer_attention_needed.join(", "))
        ));
    }
    body.push_str("</section>\n");

    body.push_str("<section class=\"results\">\n<h2>Modules</h2>\n");
    let rows: Vec<_> = analysis
        .assessments
        .iter()
        .map(|a| {
            let factors: Vec<&str> = a.risk_factors.iter().map(|f| f.label()).collect();
            (
                Some(risk_class(a.risk_level)),
                vec![
                    html_escape(&a.module_name),
                    format!("{:.2}", a.risk_score),
                    a.risk_level.to_string(),
                    html_escape(&factors.join(", ")),
                ],
            )
        })
        .collect();
    body.push_str(&table("modules", &["Module", "Risk", "Level", "Factors"], &rows));
    body.push_str("</section>\n");

    if !analysis.improvement_suggestions.is_empty() {
        body.push_str("<section>\n<h2>Suggestions</h2>\n<ul>\n");
        for s in &analysis.improvement_suggestions {
            body.push_str(&format!(
                "<li><strong>{}</strong>: {} <em>({})</em></li>\n",
                html_escape(&s.area),
                html_escape(&s.action),
                html_escape(&s.timeline)
            ));
        }
        body.push_str("</ul>\n</section>\n");
    }

    if !report.lecturer_feedback.is_empty() {
        body.push_str("<section>\n<h2>Lecturer Feedback</h2>\n<ul>\n");
        for f in &report.lecturer_feedback {
            body.push_str(&format!(
                "<li>{} (urgency {}/5): {}</li>\n",
                html_escape(&f.module_name),
                f.urgency_level,
                html_escape(&f.feedback_text)
            ));
        }
        body.push_str("</ul>\n</section>\n");
    }

    let meta = format!(
        "Overall risk <strong class=\"{}\">{}</strong> | average score {:.2} | {}",
        risk_class(analysis.overall_risk_level),
        analysis.overall_risk_level,
        analysis.average_risk_score,
        report.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    );
    page(
        &format!("Performance report for {}", report.student_id),
        &meta,
        &body,
        report,
    )
}

pub fn generate_goals_html(report: &GoalsReport) -> String {
    let stats = &report.completion_stats;
    let mut body = String::new();

    body.push_str("<section class=\"results\">\n<h2>Goals</h2>\n");
    let rows: Vec<_> = report
        .goals
        .iter()
        .map(|view| {
            let g = &view.goal;
            (
                Some(if g.is_completed() { "done" } else { "open" }),
                vec![
                    g.priority_level.to_string(),
                    html_escape(&g.module_name),
                    html_escape(&g.title),
                    format!("{} ({}d)", g.target_completion_date, view.days_remaining),
                    format!("{}%", g.current_progress),
                ],
            )
        })
        .collect();
    body.push_str(&table(
        "goals",
        &["Priority", "Module", "Goal", "Due", "Progress"],
        &rows,
    ));
    body.push_str("</section>\n");

    let meta = format!(
        "Overall risk <strong class=\"{}\">{}</strong> | {} goals | {:.1}% complete | {:.1} h/day suggested",
        risk_class(report.overall_risk_level),
        report.overall_risk_level,
        stats.total_goals,
        stats.completion_rate,
        report.recommendations.suggested_daily_study_hours
    );
    page(
        &format!("Goals for {}", report.student_id),
        &meta,
        &body,
        report,
    )
}

pub fn generate_planner_html(report: &PlannerReport) -> String {
    let plan = &report.study_plan;
    let mut body = String::new();

    body.push_str("<section class=\"results\">\n<h2>Weekly Schedule</h2>\n");
    let rows: Vec<_> = plan
        .weekly_schedule
        .iter()
        .map(|s| {
            (
                None,
                vec![
                    s.day.clone(),
                    s.time.clone(),
                    html_escape(&s.subject),
                    s.duration(),
                ],
            )
        })
        .collect();
    body.push_str(&table(
        "schedule",
        &["Day", "Time", "Subject", "Duration"],
        &rows,
    ));
    body.push_str(&format!(
        "<p>Physical: {}</p>\n<p>Emotional: {}</p>\n",
        html_escape(&plan.physical_plan),
        html_escape(&plan.emotional_plan)
    ));
    body.push_str("</section>\n");

    body.push_str("<section>\n<h2>Resources</h2>\n");
    for (category, items) in report.resources.categories() {
        if items.is_empty() {
            continue;
        }
        body.push_str(&format!("<h3>{category}</h3>\n<ul>\n"));
        for r in items {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a> {:.1}/5, ~{}h</li>\n",
                html_escape(&r.url),
                html_escape(&r.title),
                r.rating,
                r.estimated_hours
            ));
        }
        body.push_str("</ul>\n");
    }
    body.push_str("</section>\n");

    let meta = format!(
        "{} hours per week | {} intensity | {}",
        plan.recommended_hours,
        plan.personalization.study_intensity,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    page(
        &format!("Study plan for {}", report.student_id),
        &meta,
        &body,
        report,
    )
}

pub fn generate_cohort_html(report: &CohortReport) -> String {
    let (low, medium, high) = report.risk_distribution();
    let total = report.reports.len().max(1) as f64;
    let mut body = String::new();

    body.push_str("<section class=\"dashboard\">\n<h2>Risk Mix</h2>\n");
    body.push_str(&generate_bar_chart(&[
        ("high".to_string(), high as f64 / total),
        ("medium".to_string(), medium as f64 / total),
        ("low".to_string(), low as f64 / total),
    ]));
    body.push_str("</section>\n");

    body.push_str("<section class=\"results\">\n<h2>Students</h2>\n");
    let rows: Vec<_> = report
        .reports
        .iter()
        .map(|r| {
            (
                Some(risk_class(r.overall_risk_level)),
                vec![
                    html_escape(&r.student_id),
                    r.overall_risk_level.to_string(),
                    r.completion_stats.total_goals.to_string(),
                    r.completion_stats.high_priority_goals.to_string(),
                    html_escape(&r.recommendations.focus_areas.join(", ")),
                ],
            )
        })
        .collect();
    body.push_str(&table(
        "students",
        &["Student", "Risk", "Goals", "High Priority", "Focus"],
        &rows,
    ));
    body.push_str("</section>\n");

    if !report.failures.is_empty() {
        body.push_str("<section>\n<h2>Failures</h2>\n<ul>\n");
        for f in &report.failures {
            body.push_str(&format!(
                "<li class=\"high\">{}: {}</li>\n",
                html_escape(&f.student_id),
                html_escape(&f.error)
            ));
        }
        body.push_str("</ul>\n</section>\n");
    }

    let meta = format!(
        "{} students | {} failed | {}ms | {}",
        report.reports.len(),
        report.failures.len(),
        report.duration_ms,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    page("Cohort report", &meta, &body, report)
}

/// Write rendered HTML to a file.
pub fn write_html(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Horizontal bars for values in `0.0..=1.0`; higher is worse.
fn generate_bar_chart(values: &[(String, f64)]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 240;

    let total_height = values.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (label, value)) in values.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (value.clamp(0.0, 1.0) * max_width as f64) as usize;

        let color = match RiskLevel::from_score(*value) {
            RiskLevel::High => "#ef4444",
            RiskLevel::Medium => "#eab308",
            RiskLevel::Low => "#22c55e",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.2}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            value
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --low: #dcfce7; --medium: #fef9c3; --high: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --low: #064e3b; --medium: #713f12; --high: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.alert { font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.low, .done { background: var(--low); }
.medium { background: var(--medium); }
.high { background: var(--high); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(id, col) {
  const table = document.getElementById(id);
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
