//! Markdown renderings of the report payloads.

use std::fmt::Write;

use eduboost_core::report::{CohortReport, GoalsReport, PerformanceReport, PlannerReport};

/// Escape table-cell pipes.
fn cell(s: &str) -> String {
    s.replace('|', "\\|")
}

pub fn render_performance(report: &PerformanceReport) -> String {
    let analysis = &report.analysis;
    let summary = &report.summary;
    let mut output = String::new();

    let _ = writeln!(output, "# Performance Report: {}", report.student_id);
    let _ = writeln!(
        output,
        "Overall risk **{}** (average score {:.2}, {}/{} modules weak), updated {}",
        analysis.overall_risk_level,
        analysis.average_risk_score,
        analysis.weak_module_count(),
        analysis.assessments.len(),
        report.last_updated.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- Modules: {} ({} failing, {} at risk, {} strong)",
        summary.total_modules, summary.failing_modules, summary.at_risk_modules, summary.strong_modules
    );
    let _ = writeln!(output, "- GPA: {:.2}", summary.overall_gpa);
    let _ = writeln!(output, "- Attendance: {:.1}%", summary.average_attendance);
    let _ = writeln!(output, "- Lab completion: {:.1}%", summary.average_lab_completion);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Modules");
    if analysis.assessments.is_empty() {
        let _ = writeln!(output, "No module records.");
    } else {
        let _ = writeln!(output, "| Module | Risk | Level | Factors |");
        let _ = writeln!(output, "|---|---|---|---|");
        for a in &analysis.assessments {
            let factors: Vec<&str> = a.risk_factors.iter().map(|f| f.label()).collect();
            let _ = writeln!(
                output,
                "| {} | {:.2} | {} | {} |",
                cell(&a.module_name),
                a.risk_score,
                a.risk_level,
                cell(&factors.join(", "))
            );
        }
    }

    if !analysis.failing_modules.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Failing Modules");
        for m in &analysis.failing_modules {
            let _ = writeln!(
                output,
                "- {}: grade {:.1}, attendance {:.1}%, risk {:.2}",
                m.module, m.current_grade, m.attendance, m.risk_score
            );
        }
    }

    if !analysis.lecturer_attention_needed.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "**Lecturer attention needed:** {}",
            analysis.lecturer_attention_needed.join(", ")
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Suggestions");
    if analysis.improvement_suggestions.is_empty() {
        let _ = writeln!(output, "No suggestions; keep up the current routine.");
    } else {
        for s in &analysis.improvement_suggestions {
            let _ = writeln!(output, "- **{}**: {} ({})", s.area, s.action, s.timeline);
            for r in &s.resources {
                let _ = writeln!(output, "  - {r}");
            }
        }
    }

    if !report.lecturer_feedback.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Lecturer Feedback");
        for f in &report.lecturer_feedback {
            let _ = writeln!(
                output,
                "- {} (urgency {}/5): {}",
                f.module_name, f.urgency_level, f.feedback_text
            );
        }
    }

    output
}

pub fn render_goals(report: &GoalsReport) -> String {
    let stats = &report.completion_stats;
    let recs = &report.recommendations;
    let mut output = String::new();

    let _ = writeln!(output, "# Goals: {}", report.student_id);
    let _ = writeln!(
        output,
        "Overall risk **{}**, {} goals ({} high, {} medium, {} low), {:.1}% complete",
        report.overall_risk_level,
        stats.total_goals,
        stats.high_priority_goals,
        stats.medium_priority_goals,
        stats.low_priority_goals,
        stats.completion_rate
    );
    let _ = writeln!(output);

    if report.goals.is_empty() {
        let _ = writeln!(output, "No goals needed right now.");
        return output;
    }

    let _ = writeln!(output, "| Priority | Module | Goal | Due | Progress |");
    let _ = writeln!(output, "|---|---|---|---|---|");
    for view in &report.goals {
        let g = &view.goal;
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} ({}d) | {}% |",
            g.priority_level,
            cell(&g.module_name),
            cell(&g.title),
            g.target_completion_date,
            view.days_remaining,
            g.current_progress
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Success Criteria");
    for view in &report.goals {
        let _ = writeln!(output, "- **{}** (`{}`)", view.goal.title, view.goal.goal_id);
        for c in &view.goal.success_criteria {
            let _ = writeln!(output, "  - {c}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Workload");
    if !recs.focus_areas.is_empty() {
        let _ = writeln!(output, "- Focus on: {}", recs.focus_areas.join(", "));
    }
    let _ = writeln!(
        output,
        "- Suggested daily study: {:.1} hours",
        recs.suggested_daily_study_hours
    );
    let _ = writeln!(
        output,
        "- Estimated completion: {} weeks",
        recs.estimated_completion_weeks
    );

    output
}

pub fn render_planner(report: &PlannerReport) -> String {
    let plan = &report.study_plan;
    let mut output = String::new();

    let _ = writeln!(output, "# Study Plan: {}", report.student_id);
    let _ = writeln!(
        output,
        "{} hours per week ({} intensity, risk {})",
        plan.recommended_hours, plan.personalization.study_intensity, plan.personalization.risk_level
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Weekly Schedule");
    if plan.weekly_schedule.is_empty() {
        let _ = writeln!(output, "No weak modules; no extra sessions scheduled.");
    } else {
        let _ = writeln!(output, "| Day | Time | Subject | Duration |");
        let _ = writeln!(output, "|---|---|---|---|");
        for s in &plan.weekly_schedule {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                s.day,
                s.time,
                cell(&s.subject),
                s.duration()
            );
        }
    }

    if !plan.focus_modules.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Focus Modules");
        for m in &plan.focus_modules {
            let _ = writeln!(output, "- {m}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Techniques");
    for t in &plan.study_techniques {
        let _ = writeln!(output, "- {t}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Wellbeing");
    let _ = writeln!(output, "- Physical: {}", plan.physical_plan);
    let _ = writeln!(output, "- Emotional: {}", plan.emotional_plan);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Mini Goals");
    for g in &plan.mini_goals {
        let mark = if g.completed { "x" } else { " " };
        let _ = writeln!(output, "- [{mark}] {}", g.title);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Resources");
    if report.resources.is_empty() {
        let _ = writeln!(output, "No resources matched the goal modules.");
    } else {
        for (category, items) in report.resources.categories() {
            if items.is_empty() {
                continue;
            }
            let _ = writeln!(output, "### {category}");
            for r in items {
                let price = if r.is_free { "free" } else { "paid" };
                let _ = writeln!(
                    output,
                    "- [{}]({}) {:.1}/5, ~{}h, {price}",
                    r.title, r.url, r.rating, r.estimated_hours
                );
            }
        }
    }

    output
}

pub fn render_cohort(report: &CohortReport) -> String {
    let (low, medium, high) = report.risk_distribution();
    let mut output = String::new();

    let _ = writeln!(output, "# Cohort Report");
    let _ = writeln!(
        output,
        "{} students analysed in {}ms ({} failed)",
        report.reports.len(),
        report.duration_ms,
        report.failures.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Mix");
    let _ = writeln!(output, "- high: {high}");
    let _ = writeln!(output, "- medium: {medium}");
    let _ = writeln!(output, "- low: {low}");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students");
    if report.reports.is_empty() {
        let _ = writeln!(output, "No students analysed.");
    } else {
        let _ = writeln!(output, "| Student | Risk | Goals | High Priority | Focus |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for r in &report.reports {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                cell(&r.student_id),
                r.overall_risk_level,
                r.completion_stats.total_goals,
                r.completion_stats.high_priority_goals,
                cell(&r.recommendations.focus_areas.join(", "))
            );
        }
    }

    if !report.failures.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Failures");
        for f in &report.failures {
            let _ = writeln!(output, "- {}: {}", f.student_id, f.error);
        }
    }

    output
}
