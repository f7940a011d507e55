//! Plain-text rendering of the orchestrator's view.

use std::fmt::Write as _;

use client_core::{Notice, Phase, ResultView, ViewState};
use shared::domain::FormField;

pub fn render_form(view: &ViewState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.connectivity.badge());
    let _ = writeln!(out, "Passenger Information");
    for field in FormField::ALL {
        let _ = writeln!(
            out,
            "  {:<20} {:<9} {}",
            field.label(),
            field.key(),
            view.form.get(field)
        );
    }
    let _ = write!(out, "[{}]", view.submit_label());
    out
}

pub fn render_result(result: &ResultView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", result.outcome.icon(), result.headline);
    let _ = writeln!(out, "  Survival Probability  {}", result.survival_probability);
    let _ = writeln!(out, "  {}", progress_bar(result.survival_bar_width));
    if let Some(death) = &result.death_probability {
        let _ = writeln!(out, "  Death Probability     {death}");
    }
    for row in &result.details {
        let _ = writeln!(out, "  {:<21} {}", row.label, row.value);
    }
    out.trim_end().to_string()
}

pub fn render_view(view: &ViewState) -> String {
    let mut out = render_form(view);
    match (&view.result, view.phase) {
        (_, Phase::Submitting) => out.push_str("\nPredicting..."),
        (Some(result), _) => {
            out.push('\n');
            out.push_str(&render_result(result));
        }
        (None, _) => {}
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    format!("[{}] {}", notice.raised_at.format("%H:%M:%S"), notice.message)
}

fn progress_bar(width_percent: f64) -> String {
    const CELLS: usize = 30;
    let filled = ((width_percent / 100.0) * CELLS as f64)
        .round()
        .clamp(0.0, CELLS as f64) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(CELLS - filled))
}

pub const HELP: &str = "\
commands:
  set FIELD VALUE   edit one field (Pclass, Sex, Age, SibSp, Parch, Fare, Embarked)
  preset NAME       load Rose, Jack or Child
  submit            request a prediction
  show              print the form and last result
  help              print this help
  quit              exit";
