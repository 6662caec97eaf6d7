use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use match_model::{Candidate, EvaluationResult, Explain, Profile, Recommendation, RuleSet};

pub fn print_recommendations(profile: &Profile, recommendations: &[Recommendation]) {
    println!("Profile: {} ({})", profile.name, profile.id);
    if recommendations.is_empty() {
        println!("No eligible postings.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Posting"),
        header_cell("Org"),
        header_cell("Location"),
        header_cell("Stipend"),
        header_cell("Months"),
        header_cell("Score"),
        header_cell("Top factors"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for (index, rec) in recommendations.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(&rec.title).add_attribute(Attribute::Bold),
            Cell::new(&rec.org),
            Cell::new(&rec.location),
            Cell::new(rec.stipend),
            Cell::new(rec.duration_months),
            score_cell(rec.score),
            Cell::new(top_factors(&rec.why)),
        ]);
    }
    println!("{table}");
}

pub fn print_evaluation(candidate: &Candidate, result: &EvaluationResult) {
    println!("Posting: {} ({})", candidate.title, candidate.id);
    match result {
        EvaluationResult::Ineligible { failures } => {
            let mut table = Table::new();
            table.set_header(vec![header_cell("Failed rule"), header_cell("Reason")]);
            apply_table_style(&mut table);
            for failure in failures {
                table.add_row(vec![
                    Cell::new(&failure.rule_id).fg(Color::Red),
                    Cell::new(&failure.reason),
                ]);
            }
            println!("Ineligible:");
            println!("{table}");
        }
        EvaluationResult::Eligible { score, explain } => {
            println!("Eligible, score {score}");
            let mut table = Table::new();
            table.set_header(vec![
                header_cell("Component"),
                header_cell("Id"),
                header_cell("Value"),
            ]);
            apply_table_style(&mut table);
            align_column(&mut table, 2, CellAlignment::Right);
            for rule_id in &explain.passed_rules {
                table.add_row(vec![
                    Cell::new("hard"),
                    Cell::new(rule_id),
                    Cell::new("pass").fg(Color::Green),
                ]);
            }
            for (rule_id, value) in &explain.soft_scores {
                table.add_row(vec![
                    Cell::new("soft"),
                    Cell::new(rule_id),
                    Cell::new(value),
                ]);
            }
            table.add_row(vec![
                Cell::new("fairness"),
                dim_cell("-"),
                Cell::new(explain.fairness),
            ]);
            table.add_row(vec![
                Cell::new("tie-breaker"),
                dim_cell("-"),
                Cell::new(explain.tie_breaker),
            ]);
            println!("{table}");
        }
    }
}

pub fn print_rules(rules: &RuleSet) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Id"),
        header_cell("Weight"),
        header_cell("Expression"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for rule in &rules.hard_rules {
        let expression = match &rule.when {
            Some(when) => format!("when {when}: {}", rule.check),
            None => rule.check.clone(),
        };
        table.add_row(vec![
            Cell::new("hard").fg(Color::Red),
            Cell::new(&rule.id),
            dim_cell("-"),
            Cell::new(expression),
        ]);
    }
    for rule in &rules.soft_rules {
        table.add_row(vec![
            Cell::new("soft").fg(Color::Blue),
            Cell::new(&rule.id),
            Cell::new(rule.weight),
            Cell::new(&rule.score),
        ]);
    }
    for (index, expression) in rules.tie_breakers.iter().enumerate() {
        table.add_row(vec![
            Cell::new("tie").fg(Color::DarkGrey),
            dim_cell(index),
            dim_cell("-"),
            Cell::new(expression),
        ]);
    }
    println!("{table}");
    let boost = &rules.fairness.diversity_boost;
    println!(
        "Fairness: women={} pwd={} ews={} cap={}",
        boost.women.unwrap_or(0.0),
        boost.pwd.unwrap_or(0.0),
        boost.ews.unwrap_or(0.0),
        rules.fairness.cap_per_session,
    );
}

/// Compact per-match summary of the explain payload: the two strongest soft
/// scores plus the fairness boost when present.
fn top_factors(explain: &Explain) -> String {
    let mut soft: Vec<(&str, f64)> = explain
        .soft_scores
        .iter()
        .map(|(id, value)| (id.as_str(), *value))
        .collect();
    soft.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut parts: Vec<String> = soft
        .into_iter()
        .take(2)
        .filter(|(_, value)| *value > 0.0)
        .map(|(id, value)| format!("{id} {value}"))
        .collect();
    if explain.fairness > 0.0 {
        parts.push(format!("+{} fair", explain.fairness));
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" · ")
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn score_cell(score: f64) -> Cell {
    Cell::new(score)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
