use crate::catalog::TOP_N;
use crate::core::error::MagicError;
use crate::providers::{Completion, ModelDescriptor};
use crate::utils::text::{format_context_length, format_price_per_million, wrap_text};
use console::{Style, measure_text_width, style};
use serde_json::Value;
use std::time::Duration;

const BOX_TITLE: &str = "Magic Command";
const USAGE_TEMPLATE: &str = "Usage: xxx tokens, took x.xx secs";

/// Widest box content that fits the current terminal.
fn max_content_width() -> usize {
    let terminal_width = console::Term::stdout().size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(6), 100).max(40)
}

/// Draw a round-cornered box with the title in the top border. Lines may carry
/// ANSI styling; widths are measured without it.
pub fn render_box(title: &str, lines: &[String], border: Style) -> String {
    let title_width = measure_text_width(title);
    let width = lines
        .iter()
        .map(|line| measure_text_width(line))
        .max()
        .unwrap_or(0)
        .max(title_width + 1);

    let top = format!(
        "╭─ {} {}╮",
        title,
        "─".repeat((width + 2).saturating_sub(title_width + 3))
    );
    let bottom = format!("╰{}╯", "─".repeat(width + 2));

    let mut out = vec![border.apply_to(top).to_string()];
    for line in lines {
        let padding = width.saturating_sub(measure_text_width(line));
        out.push(format!(
            "{} {}{} {}",
            border.apply_to("│"),
            line,
            " ".repeat(padding),
            border.apply_to("│")
        ));
    }
    out.push(border.apply_to(bottom).to_string());
    out.join("\n")
}

/// The dim line under an answer: token usage, elapsed time and cited sources.
/// Sources share the usage line only when the answer is wide enough to hold both.
pub fn usage_footer(
    total_tokens: Option<u64>,
    elapsed: Duration,
    sources: &[String],
    answer: &str,
) -> String {
    let tokens = total_tokens
        .map(|t| t.to_string())
        .unwrap_or_else(|| "?".to_string());
    let mut footer = format!(
        "Usage: {} tokens, took {:.2} secs",
        tokens,
        elapsed.as_secs_f64()
    );

    if sources.is_empty() {
        return footer;
    }

    let sources = sources.join(" ");
    let longest_line = answer.lines().map(measure_text_width).max().unwrap_or(0);
    if longest_line > sources.len() + USAGE_TEMPLATE.len() {
        footer.push_str(" ― ");
    } else {
        footer.push('\n');
    }
    footer.push_str("Sources: ");
    footer.push_str(&sources);
    footer
}

/// Display the answer with its usage footer
pub fn display_answer(completion: &Completion, elapsed: Duration) {
    let width = max_content_width();
    let mut lines: Vec<String> = completion
        .text
        .lines()
        .flat_map(|line| wrap_text(line, width))
        .map(|line| style(line).cyan().to_string())
        .collect();

    lines.push(String::new());
    let footer = usage_footer(
        completion.total_tokens,
        elapsed,
        &completion.sources(),
        &completion.text,
    );
    lines.extend(
        footer
            .lines()
            .flat_map(|line| wrap_text(line, width))
            .map(|line| style(line).dim().italic().to_string()),
    );

    println!("\n{}\n", render_box(BOX_TITLE, &lines, Style::new().green()));
}

/// Render a fatal error. Verbose mode first dumps the parsed reply or the
/// unparsed body behind it.
pub fn render_error(err: &MagicError, verbose: bool) -> String {
    let width = max_content_width();
    let mut out = Vec::new();

    if verbose {
        if let Some(raw) = err.raw_json() {
            out.push(render_raw_json(raw));
        }
    }

    let message = match err {
        MagicError::Config(message) => message.clone(),
        MagicError::Network(_) | MagicError::Api { .. } => {
            format!("An error occured while fetching the API: {}", err)
        }
        MagicError::MalformedResponse {
            status,
            reason,
            detail,
            ..
        } => format!(
            "An error occured while parsing the response from the API: {}\n\nHTTP Code: {} {}",
            detail, status, reason
        ),
        other => other.to_string(),
    };
    let lines: Vec<String> = message
        .lines()
        .flat_map(|line| wrap_text(line, width))
        .collect();
    out.push(render_box(BOX_TITLE, &lines, Style::new().red()));

    if verbose {
        if let Some(body) = err.raw_body() {
            let lines: Vec<String> = format!("Unparsed response was {}", body)
                .lines()
                .flat_map(|line| wrap_text(line, width))
                .collect();
            out.push(render_box(BOX_TITLE, &lines, Style::new().red()));
        }
    }

    out.join("\n\n")
}

pub fn display_error(err: &MagicError, verbose: bool) {
    eprintln!("\n{}\n", render_error(err, verbose));
}

fn render_raw_json(raw: &Value) -> String {
    let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
    let lines: Vec<String> = pretty
        .lines()
        .map(|line| style(line).dim().to_string())
        .collect();
    render_box("Raw response", &lines, Style::new().white().dim())
}

/// Dump the raw response JSON (verbose mode)
pub fn display_raw_json(raw: &Value) {
    eprintln!("{}", render_raw_json(raw));
}

fn created_on(created: i64) -> String {
    chrono::DateTime::from_timestamp(created, 0)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Lines describing one model in a ranking report
pub fn model_entry(model: &ModelDescriptor) -> Vec<String> {
    let value = |v: String| style(v).cyan().to_string();
    vec![
        format!(
            "  • {} {}",
            style(&model.name).bold(),
            style(format!(" ({})", model.id)).dim().italic()
        ),
        format!("    Created on: {}", value(created_on(model.created))),
        format!(
            "    Context length: {}",
            value(format_context_length(model.context_length))
        ),
        "    Pricing (per million tokens):".to_string(),
        format!(
            "      Input: {} $",
            value(format_price_per_million(model.pricing.prompt))
        ),
        format!(
            "      Output: {} $",
            value(format_price_per_million(model.pricing.completion))
        ),
    ]
}

/// Render the first `TOP_N` models of a ranked list under `title`
pub fn render_ranking(title: &str, ranked: &[ModelDescriptor]) -> String {
    let mut lines = vec![format!("{}:", title)];
    if ranked.is_empty() {
        lines.push(style("  No matching models").dim().to_string());
    }
    for (i, model) in ranked.iter().take(TOP_N).enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(model_entry(model));
    }
    render_box(BOX_TITLE, &lines, Style::new().green())
}

pub fn display_ranking(title: &str, ranked: &[ModelDescriptor]) {
    println!("\n{}", render_ranking(title, ranked));
}

pub fn version_banner() -> String {
    [
        format!(
            "Magic Command is using version {}",
            style(env!("CARGO_PKG_VERSION")).cyan()
        ),
        "─".repeat(44),
        format!("Developed by {}", env!("CARGO_PKG_AUTHORS")),
        style(env!("CARGO_PKG_HOMEPAGE")).cyan().to_string(),
    ]
    .join("\n")
}

pub fn display_version() {
    println!("{}", version_banner());
}
