use briefly::commands::{CmdMessage, MessageLevel, Redirect};
use briefly::config::ClientConfig;
use briefly::error::BrieflyError;
use briefly::model::{AdminAnalytics, NoteRecord, SummaryEntry};
use briefly::nav::{NavItem, NavState};
use briefly::session::Session;
use chrono::{DateTime, Utc};
use colored::Colorize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 6;
const LENGTH_WIDTH: usize = 8;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Field-level detail for validation failures; the primary error itself is
/// printed by `main` as the top-level message.
pub(super) fn print_error_details(err: &BrieflyError) {
    if let BrieflyError::Validation(errors) = err {
        if errors.len() < 2 {
            return;
        }
        for (field, reason) in errors.iter() {
            eprintln!("  {} {}", format!("{field}:").yellow(), reason);
        }
    }
}

pub(super) fn print_redirect(redirect: &Redirect) {
    println!(
        "{} {}",
        "Next:".dimmed(),
        redirect.route.command().bold()
    );
}

pub(super) fn print_session(session: &Session, nav: &NavState) {
    if session.is_authenticated() {
        let role = if session.is_admin() { "admin" } else { "user" };
        let since = session
            .logged_in_at()
            .map(|at| format!(" ({})", format_time_ago(at)))
            .unwrap_or_default();
        println!("{} as {}{}", "Logged in".green(), role, since.dimmed());
    } else {
        println!("{}", "Not logged in".yellow());
    }
    print_nav(nav);
}

pub(super) fn print_nav(nav: &NavState) {
    let labels: Vec<String> = nav
        .items()
        .iter()
        .map(|item| match item {
            NavItem::Link(route) => format!("{} ({})", route.label(), route.command().dimmed()),
            NavItem::Logout => format!("Logout ({})", "briefly logout".dimmed()),
        })
        .collect();
    for label in labels {
        println!("  {label}");
    }
}

pub(super) fn print_notes(notes: &[NoteRecord], total: usize) {
    println!(
        "{}",
        format!("Showing {} of {} notes", notes.len(), total).dimmed()
    );
    if total == 0 {
        println!("No notes found.");
        return;
    }
    if notes.is_empty() {
        return;
    }

    for note in notes {
        let id = format!("{:>width$}. ", note.id, width = ID_WIDTH);
        let length = format!("{:>width$}", format!("{} ch", note.len()), width = LENGTH_WIDTH);
        let available = LINE_WIDTH.saturating_sub(id.width() + LENGTH_WIDTH + 1);

        let preview: String = note
            .content
            .chars()
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let preview = truncate_to_width(&preview, available);
        let padding = available.saturating_sub(preview.width());

        println!(
            "{}{}{} {}",
            id.yellow(),
            preview,
            " ".repeat(padding),
            length.dimmed()
        );
    }
}

pub(super) fn print_summaries(summaries: &[SummaryEntry]) {
    for entry in summaries {
        println!(
            "{}{}",
            format!("{:>width$}. ", entry.id, width = ID_WIDTH).yellow(),
            entry.filename
        );
    }
}

pub(super) fn print_summary_text(text: &str) {
    println!("{}", "Summary".bold());
    println!("--------------------------------");
    println!("{text}");
}

pub(super) fn print_analytics(analytics: &AdminAnalytics) {
    println!("{}", "Admin Analytics".bold());
    println!("  Total summaries: {}", analytics.total_summaries);
    println!("  Total users:     {}", analytics.total_users);
}

pub(super) fn print_config(config: &ClientConfig) {
    for key in ClientConfig::KEYS {
        if let Some(value) = config.get(key) {
            println!("{key} = {value}");
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
