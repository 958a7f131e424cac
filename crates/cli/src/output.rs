//! Terminal rendering of calls and tracker events

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use dialwatch_call_core::{Call, CallDetails, CallStatus};
use dialwatch_call_tracker::{EndReason, TrackerEvent};
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub fn status_label(status: &CallStatus) -> ColoredString {
    let text = status.as_str();
    match status {
        CallStatus::Initiated => text.cyan(),
        CallStatus::Ringing => text.yellow(),
        CallStatus::Answered => text.green().bold(),
        CallStatus::Ended => text.blue(),
        CallStatus::Failed => text.red().bold(),
        CallStatus::Unknown | CallStatus::Other(_) => text.normal(),
    }
}

pub fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub fn describe_event(event: &TrackerEvent) -> String {
    match event {
        TrackerEvent::CallStarted { call } => format!(
            "{} {} -> {} ({})",
            "Call started:".bold(),
            call.id,
            call.destination,
            status_label(&call.status)
        ),
        TrackerEvent::StatusChanged {
            call_id,
            previous,
            status,
        } => format!(
            "{call_id}: {} -> {}",
            status_label(previous),
            status_label(status)
        ),
        TrackerEvent::PollFailed { call_id, error } => {
            format!("{call_id}: {} {error}", "status check failed:".yellow())
        }
        TrackerEvent::PersistFailed {
            call_id,
            status,
            error,
        } => format!(
            "{call_id}: {} {} ({error})",
            "could not save status".red(),
            status_label(status)
        ),
        TrackerEvent::TrackingEnded { call_id, reason } => match reason {
            EndReason::Terminal(status) => {
                format!("{call_id}: tracking finished ({})", status_label(status))
            }
            EndReason::Cancelled => format!("{call_id}: tracking stopped"),
        },
    }
}

pub fn event_json(event: &TrackerEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Call ID")]
    id: String,
    #[tabled(rename = "To")]
    destination: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

pub fn history_table(calls: &[Call]) -> String {
    let rows = calls.iter().map(|call| HistoryRow {
        id: call.id.to_string(),
        destination: call.destination.clone(),
        status: status_label(&call.status).to_string(),
        created: format_timestamp(call.created_at),
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn details_lines(details: &CallDetails) -> Vec<String> {
    let fields = [
        ("Call ID", details.call_uuid.as_deref()),
        ("Status", details.raw_status()),
        ("Direction", details.direction.as_deref()),
        ("Caller name", details.caller_name.as_deref()),
        ("Caller number", details.caller_number.as_deref()),
        ("Called number", details.called_number.as_deref()),
        ("Started", details.start_time.as_deref()),
        ("Answered", details.answer_time.as_deref()),
        ("Ended", details.end_time.as_deref()),
    ];

    let mut lines: Vec<String> = fields
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{:<14} {v}", format!("{label}:"))))
        .collect();
    if let Some(secs) = details.duration_secs {
        lines.push(format!("{:<14} {secs}s", "Duration:"));
    }
    lines
}
