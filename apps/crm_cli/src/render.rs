use std::fmt::Write as _;

use client_core::{BoardColumn, Notification, NotificationLevel};
use shared::{
    domain::{Client, Member},
    process::{FieldValue, Process, ProcessDraft, TabSpec},
    status,
};

fn flag(done: bool) -> &'static str {
    if done {
        "x"
    } else {
        " "
    }
}

pub fn client_list(clients: &[Client], process_counts: &[usize]) -> String {
    if clients.is_empty() {
        return "no clients\n".to_string();
    }
    let mut out = String::new();
    for (client, processes) in clients.iter().zip(process_counts) {
        let entry = status::lookup(client.status.as_str());
        let _ = writeln!(
            out,
            "#{:<5} {:<28} {:<22} [{}] agenda [{}] follow-up  {} processes  {}",
            client.id.0,
            client.name,
            entry.label,
            flag(client.scheduling_done),
            flag(client.follow_up_done),
            processes,
            client.interest,
        );
    }
    out
}

pub fn board(columns: &[BoardColumn]) -> String {
    let mut out = String::new();
    for column in columns {
        let _ = writeln!(
            out,
            "== {} ({}) [{}]",
            column.stage.label,
            column.count(),
            column.stage.color
        );
        if column.clients.is_empty() {
            let _ = writeln!(out, "   -");
        }
        for client in &column.clients {
            let _ = writeln!(out, "   #{} {}", client.id.0, client.name);
        }
    }
    out
}

pub fn processes(client: &Client, processes: &[Process]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "processes of #{} {}", client.id.0, client.name);
    if processes.is_empty() {
        let _ = writeln!(out, "   none");
    }
    for process in processes {
        let _ = writeln!(
            out,
            "   #{} [{}] {} {}",
            process.id.0,
            process.jurisdiction().label(),
            process.common.internal_number,
            process.common.main_subject,
        );
    }
    out
}

pub fn schema(tabs: &[TabSpec]) -> String {
    let mut out = String::new();
    for tab in tabs {
        let _ = writeln!(out, "[{}]", tab.tab.label());
        for spec in tab.fields {
            let _ = writeln!(
                out,
                "   {:<32} {} ({:?})",
                spec.field.key(),
                spec.label,
                spec.field.kind()
            );
            for choice in spec.choices {
                let _ = writeln!(out, "      - {} = {}", choice.value, choice.label);
            }
        }
    }
    out
}

/// Fields of `draft` that differ from a blank value, for a save preview.
pub fn draft_summary(draft: &ProcessDraft, tabs: &[TabSpec]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} process for client #{}",
        draft.jurisdiction().label(),
        draft.client_id.0
    );
    for spec in tabs.iter().flat_map(|tab| tab.fields.iter()) {
        let Some(value) = draft.field(spec.field) else {
            continue;
        };
        let blank = match &value {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Number(number) => *number == 0.0,
            FieldValue::Flag(set) => !set,
        };
        if !blank {
            let _ = writeln!(out, "   {}: {}", spec.label, value);
        }
    }
    out
}

pub fn members(members: &[Member]) -> String {
    if members.is_empty() {
        return "no members\n".to_string();
    }
    let mut out = String::new();
    for member in members {
        let _ = writeln!(
            out,
            "{}  {:<24} {:<32} {}",
            member.id,
            member.name,
            member.email,
            if member.active { "active" } else { "inactive" }
        );
    }
    out
}

pub fn notification(notification: &Notification) -> String {
    let level = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    match &notification.description {
        Some(description) => format!("[{level}] {}: {description}", notification.title),
        None => format!("[{level}] {}", notification.title),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
