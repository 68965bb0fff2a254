//! Plain-text rendering of the mirror for terminal output.

use std::fmt::Write;

use scoreboard_core::{Match, Role};

use crate::mirror::LiveMirror;

pub const WAITING: &str = "Waiting for match data...";
pub const NO_MATCHES: &str = "No matches yet";
pub const PICK_A_MATCH: &str = "Pick a match from the list to see the live updates!";

/// Full board for `role`: header, match list, and (viewer only) the detail
/// panel for the selected match.
pub fn render_board(mirror: &LiveMirror, role: Role, server_url: &str) -> String {
    let mut out = header(mirror.is_live(), server_url);
    out.push('\n');
    match role {
        Role::Admin => render_admin(&mut out, mirror.matches()),
        Role::User => {
            render_feed(&mut out, mirror.matches());
            out.push('\n');
            render_detail(&mut out, mirror.selected());
        }
    }
    out
}

/// Connectivity line.
pub fn header(live: bool, server_url: &str) -> String {
    let status = if live { "SERVER CONNECTED" } else { "OFFLINE" };
    format!("FOOTBALL LIVE  [{status}]  {server_url}\n")
}

/// `team1  score  team2`, with team1 right-aligned so scores line up.
pub fn match_line(m: &Match, team1_width: usize) -> String {
    format!("{:>width$}  {}  {}", m.team1, m.score, m.team2, width = team1_width)
}

fn team1_width(matches: &[Match]) -> usize {
    matches
        .iter()
        .map(|m| m.team1.chars().count())
        .max()
        .unwrap_or(0)
}

fn render_feed(out: &mut String, matches: &[Match]) {
    let _ = writeln!(out, "Matchday Feed");
    if matches.is_empty() {
        let _ = writeln!(out, "  {WAITING}");
        return;
    }
    let width = team1_width(matches);
    for m in matches {
        let _ = writeln!(out, "  {}", match_line(m, width));
    }
}

fn render_detail(out: &mut String, selected: Option<&Match>) {
    let _ = writeln!(out, "MATCH CENTER");
    match selected {
        Some(m) => {
            let _ = writeln!(out, "  {} vs {}", m.team1, m.team2);
            let _ = writeln!(out, "  {}", m.score);
        }
        None => {
            let _ = writeln!(out, "  {PICK_A_MATCH}");
        }
    }
}

fn render_admin(out: &mut String, matches: &[Match]) {
    let _ = writeln!(out, "Live Matches  {} MATCHES LIVE", matches.len());
    if matches.is_empty() {
        let _ = writeln!(out, "  {NO_MATCHES}");
        return;
    }
    let id_width = matches
        .iter()
        .map(|m| m.id.to_string().len())
        .max()
        .unwrap_or(1);
    let width = team1_width(matches);
    for m in matches {
        let _ = writeln!(
            out,
            "  #{:<id_width$}  {}",
            m.id.to_string(),
            match_line(m, width),
            id_width = id_width
        );
    }
}
