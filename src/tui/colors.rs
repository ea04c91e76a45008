//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{DefectStatus, Severity, TaskPriority, TaskStatus};

pub const SLATE: Color = Color::Rgb(107, 114, 128);
pub const BLUE: Color = Color::Rgb(59, 130, 246);
pub const YELLOW: Color = Color::Rgb(234, 179, 8);
pub const ORANGE: Color = Color::Rgb(249, 115, 22);
pub const PURPLE: Color = Color::Rgb(168, 85, 247);
pub const GREEN: Color = Color::Rgb(34, 197, 94);
pub const RED: Color = Color::Rgb(239, 68, 68);
pub const AMBER: Color = Color::Rgb(245, 158, 11);

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::DefiningDetails => SLATE,
        TaskStatus::InDevelopment => BLUE,
        TaskStatus::InFunctionalTest => YELLOW,
        TaskStatus::E2e => ORANGE,
        TaskStatus::WaitingToDeploy => PURPLE,
        TaskStatus::Complete => GREEN,
    }
}

pub fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::High => RED,
        TaskPriority::Medium => AMBER,
        TaskPriority::Low => GREEN,
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Rgb(220, 38, 38),
        Severity::High => Color::Rgb(234, 88, 12),
        Severity::Medium => AMBER,
        Severity::Low => Color::Rgb(132, 204, 22),
    }
}

pub fn defect_status_color(status: DefectStatus) -> Color {
    match status {
        DefectStatus::Open => RED,
        DefectStatus::InProgress => BLUE,
        DefectStatus::Fixed => Color::Rgb(139, 92, 246),
        DefectStatus::Verified => Color::Rgb(16, 185, 129),
        DefectStatus::Closed => GREEN,
        DefectStatus::Reopened => ORANGE,
    }
}
