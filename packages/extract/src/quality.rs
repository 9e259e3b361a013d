//! Scoring of extracted schedules.

use plan_extract_models::{IronmongeryItem, QualityAssessment, ScheduleItem};

use crate::schedule::calculate_schedule_completeness;

/// Whether the numeric parts of the item ids form an unbroken run.
///
/// Each id contributes its first run of digits; ids without digits are
/// ignored. Vacuously true for fewer than two items.
#[must_use]
pub fn check_sequential_numbering(items: &[ScheduleItem]) -> bool {
    if items.len() <= 1 {
        return true;
    }

    let mut numbers: Vec<u64> = items
        .iter()
        .filter_map(|item| leading_number(&item.id))
        .collect();
    numbers.sort_unstable();

    numbers
        .windows(2)
        .all(|pair| pair[0].checked_add(1) == Some(pair[1]))
}

fn leading_number(id: &str) -> Option<u64> {
    let start = id.find(|c: char| c.is_ascii_digit())?;
    let digits = &id[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Whether any door entry mentions an ironmongery id in its details.
///
/// Always false without ironmongery items.
#[must_use]
pub fn check_cross_referencing(doors: &[ScheduleItem], ironmongery: &[IronmongeryItem]) -> bool {
    if ironmongery.is_empty() {
        return false;
    }

    let ids: Vec<String> = ironmongery.iter().map(|item| item.id.to_lowercase()).collect();
    doors.iter().any(|door| {
        let details = door.details.to_lowercase();
        ids.iter().any(|id| details.contains(id.as_str()))
    })
}

/// Scores a set of schedules and lists what is good and bad about them.
#[must_use]
pub fn assess_schedule_quality(
    windows: &[ScheduleItem],
    doors: &[ScheduleItem],
    ironmongery: &[IronmongeryItem],
) -> QualityAssessment {
    let has_windows = !windows.is_empty();
    let has_doors = !doors.is_empty();
    let has_ironmongery = !ironmongery.is_empty();

    let completeness = calculate_schedule_completeness(windows, doors);
    let sequential_windows = has_windows && check_sequential_numbering(windows);
    let sequential_doors = has_doors && check_sequential_numbering(doors);
    let cross_referenced = check_cross_referencing(doors, ironmongery);

    let mut strengths = Vec::new();
    let mut issues = Vec::new();

    if has_windows {
        strengths.push("Window schedule present");
    }
    if has_doors {
        strengths.push("Door schedule present");
    }
    if has_ironmongery {
        strengths.push("Ironmongery schedule present");
    }
    if completeness > 0.8 {
        strengths.push("Schedules are highly complete");
    }
    if sequential_windows {
        strengths.push("Window numbering is sequential");
    }
    if sequential_doors {
        strengths.push("Door numbering is sequential");
    }
    if cross_referenced {
        strengths.push("Schedules are cross-referenced");
    }

    if !has_windows && !has_doors {
        issues.push("No window or door schedules found");
    }
    if completeness < 0.5 {
        issues.push("Schedules are incomplete");
    }
    if has_windows && !sequential_windows {
        issues.push("Window numbering is not sequential");
    }
    if has_doors && !sequential_doors {
        issues.push("Door numbering is not sequential");
    }
    if has_ironmongery && !cross_referenced {
        issues.push("Schedules lack cross-referencing");
    }

    let bonus = |present: bool, amount: f64| if present { amount } else { 0.0 };
    let score = 0.5
        + bonus(has_windows, 0.1)
        + bonus(has_doors, 0.1)
        + bonus(has_ironmongery, 0.1)
        + completeness * 0.3
        + bonus(sequential_windows, 0.05)
        + bonus(sequential_doors, 0.05)
        + bonus(cross_referenced, 0.1);

    QualityAssessment {
        score: score.clamp(0.0, 1.0),
        issues: issues.into_iter().map(str::to_owned).collect(),
        strengths: strengths.into_iter().map(str::to_owned).collect(),
    }
}
