//! Current-activity selection over a schedule's activities.

use chrono::NaiveDate;

use crate::activity::Activity;

/// Pick the single most relevant activity for `today`.
///
/// Priority order: an activity whose inclusive date range covers today
/// (first in input order wins), else the upcoming activity with the
/// earliest start, else the activity that ended most recently. Ties always
/// resolve to the earlier position in the input. Empty input yields None.
pub fn select_current_activity(activities: &[Activity], today: NaiveDate) -> Option<&Activity> {
    if activities.is_empty() {
        return None;
    }

    if let Some(active) = activities
        .iter()
        .find(|a| a.start_date <= today && today <= a.end_date)
    {
        return Some(active);
    }

    let mut upcoming: Option<&Activity> = None;
    for a in activities.iter().filter(|a| a.start_date > today) {
        match upcoming {
            Some(best) if best.start_date <= a.start_date => {}
            _ => upcoming = Some(a),
        }
    }
    if upcoming.is_some() {
        return upcoming;
    }

    let mut latest: Option<&Activity> = None;
    for a in activities {
        match latest {
            Some(best) if best.end_date >= a.end_date => {}
            _ => latest = Some(a),
        }
    }
    latest
}
