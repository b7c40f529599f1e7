use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::model::{Category, Event, PriorityTier, SourceKind};
use crate::normalize::default_audience;
use crate::settings::RankPolicy;

/// Order events by tier (high first), then by `policy`. The sort is stable,
/// so events with equal keys keep their input order.
pub fn rank(mut events: Vec<Event>, policy: RankPolicy) -> Vec<Event> {
    events.sort_by(|a, b| compare(a, b, policy));
    events
}

pub fn compare(a: &Event, b: &Event, policy: RankPolicy) -> Ordering {
    b.priority_tier
        .cmp(&a.priority_tier)
        .then_with(|| match policy {
            RankPolicy::LookaheadDesc => b.lookahead_days.cmp(&a.lookahead_days),
            RankPolicy::DateAsc => a.date.cmp(&b.date),
        })
}

/// Keep at most `max_events` events from the front of the list.
pub fn truncate(mut events: Vec<Event>, max_events: usize) -> Vec<Event> {
    if events.len() > max_events {
        debug!(from = events.len(), to = max_events, "truncating ranked events");
        events.truncate(max_events);
    }
    events
}

/// Append the placeholder event when fewer than `min_events` are present.
/// Returns whether it was injected.
pub fn inject_fallback(events: &mut Vec<Event>, today: NaiveDate, min_events: usize) -> bool {
    if events.len() >= min_events {
        return false;
    }
    debug!(count = events.len(), min_events, "injecting fallback event");
    events.push(fallback_event(today));
    true
}

pub fn fallback_event(today: NaiveDate) -> Event {
    let categories = BTreeSet::from([Category::IndustryTrend]);
    Event {
        id: format!("fallback_{}", today.format("%Y-%m-%d")),
        date: today,
        display_name: "今日创意灵感".to_string(),
        display_name_en: "Daily Creative Inspiration".to_string(),
        target_audience: default_audience(&categories).to_string(),
        categories,
        priority_tier: PriorityTier::Medium,
        regions: vec!["global".to_string()],
        lookahead_days: 0,
        source_kind: SourceKind::Fallback,
        metadata: Default::default(),
        marketing_copy: None,
        image_prompts: vec![],
    }
}

/// Give repeated ids a `-2`, `-3`, ... suffix in input order, skipping
/// suffixes that are already taken.
pub fn ensure_unique_ids(events: &mut [Event]) {
    let mut taken: HashSet<String> = HashSet::with_capacity(events.len());
    for event in events.iter_mut() {
        if taken.insert(event.id.clone()) {
            continue;
        }
        let renamed = (2..)
            .map(|n| format!("{}-{n}", event.id))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_default();
        warn!(id = %event.id, %renamed, "duplicate event id");
        taken.insert(renamed.clone());
        event.id = renamed;
    }
}
