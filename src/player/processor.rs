use chrono::{DateTime, Utc};

use super::history::MatchEntry;
use super::models::{level_for_experience, PlayerRecord, RATING_DELTA, RATING_FLOOR};
use super::types::MatchReportRequest;

/// Applies one match result to a player record.
///
/// Pure on purpose: the service fetches, applies, and writes back
/// under the player lock, so every rule about a single match lives
/// here where it can be tested without a store.
pub fn apply_match_report(
    mut record: PlayerRecord,
    report: &MatchReportRequest,
    now: DateTime<Utc>,
) -> PlayerRecord {
    if let Some(nickname) = report.nickname.as_deref() {
        if !nickname.is_empty() {
            record.nickname = Some(nickname.to_string());
        }
    }

    record.games_played += 1;
    if report.win {
        record.wins += 1;
    }
    if report.is_mvp {
        record.mvp_count += 1;
    }

    record.experience += report.exp_gain.max(0);
    record.level = level_for_experience(record.experience);

    let swing = if report.win {
        RATING_DELTA
    } else {
        -RATING_DELTA
    };
    record.rating = (record.rating + swing).max(RATING_FLOOR);

    record.match_history.record(MatchEntry {
        hero: report.hero.clone(),
        win: report.win,
        prestige: report.prestige,
        kills: report.kills,
        damage: report.damage,
        recorded_at: now,
    });
    record.last_updated = now;

    record
}
