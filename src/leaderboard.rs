use itertools::Itertools;

use crate::record::{RecordId, ScoreRecord};

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum MedalTier {
    #[strum(to_string = "🥇")]
    Gold,
    #[strum(to_string = "🥈")]
    Silver,
    #[strum(to_string = "🥉")]
    Bronze,
    #[strum(to_string = " ")]
    None,
}

impl MedalTier {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => MedalTier::Gold,
            2 => MedalTier::Silver,
            3 => MedalTier::Bronze,
            _ => MedalTier::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub id: RecordId,
    pub record: ScoreRecord,
    pub medal: MedalTier,
    pub is_current: bool,
}

impl LeaderboardEntry {
    pub fn accuracy_percent(&self) -> f64 {
        self.record.accuracy * 100.0
    }
}

/// Ranks `records` by score, best first.
///
/// Equal scores go to the earlier date, then to the earlier append.
/// Only the first `limit` entries are returned, and the one whose id is
/// `current` is flagged.
pub fn compute(
    records: &[(RecordId, ScoreRecord)],
    limit: usize,
    current: Option<RecordId>,
) -> Vec<LeaderboardEntry> {
    records
        .iter()
        .sorted_by(|(a_id, a), (b_id, b)| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| a_id.cmp(b_id))
        })
        .take(limit)
        .enumerate()
        .map(|(idx, (id, record))| LeaderboardEntry {
            rank: idx + 1,
            id: *id,
            record: record.clone(),
            medal: MedalTier::for_rank(idx + 1),
            is_current: Some(*id) == current,
        })
        .collect()
}

/// Plain-text table with the columns `Rank Score Accuracy Date`
pub fn format_table(entries: &[LeaderboardEntry]) -> String {
    let mut out = String::from("Rank  Score  Accuracy   Date\n");
    out.push_str(&"-".repeat(40));
    out.push('\n');
    for entry in entries {
        out.push_str(&format!(
            "{:<4}{} {:>6}   {:>6.2}%   {}{}\n",
            entry.rank,
            entry.medal,
            entry.record.score,
            entry.accuracy_percent(),
            entry.record.date_string(),
            if entry.is_current { "  <" } else { "" },
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(score: u32, day: u32) -> ScoreRecord {
        let date = NaiveDate::from_ymd_opt(2026, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        ScoreRecord::new(date, score, "", 0)
    }

    fn with_ids(records: Vec<ScoreRecord>) -> Vec<(RecordId, ScoreRecord)> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, r)| (RecordId(i), r))
            .collect()
    }

    #[test]
    fn sorted_descending_with_contiguous_ranks() {
        let records = with_ids(vec![rec(5, 1), rec(20, 2), rec(11, 3), rec(2, 4)]);
        let board = compute(&records, 10, None);

        let scores: Vec<u32> = board.iter().map(|e| e.record.score).collect();
        assert_eq!(scores, vec![20, 11, 5, 2]);
        let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn medals_for_top_three_only() {
        let records = with_ids((1..=5).map(|s| rec(s, s)).collect());
        let board = compute(&records, 10, None);
        let medals: Vec<MedalTier> = board.iter().map(|e| e.medal).collect();
        assert_eq!(
            medals,
            vec![
                MedalTier::Gold,
                MedalTier::Silver,
                MedalTier::Bronze,
                MedalTier::None,
                MedalTier::None
            ]
        );
    }

    #[test]
    fn ties_go_to_earliest_date() {
        let records = with_ids(vec![rec(10, 9), rec(10, 3), rec(10, 5)]);
        let board = compute(&records, 10, None);
        let ids: Vec<RecordId> = board.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![RecordId(1), RecordId(2), RecordId(0)]);
    }

    #[test]
    fn full_ties_go_to_earliest_append() {
        let records = with_ids(vec![rec(10, 3), rec(10, 3)]);
        let board = compute(&records, 10, None);
        assert_eq!(board[0].id, RecordId(0));
        assert_eq!(board[1].id, RecordId(1));
    }

    #[test]
    fn truncated_to_limit() {
        let records = with_ids((1..=13).map(|s| rec(s, 1)).collect());
        let board = compute(&records, 10, None);
        assert_eq!(board.len(), 10);
        assert_eq!(board.last().map(|e| e.record.score), Some(4));
    }

    #[test]
    fn current_marked_only_when_ranked() {
        let mut records: Vec<ScoreRecord> = (10..22).map(|s| rec(s, 1)).collect();
        records.push(rec(15, 2));
        let records = with_ids(records);

        let board = compute(&records, 10, Some(RecordId(12)));
        assert_eq!(board.iter().filter(|e| e.is_current).count(), 1);

        let board = compute(&records, 3, Some(RecordId(12)));
        assert!(board.iter().all(|e| !e.is_current));
        assert!(board.iter().all(|e| e.id != RecordId(12)));
    }

    #[test]
    fn empty_input_gives_empty_board() {
        assert!(compute(&[], 10, None).is_empty());
    }

    #[test]
    fn table_marks_current_run() {
        let records = with_ids(vec![rec(4, 1), rec(9, 2)]);
        let table = format_table(&compute(&records, 10, Some(RecordId(0))));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("1   🥇"));
        assert!(lines[3].ends_with("<"));
        assert!(lines[3].contains("01.01.2026"));
    }
}
