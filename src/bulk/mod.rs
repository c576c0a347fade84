//! Bulk roster import/export.
//!
//! The wire shape is flat: one row per pick, several rows per
//! participant. Import groups rows back into participant drafts; export
//! emits the exact mirror shape so an exported roster re-imports to an
//! equivalent participant set. Spreadsheet encoding/decoding stays on
//! the client side; the API exchanges these rows as JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{validate_picks, Participant, Pick, Team};
use crate::storage::{self, StorageConfig, StorageError};

/// One flat roster row (one pick).
///
/// Import only requires `participant_name`, `team_id`, `priority` and
/// `registration_order`; the team display columns are export
/// enrichment for spreadsheet readers and ignored on the way in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkRow {
    #[serde(default)]
    pub participant_name: Option<String>,

    #[serde(default)]
    pub team_id: Option<i64>,

    #[serde(default)]
    pub priority: Option<i64>,

    #[serde(default)]
    pub registration_order: Option<i64>,

    #[serde(default)]
    pub team_slug: Option<String>,

    #[serde(default)]
    pub team_name: Option<String>,

    #[serde(default)]
    pub short_code: Option<String>,
}

/// A grouped, not-yet-validated participant from bulk rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDraft {
    pub name: String,
    pub registration_order: u32,
    pub picks: Vec<Pick>,
}

/// Outcome of a bulk import run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

/// Group flat rows by participant name into drafts.
///
/// Rows missing a name, a positive numeric team id, or a positive
/// numeric priority are silently skipped. Each draft's picks come out
/// sorted by priority; drafts keep first-seen row order. The first row
/// of a group supplies the registration order (0 when absent — the
/// creation path then assigns max+1).
pub fn parse_bulk_rows(rows: &[BulkRow]) -> Vec<ParticipantDraft> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, ParticipantDraft> = HashMap::new();

    for row in rows {
        let name = match row.participant_name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => continue,
        };
        let team_id = match row.team_id {
            Some(id) if id > 0 => id as u32,
            _ => continue,
        };
        let priority = match row.priority {
            Some(p) if p > 0 => p as u32,
            _ => continue,
        };

        let draft = grouped.entry(name.clone()).or_insert_with(|| {
            order.push(name.clone());
            ParticipantDraft {
                name,
                registration_order: row
                    .registration_order
                    .filter(|&o| o > 0)
                    .unwrap_or(0) as u32,
                picks: Vec::new(),
            }
        });
        draft.picks.push(Pick { team_id, priority });
    }

    order
        .into_iter()
        .filter_map(|name| grouped.remove(&name))
        .map(|mut draft| {
            draft.picks.sort_by_key(|p| p.priority);
            draft
        })
        .collect()
}

/// Flatten the participant set into export rows, picks in priority
/// order, enriched with current team display columns where the team is
/// still in the standings.
pub fn export_rows(participants: &[Participant], teams_by_external_id: &HashMap<u32, Team>) -> Vec<BulkRow> {
    let mut rows = Vec::new();

    for participant in participants {
        for pick in participant.picks_by_priority() {
            let team = teams_by_external_id.get(&pick.team_id);
            rows.push(BulkRow {
                participant_name: Some(participant.name.clone()),
                team_id: Some(pick.team_id as i64),
                priority: Some(pick.priority as i64),
                registration_order: Some(participant.registration_order as i64),
                team_slug: team.map(|t| t.slug.clone()),
                team_name: team.map(|t| t.name.clone()),
                short_code: team.map(|t| t.short_code.clone()),
            });
        }
    }

    rows
}

/// Apply a bulk import against the participant store.
///
/// Existing names are skipped, drafts failing validation collect error
/// strings, and everything valid lands in one store write. When the
/// standings store is non-empty, picks must reference known teams.
pub fn apply_import(
    config: &StorageConfig,
    rows: &[BulkRow],
    n_picks: usize,
) -> Result<ImportSummary, StorageError> {
    let teams = storage::read_teams(config)?;
    let mut participants = storage::read_participants(config)?;
    let mut summary = ImportSummary::default();

    for draft in parse_bulk_rows(rows) {
        if participants
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&draft.name))
        {
            summary.skipped += 1;
            continue;
        }

        if let Err(e) = validate_picks(&draft.picks, n_picks) {
            summary.errors.push(format!("{}: {}", draft.name, e));
            continue;
        }
        if !teams.is_empty() {
            if let Some(pick) = draft
                .picks
                .iter()
                .find(|p| !teams.iter().any(|t| t.external_id == p.team_id))
            {
                summary
                    .errors
                    .push(format!("{}: unknown team id {}", draft.name, pick.team_id));
                continue;
            }
        }

        let taken = participants
            .iter()
            .any(|p| p.registration_order == draft.registration_order);
        let order = if draft.registration_order > 0 && !taken {
            draft.registration_order
        } else {
            next_registration_order(&participants)
        };

        participants.push(Participant::new(draft.name, order, draft.picks));
        summary.created += 1;
    }

    storage::write_participants(config, &participants)?;
    info!(
        "Bulk import: {} created, {} skipped, {} errors",
        summary.created,
        summary.skipped,
        summary.errors.len()
    );

    Ok(summary)
}

fn next_registration_order(participants: &[Participant]) -> u32 {
    participants
        .iter()
        .map(|p| p.registration_order)
        .max()
        .unwrap_or(0)
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(name: &str, team_id: i64, priority: i64, order: i64) -> BulkRow {
        BulkRow {
            participant_name: Some(name.to_string()),
            team_id: Some(team_id),
            priority: Some(priority),
            registration_order: Some(order),
            ..BulkRow::default()
        }
    }

    #[test]
    fn test_groups_rows_by_name() {
        let rows = vec![
            row("A", 10, 1, 1),
            row("B", 20, 1, 2),
            row("A", 30, 2, 1),
        ];
        let drafts = parse_bulk_rows(&rows);

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].name, "A");
        assert_eq!(drafts[0].picks.len(), 2);
        assert_eq!(drafts[1].name, "B");
        assert_eq!(drafts[1].picks.len(), 1);
    }

    #[test]
    fn test_picks_sorted_by_priority() {
        let rows = vec![row("A", 30, 3, 1), row("A", 10, 1, 1), row("A", 20, 2, 1)];
        let drafts = parse_bulk_rows(&rows);

        let priorities: Vec<u32> = drafts[0].picks.iter().map(|p| p.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3]);
        assert_eq!(drafts[0].picks[0].team_id, 10);
    }

    #[test]
    fn test_skips_incomplete_rows() {
        let rows = vec![
            row("A", 10, 1, 1),
            BulkRow {
                participant_name: None,
                team_id: Some(20),
                priority: Some(2),
                ..BulkRow::default()
            },
            BulkRow {
                participant_name: Some("A".into()),
                team_id: None,
                priority: Some(2),
                ..BulkRow::default()
            },
            BulkRow {
                participant_name: Some("A".into()),
                team_id: Some(-5),
                priority: Some(2),
                ..BulkRow::default()
            },
            BulkRow {
                participant_name: Some("A".into()),
                team_id: Some(20),
                priority: None,
                ..BulkRow::default()
            },
            BulkRow {
                participant_name: Some("   ".into()),
                team_id: Some(20),
                priority: Some(2),
                ..BulkRow::default()
            },
        ];
        let drafts = parse_bulk_rows(&rows);

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].picks.len(), 1);
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut r = row("  Nery  ", 10, 1, 1);
        r.participant_name = Some("  Nery  ".to_string());
        let drafts = parse_bulk_rows(&[r]);
        assert_eq!(drafts[0].name, "Nery");
    }

    #[test]
    fn test_missing_registration_order_defaults_to_zero() {
        let mut r = row("A", 10, 1, 0);
        r.registration_order = None;
        let drafts = parse_bulk_rows(&[r]);
        assert_eq!(drafts[0].registration_order, 0);
    }

    #[test]
    fn test_first_seen_group_order_preserved() {
        let rows = vec![
            row("Zed", 10, 1, 3),
            row("Ana", 20, 1, 1),
            row("Zed", 30, 2, 3),
        ];
        let names: Vec<String> = parse_bulk_rows(&rows).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Zed", "Ana"]);
    }

    #[test]
    fn test_export_import_round_trip() {
        let participants = vec![
            Participant::new(
                "Nery".into(),
                1,
                vec![
                    Pick { team_id: 10, priority: 1 },
                    Pick { team_id: 20, priority: 2 },
                ],
            ),
            Participant::new(
                "Bruno".into(),
                2,
                vec![
                    Pick { team_id: 20, priority: 1 },
                    Pick { team_id: 30, priority: 2 },
                ],
            ),
        ];

        let rows = export_rows(&participants, &HashMap::new());
        assert_eq!(rows.len(), 4);

        let drafts = parse_bulk_rows(&rows);
        assert_eq!(drafts.len(), 2);
        for (draft, original) in drafts.iter().zip(participants.iter()) {
            assert_eq!(draft.name, original.name);
            assert_eq!(draft.registration_order, original.registration_order);
            assert_eq!(draft.picks, original.picks);
        }
    }

    #[test]
    fn test_export_enriches_with_team_columns() {
        let mut team = Team::new(10, "Flamengo".into(), "flamengo".into(), "FLA".into());
        team.points = 20;
        let teams: HashMap<u32, Team> = [(10, team)].into();

        let participants = vec![Participant::new(
            "Nery".into(),
            1,
            vec![Pick { team_id: 10, priority: 1 }],
        )];

        let rows = export_rows(&participants, &teams);
        assert_eq!(rows[0].team_name.as_deref(), Some("Flamengo"));
        assert_eq!(rows[0].short_code.as_deref(), Some("FLA"));
        assert_eq!(rows[0].team_slug.as_deref(), Some("flamengo"));
    }

    #[test]
    fn test_export_unknown_team_leaves_columns_empty() {
        let participants = vec![Participant::new(
            "Nery".into(),
            1,
            vec![Pick { team_id: 99, priority: 1 }],
        )];
        let rows = export_rows(&participants, &HashMap::new());
        assert!(rows[0].team_name.is_none());
        // The durable key still round-trips.
        assert_eq!(rows[0].team_id, Some(99));
    }

    fn full_rows(name: &str, start_team: u32, order: i64) -> Vec<BulkRow> {
        (0..3)
            .map(|i| BulkRow {
                participant_name: Some(name.to_string()),
                team_id: Some((start_team + i) as i64),
                priority: Some(i as i64 + 1),
                registration_order: Some(order),
                ..BulkRow::default()
            })
            .collect()
    }

    #[test]
    fn test_apply_import_creates_and_skips() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = StorageConfig::new(tmp.path().to_path_buf());

        let mut rows = full_rows("Nery", 10, 1);
        rows.extend(full_rows("Bruno", 20, 2));
        let summary = apply_import(&config, &rows, 3).unwrap();
        assert_eq!(summary.created, 2);
        assert_eq!(summary.skipped, 0);

        // Re-importing the same rows skips everything.
        let summary = apply_import(&config, &rows, 3).unwrap();
        assert_eq!(summary.created, 0);
        assert_eq!(summary.skipped, 2);

        let roster = storage::read_participants(&config).unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_apply_import_collects_validation_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = StorageConfig::new(tmp.path().to_path_buf());

        // Two picks where three are required.
        let rows = &full_rows("Short", 10, 1)[..2];
        let summary = apply_import(&config, rows, 3).unwrap();
        assert_eq!(summary.created, 0);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("Short"));
    }

    #[test]
    fn test_apply_import_taken_order_falls_back_to_next() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = StorageConfig::new(tmp.path().to_path_buf());

        apply_import(&config, &full_rows("A", 10, 5), 3).unwrap();
        // Same explicit order; B must get max+1 instead.
        apply_import(&config, &full_rows("B", 20, 5), 3).unwrap();

        let roster = storage::read_participants(&config).unwrap();
        let b = roster.iter().find(|p| p.name == "B").unwrap();
        assert_eq!(b.registration_order, 6);
    }

    #[test]
    fn test_apply_import_rejects_unknown_team_when_standings_known() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = StorageConfig::new(tmp.path().to_path_buf());

        let teams: Vec<Team> = (10..13)
            .map(|i| Team::new(i, format!("T{}", i), format!("t{}", i), "T".into()))
            .collect();
        storage::write_teams(&config, &teams).unwrap();

        let summary = apply_import(&config, &full_rows("A", 90, 1), 3).unwrap();
        assert_eq!(summary.created, 0);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("unknown team id 90"));
    }
}
