//! Auto-assignment planning. Pure functions over rosters; nothing here
//! touches the store.

use std::cmp::Reverse;

use super::models::{PlayerAssignment, TeamAssignment};
use crate::profile::Tier;
use crate::team::{Position, Squad, TeamRoster};

/// Cap on each of ARMOR, HELI and JET for a roster of `roster_len` members
pub fn max_specialized_roles(roster_len: usize) -> usize {
    (roster_len / 8).max(1)
}

/// Plan positions and squads for one team.
///
/// Members are walked in tier order, highest first, keeping roster order
/// among equal tiers. Each keeps their declared position unless it is a
/// capped vehicle role that is already full, in which case they drop to
/// INFANTRY. Squads rotate ALPHA..HOTEL per team. Members without a profile
/// are skipped and take no squad slot, but still count toward the cap size.
pub fn plan_team(roster: &TeamRoster) -> TeamAssignment {
    let mut ordered: Vec<_> = roster.entries.iter().collect();
    ordered.sort_by_key(|entry| {
        Reverse(Tier::rank_or_default(
            entry.profile.as_ref().and_then(|p| p.tier),
        ))
    });

    let max_specialized = max_specialized_roles(ordered.len());
    let mut counts = [0usize; Position::ALL.len()];
    let mut player_assignments = Vec::with_capacity(ordered.len());

    for entry in ordered {
        let Some(profile) = &entry.profile else {
            continue;
        };

        let mut position = entry.member.position.unwrap_or_default();
        if position.is_specialized() && counts[position.index()] >= max_specialized {
            position = Position::Infantry;
        }

        let squad = Squad::for_slot(player_assignments.len());
        counts[position.index()] += 1;

        player_assignments.push(PlayerAssignment {
            player_id: profile.id,
            position,
            squad_assignment: Some(squad),
        });
    }

    TeamAssignment {
        team_id: roster.team.id,
        player_assignments,
    }
}

/// Plan every team independently, in the order given
pub fn plan_auto_assignment(rosters: &[TeamRoster]) -> Vec<TeamAssignment> {
    rosters.iter().map(plan_team).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::{MemberRole, RosterEntry, RosterProfile, Team, TeamMember};
    use uuid::Uuid;

    fn roster(members: &[(Option<Tier>, Option<Position>, bool)]) -> TeamRoster {
        let team_id = Uuid::new_v4();
        let entries = members
            .iter()
            .enumerate()
            .map(|(i, &(tier, position, has_profile))| {
                let player_id = Uuid::new_v4();
                RosterEntry {
                    member: TeamMember {
                        id: Uuid::new_v4(),
                        team_id,
                        player_id,
                        role: MemberRole::Member,
                        position,
                        squad_assignment: None,
                        is_active: true,
                    },
                    profile: has_profile.then(|| RosterProfile {
                        id: player_id,
                        username: format!("player{i}"),
                        tier,
                    }),
                }
            })
            .collect::<Vec<_>>();
        TeamRoster {
            team: Team {
                id: team_id,
                name: "Vanguard".to_string(),
                captain_id: None,
                member_count: entries.len() as u32,
                max_members: 64,
            },
            entries,
        }
    }

    #[test]
    fn test_max_specialized_roles() {
        assert_eq!(max_specialized_roles(0), 1);
        assert_eq!(max_specialized_roles(7), 1);
        assert_eq!(max_specialized_roles(9), 1);
        assert_eq!(max_specialized_roles(16), 2);
        assert_eq!(max_specialized_roles(64), 8);
    }

    #[test]
    fn test_nine_armor_bronze_players() {
        let roster = roster(&[(Some(Tier::Bronze), Some(Position::Armor), true); 9]);
        let plan = plan_team(&roster);

        let positions: Vec<_> = plan.player_assignments.iter().map(|a| a.position).collect();
        assert_eq!(positions[0], Position::Armor);
        assert!(positions[1..].iter().all(|&p| p == Position::Infantry));

        let squads: Vec<_> = plan
            .player_assignments
            .iter()
            .map(|a| a.squad_assignment.unwrap())
            .collect();
        assert_eq!(&squads[..8], &Squad::ROTATION);
        assert_eq!(squads[8], Squad::Alpha);
    }

    #[test]
    fn test_higher_tiers_claim_vehicle_roles_first() {
        let roster = roster(&[
            (Some(Tier::Bronze), Some(Position::Jet), true),
            (Some(Tier::Diamond), Some(Position::Jet), true),
            (None, Some(Position::Jet), true),
        ]);
        let plan = plan_team(&roster);

        let diamond = roster.entries[1].member.player_id;
        assert_eq!(plan.player_assignments[0].player_id, diamond);
        assert_eq!(plan.player_assignments[0].position, Position::Jet);
        assert_eq!(plan.player_assignments[1].position, Position::Infantry);
        assert_eq!(plan.player_assignments[2].position, Position::Infantry);
        // Equal tiers keep roster order
        assert_eq!(
            plan.player_assignments[1].player_id,
            roster.entries[0].member.player_id
        );
    }

    #[test]
    fn test_support_and_infantry_are_uncapped() {
        let roster = roster(&[
            (None, Some(Position::Support), true),
            (None, Some(Position::Support), true),
            (None, None, true),
        ]);
        let plan = plan_team(&roster);
        let positions: Vec<_> = plan.player_assignments.iter().map(|a| a.position).collect();
        assert_eq!(
            positions,
            vec![Position::Support, Position::Support, Position::Infantry]
        );
    }

    #[test]
    fn test_members_without_profile_take_no_squad_slot() {
        let roster = roster(&[
            (Some(Tier::Gold), None, true),
            (Some(Tier::Gold), None, false),
            (Some(Tier::Gold), None, true),
        ]);
        let plan = plan_team(&roster);
        assert_eq!(plan.player_assignments.len(), 2);
        assert_eq!(plan.player_assignments[1].squad_assignment, Some(Squad::Bravo));
    }

    #[test]
    fn test_empty_roster_still_planned() {
        let plans = plan_auto_assignment(&[roster(&[])]);
        assert_eq!(plans.len(), 1);
        assert!(plans[0].player_assignments.is_empty());
    }
}
