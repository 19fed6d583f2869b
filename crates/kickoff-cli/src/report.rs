use std::collections::BTreeMap;
use std::fmt;

use kickoff_model::{Roster, ScheduleConfig, SeasonPlan, Venue, Week};
use kickoff_solver::{SolutionStatus, SolveOutcome};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NamedFixture<'a> {
    pub week: Week,
    pub home: &'a str,
    pub away: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CalendarEntry<'a> {
    pub week: Week,
    pub opponent: &'a str,
    pub venue: Venue,
}

/// JSON shape of a solve run
#[derive(Debug, Serialize)]
pub struct ScheduleReport<'a> {
    pub status: SolutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub optimal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<f64>,
    pub weeks: usize,
    pub fixtures: Vec<NamedFixture<'a>>,
    pub calendars: BTreeMap<&'a str, Vec<CalendarEntry<'a>>>,
    pub violations: Vec<String>,
}

impl<'a> ScheduleReport<'a> {
    pub fn new(roster: &'a Roster, plan: &SeasonPlan, config: &ScheduleConfig) -> Self {
        let name = move |id| roster.name(id).unwrap_or("?");
        let message = match &plan.outcome {
            SolveOutcome::Failed(e) => Some(e.to_string()),
            SolveOutcome::Timeout { incumbent: None } => Some("no solution within the time budget".to_string()),
            _ => None,
        };
        let assignment = plan.outcome.assignment();

        let mut report = Self {
            status: plan.outcome.status(),
            message,
            optimal: assignment.is_some_and(|a| a.optimal),
            objective: assignment.map(|a| a.objective_value),
            weeks: plan.parameters.weeks(),
            fixtures: Vec::new(),
            calendars: BTreeMap::new(),
            violations: Vec::new(),
        };

        if let Some(schedule) = &plan.schedule {
            report.fixtures = schedule
                .fixtures()
                .iter()
                .map(|f| NamedFixture {
                    week: f.week,
                    home: name(f.home),
                    away: name(f.away),
                })
                .collect();
            report.calendars = schedule
                .by_team()
                .into_iter()
                .map(|(team, calendar)| {
                    let entries = calendar
                        .into_iter()
                        .map(|tf| CalendarEntry {
                            week: tf.week,
                            opponent: name(tf.opponent),
                            venue: tf.venue,
                        })
                        .collect();
                    (name(team), entries)
                })
                .collect();
            report.violations = schedule
                .audit(&plan.parameters, config)
                .into_iter()
                .map(|v| format!("{}: {}", v.family, v.message))
                .collect();
        }
        report
    }
}

/// Human-readable schedule, one block per week
pub fn render_pretty(roster: &Roster, plan: &SeasonPlan, config: &ScheduleConfig) -> String {
    PrettySchedule { roster, plan, config }.to_string()
}

struct PrettySchedule<'a> {
    roster: &'a Roster,
    plan: &'a SeasonPlan,
    config: &'a ScheduleConfig,
}

impl fmt::Display for PrettySchedule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |id| self.roster.name(id).unwrap_or("?");

        match &self.plan.outcome {
            SolveOutcome::Solved(a) => {
                writeln!(f, "Status: OPTIMAL")?;
                writeln!(f, "Objective: {:.2}", a.objective_value)?;
            }
            SolveOutcome::Infeasible => {
                writeln!(f, "Status: INFEASIBLE")?;
                writeln!(f, "No schedule satisfies all league rules.")?;
            }
            SolveOutcome::Timeout { incumbent: Some(a) } => {
                writeln!(f, "Status: TIMED OUT (best found, not proven optimal)")?;
                writeln!(f, "Objective: {:.2}", a.objective_value)?;
            }
            SolveOutcome::Timeout { incumbent: None } => {
                writeln!(f, "Status: TIMED OUT")?;
                writeln!(f, "No schedule found within the time budget.")?;
            }
            SolveOutcome::Failed(e) => {
                writeln!(f, "Status: ERROR")?;
                writeln!(f, "{}", e)?;
            }
        }

        let Some(schedule) = &self.plan.schedule else {
            return Ok(());
        };

        let mut current = 0;
        for fixture in schedule.fixtures() {
            if fixture.week != current {
                current = fixture.week;
                writeln!(f)?;
                writeln!(f, "Week {}", current)?;
            }
            writeln!(f, "  {:24} vs {}", name(fixture.home), name(fixture.away))?;
        }

        let violations = schedule.audit(&self.plan.parameters, self.config);
        if !violations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Rule violations:")?;
            for v in violations {
                writeln!(f, "  - {}: {}", v.family, v.message)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use kickoff_model::{DistanceMatrix, LeagueInput, plan};
    use kickoff_solver::Solver;

    use super::*;

    fn toy_input() -> LeagueInput {
        let roster = Roster::new(["A", "B", "C", "D"]).unwrap();
        let mut distances = DistanceMatrix::new();
        for i in roster.ids() {
            for j in roster.ids() {
                distances.insert((i, j), if i == j { 0.0 } else { 10.0 });
            }
        }
        let ranks: BTreeMap<_, _> = roster.ids().map(|i| (i, 1)).collect();
        LeagueInput {
            roster,
            distances,
            ranks,
        }
    }

    #[test]
    fn test_json_report_for_solved_plan() {
        let input = toy_input();
        let config = ScheduleConfig::default();
        let plan = plan(&input, &config, &Solver::new()).unwrap();

        let report = ScheduleReport::new(&input.roster, &plan, &config);
        assert_eq!(report.status, SolutionStatus::Optimal);
        assert_eq!(report.fixtures.len(), 12);
        assert_eq!(report.calendars["A"].len(), 6);
        assert!(report.violations.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "Optimal");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_pretty_report_lists_weeks() {
        let input = toy_input();
        let config = ScheduleConfig::default();
        let plan = plan(&input, &config, &Solver::new()).unwrap();

        let text = render_pretty(&input.roster, &plan, &config);
        assert!(text.starts_with("Status: OPTIMAL\nObjective: 1200.00\n"));
        assert!(text.contains("\nWeek 6\n"));
        assert_eq!(text.matches(" vs ").count(), 12);
        assert!(!text.contains("Rule violations"));
    }

    #[test]
    fn test_pretty_report_for_infeasible_plan() {
        let input = toy_input();
        let config = ScheduleConfig {
            weeks: Some(2),
            ..ScheduleConfig::default()
        };
        let plan = plan(&input, &config, &Solver::new()).unwrap();

        let text = render_pretty(&input.roster, &plan, &config);
        assert!(text.starts_with("Status: INFEASIBLE"));
        assert!(!text.contains("Week"));
    }
}
