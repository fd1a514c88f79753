//! Output formatting utilities for CLI.

use std::fmt::Write;

use obelisk::gp::{Gene, GenerationReport, Genome};
use obelisk::rollout::ActionEstimate;
use obelisk::{Action, SearchResult};

/// One ranked agent: rank, script, loss and gene counts.
pub(super) fn format_agent(rank: usize, genome: &Genome, loss: f64) -> String {
    let mut line = format!("{rank:03}: {genome} | Loss: {loss:>5.2} |");
    for (gene, count) in Gene::ALL.iter().zip(genome.histogram()) {
        let _ = write!(line, " {}: {count:>2}", gene.symbol());
    }
    line
}

/// Header and ranked agents of a generation report.
pub(super) fn format_report(report: &GenerationReport) -> String {
    let mut output = format!("=== Round {} ===\n", report.generation);
    for (rank, (genome, loss)) in report.top.iter().enumerate() {
        output.push_str(&format_agent(rank, genome, *loss));
        output.push('\n');
    }
    output
}

/// Actions joined by `->`.
pub(super) fn format_plan(plan: &[Action]) -> String {
    plan.iter().map(ToString::to_string).collect::<Vec<_>>().join("->")
}

/// Depth header, leaf scores and per-player plans of a search.
pub(super) fn format_search(depth: usize, result: &SearchResult) -> String {
    let scores = result
        .scores
        .iter()
        .map(|s| format!("{s:.2}"))
        .collect::<Vec<_>>()
        .join(" ");
    let plans = result
        .plan
        .iter()
        .map(|p| format_plan(p))
        .collect::<Vec<_>>()
        .join(" ");

    format!("=== Depth {depth} ===\nLoss: {scores}\nActions: {plans}\n")
}

/// Rollout table sorted by mean loss, best first.
pub(super) fn format_rollout(player: usize, best: Action, table: &[ActionEstimate]) -> String {
    let mut rows = table.to_vec();
    rows.sort_by(|a, b| a.estimate.mean.total_cmp(&b.estimate.mean));

    let mut output = format!("== Player {player} ==\n");
    for row in &rows {
        let action = row.action.to_string();
        let _ = writeln!(output, "{action:>3}: {}", row.estimate);
    }
    let _ = writeln!(output, "-> {best}");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use obelisk::rollout::Estimate;
    use obelisk::Produce;

    #[test]
    fn test_format_agent() {
        let genome = Genome::new(vec![Gene::W, Gene::O, Gene::O, Gene::A]);
        assert_eq!(
            format_agent(7, &genome, 2.5),
            "007: W->O->O->A | Loss:  2.50 | W:  1 S:  0 B:  0 O:  2 A:  1 D:  0 N:  0"
        );
    }

    #[test]
    fn test_format_search() {
        let result = SearchResult {
            scores: vec![0.0, -1.25],
            plan: vec![
                vec![Action::Produce(Produce::Obelisk), Action::Attack(1)],
                vec![Action::Defend, Action::Idle],
            ],
            nodes: 4,
            complete: true,
        };
        assert_eq!(
            format_search(2, &result),
            "=== Depth 2 ===\nLoss: 0.00 -1.25\nActions: O->1 D->N\n"
        );
    }

    #[test]
    fn test_format_rollout_sorted() {
        let table = [
            ActionEstimate {
                action: Action::Produce(Produce::Walls),
                estimate: Estimate {
                    mean: 2.0,
                    variance: 0.0,
                    samples: 4,
                },
            },
            ActionEstimate {
                action: Action::Produce(Produce::Obelisk),
                estimate: Estimate {
                    mean: 1.0,
                    variance: 0.0,
                    samples: 4,
                },
            },
        ];
        let text = format_rollout(0, Action::Produce(Produce::Obelisk), &table);
        assert_eq!(
            text,
            "== Player 0 ==\n  O: 1.000±0.000\n  W: 2.000±0.000\n-> O\n"
        );
    }
}
