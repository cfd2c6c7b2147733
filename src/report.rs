use crate::agents::AgentStats;
use crate::driver::{ExperimentSummary, LinearRewardResults, UcbResult};

use std::io::{self, Write};

const BANNER: &str = "-------------------------------------";
const BANNER_END: &str = "---------------------------------------";
const BLOCK_RULE: &str =
    "----------------------------------------------------------------------------------";
const TABLE_RULE: &str = "----------------------------------------------------------------------------------------------------";

fn format_values(values: &[f64]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            if index == 0 {
                format!("{value:.2} ")
            } else {
                format!("{value:>5.2} ")
            }
        })
        .collect()
}

fn percent(rate: f64) -> f64 {
    rate * 100.0
}

pub fn write_agent_stats<W: Write + ?Sized>(out: &mut W, stats: &AgentStats) -> io::Result<()> {
    writeln!(out, "{BANNER}{}{BANNER_END}", stats.label)?;
    writeln!(
        out,
        "Optimal Action Chosen:\t{:>5}/{}",
        stats.optimal_selections, stats.rounds
    )?;
    writeln!(out, "Percentage:\t{:>20.2}%", percent(stats.optimal_rate))?;
    writeln!(
        out,
        "Success Rate:\t{:>13}/{}",
        stats.cumulative_reward, stats.rounds
    )?;
    writeln!(out, "Percentage:\t{:>20.2}%", percent(stats.reward_rate))?;
    writeln!(out)?;
    writeln!(out, "{}: \t{}", stats.policy_title, format_values(&stats.policy))?;
    writeln!(
        out,
        "Arm Success Probs: \t\t{}",
        format_values(&stats.arm_probabilities)
    )?;
    writeln!(out, "{BLOCK_RULE}\n\n")
}

pub fn write_ucb_table<W: Write + ?Sized>(out: &mut W, results: &[UcbResult]) -> io::Result<()> {
    write!(out, "\n\nUCB Statistics\n\n")?;
    writeln!(out, "{:>10}{:>12}{:>10}", "conf", "% Optimal", "% Reward")?;
    writeln!(out, "{TABLE_RULE}")?;
    for result in results {
        writeln!(
            out,
            "{:>10.2}{:>10.2}%{:>10.2}%",
            result.confidence,
            percent(result.rates.optimal),
            percent(result.rates.reward)
        )?;
    }
    writeln!(out, "{TABLE_RULE}")
}

pub fn write_linear_reward_tables<W: Write + ?Sized>(
    out: &mut W,
    results: &LinearRewardResults,
) -> io::Result<()> {
    write!(out, "L(r-p) Statistics\n\n")?;
    writeln!(
        out,
        "{:>10}{:>10}{:>12}{:>10}",
        "alpha", "beta", "% Optimal", "% Reward"
    )?;
    writeln!(out, "{TABLE_RULE}")?;
    for result in &results.penalty {
        writeln!(
            out,
            "{:>10.2}{:>10.2}{:>10.2}%{:>10.2}%",
            result.alpha,
            result.beta,
            percent(result.rates.optimal),
            percent(result.rates.reward)
        )?;
    }
    writeln!(out, "{TABLE_RULE}")?;

    write!(out, "\n\nL(r-i) Statistics\n\n")?;
    writeln!(out, "{:>10}{:>12}{:>10}", "alpha", "% Optimal", "% Reward")?;
    writeln!(out, "{TABLE_RULE}")?;
    for result in &results.inaction {
        writeln!(
            out,
            "{:>10.2}{:>10.2}%{:>10.2}%",
            result.alpha,
            percent(result.rates.optimal),
            percent(result.rates.reward)
        )?;
    }
    writeln!(out, "{TABLE_RULE}")
}

pub fn write_summary<W: Write>(out: W, summary: &ExperimentSummary) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(out, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{LinearRewardInactionResult, LinearRewardPenaltyResult, Rates};

    fn rates(optimal: f64, reward: f64) -> Rates {
        Rates { optimal, reward }
    }

    #[test]
    fn values() {
        assert_eq!(format_values(&[0.1, 0.25, 1.0]), "0.10  0.25  1.00 ");
        assert_eq!(format_values(&[]), "");
    }

    #[test]
    fn agent_stats() {
        let stats = AgentStats {
            label: "UCB".to_string(),
            optimal_selections: 75,
            cumulative_reward: 60,
            rounds: 100,
            optimal_rate: 0.75,
            reward_rate: 0.6,
            policy_title: "Estimated Arm Probs",
            policy: vec![0.5, 0.8],
            arm_probabilities: vec![0.3, 0.7],
        };

        let mut out = Vec::new();
        write_agent_stats(&mut out, &stats).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "-------------------------------------UCB---------------------------------------"
        );
        assert_eq!(lines[1], "Optimal Action Chosen:\t   75/100");
        assert_eq!(lines[2], format!("Percentage:\t{:>20}%", "75.00"));
        assert_eq!(lines[3], "Success Rate:\t           60/100");
        assert_eq!(lines[4], format!("Percentage:\t{:>20}%", "60.00"));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Estimated Arm Probs: \t0.50  0.80 ");
        assert_eq!(lines[7], "Arm Success Probs: \t\t0.30  0.70 ");
        assert_eq!(lines[8], BLOCK_RULE);
        assert!(text.ends_with("\n\n\n"));
    }

    #[test]
    fn ucb_table() {
        let mut out = Vec::new();
        write_ucb_table(
            &mut out,
            &[UcbResult {
                confidence: 2.0,
                rates: rates(0.5, 0.8125),
            }],
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[2], "UCB Statistics");
        assert_eq!(lines[4], "      conf   % Optimal  % Reward");
        assert_eq!(lines[5], TABLE_RULE);
        assert_eq!(lines[6], "      2.00     50.00%     81.25%");
        assert_eq!(lines[7], TABLE_RULE);
    }

    #[test]
    fn linear_reward_tables() {
        let results = LinearRewardResults {
            penalty: vec![LinearRewardPenaltyResult {
                alpha: 0.1,
                beta: 0.05,
                rates: rates(0.25, 0.5),
            }],
            inaction: vec![LinearRewardInactionResult {
                alpha: 0.1,
                rates: rates(1.0, 0.9),
            }],
        };
        let mut out = Vec::new();
        write_linear_reward_tables(&mut out, &results).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "L(r-p) Statistics");
        assert_eq!(lines[2], "     alpha      beta   % Optimal  % Reward");
        assert_eq!(lines[4], "      0.10      0.05     25.00%     50.00%");
        assert!(lines.contains(&"L(r-i) Statistics"));
        assert!(lines.contains(&"     alpha   % Optimal  % Reward"));
        assert!(lines.contains(&"      0.10    100.00%     90.00%"));
    }
}
