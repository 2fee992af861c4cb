//! Console formatting and progress reporting

use agora_application::NegotiationProgress;
use agora_domain::{
    Agent, AgentStance, NegotiationState, NegotiationSummary, Speaker, equity_score,
};
use colored::{ColoredString, Colorize};

/// Color an agent name by stance so the factions stay recognizable.
pub fn stance_colored(name: &str, stance: AgentStance) -> ColoredString {
    match stance {
        AgentStance::Neoliberal => name.blue(),
        AgentStance::Moderate => name.yellow(),
        AgentStance::Progressive => name.green(),
        AgentStance::Humanitarian => name.magenta(),
    }
}

/// Console progress reporter for a negotiation run
pub struct ConsoleProgress;

impl NegotiationProgress for ConsoleProgress {
    fn on_round_start(&self, round: u32, total_rounds: u32) {
        println!();
        println!("{}", format!("--- Round {round} of {total_rounds} ---").bold());
    }

    fn on_turn_start(&self, agent: &Agent) {
        println!(
            "  {} is considering the proposal...",
            stance_colored(&agent.name, agent.stance)
        );
    }

    fn on_turn_complete(&self, agent: &Agent, success: bool) {
        if success {
            println!("  {} {} responded", "+".green(), agent.name);
        } else {
            println!("  {} {} did not respond", "x".red(), agent.name);
        }
    }

    fn on_round_complete(&self, _round: u32) {}

    fn on_summary_start(&self) {
        println!();
        println!("{}", "Generating summary...".bold());
    }

    fn on_summary_complete(&self, success: bool) {
        if !success {
            println!("  {} summary generation failed", "x".red());
        }
    }
}

/// Render the full transcript with stance colors and emotion tags.
pub fn format_transcript(state: &NegotiationState, roster: &[Agent]) -> String {
    let mut out = String::new();
    let mut current_round = 0;

    for entry in state.transcript().entries() {
        if entry.round != current_round {
            current_round = entry.round;
            out.push_str(&format!("\n{}\n", format!("=== Round {current_round} ===").bold()));
        }

        let name = match &entry.speaker {
            Speaker::User => "You".cyan(),
            Speaker::Agent(id) => match roster.iter().find(|a| &a.id == id) {
                Some(agent) => stance_colored(&agent.name, agent.stance),
                None => id.as_str().normal(),
            },
        };

        out.push_str(&format!(
            "{} {}: {}\n",
            name,
            format!("({})", entry.emotion).dimmed(),
            entry.text
        ));
    }

    out
}

/// Render the final summary block.
pub fn format_summary(summary: &NegotiationSummary, state: &NegotiationState) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n\n", "=== Negotiation Summary ===".bold()));
    out.push_str(&format!("{}\n", summary.narrative));
    out.push_str(&format!(
        "\n{} {} rounds, {} participants, equity score {:.1}\n",
        "Stats:".dimmed(),
        summary.rounds,
        summary.participants.len(),
        equity_score(state.selection())
    ));
    out
}
