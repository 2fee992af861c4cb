//! Prompt templates for the negotiation flow
//!
//! All templates are pure functions of their inputs: the same agent,
//! selection and history always produce the same payload, which keeps
//! the pipeline testable even though the model's output is not.

use crate::agent::{Agent, Sentiment};
use crate::negotiation::TranscriptEntry;
use crate::policy::PolicySelection;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt framing one agent's persona for a turn
    pub fn negotiation_system(agent: &Agent, sentiment: Sentiment) -> String {
        format!(
            r#"Name: {name}
Role: {role}
Age: {age}
Political stance: {stance}
Main concerns: {concerns}
Current sentiment: {sentiment}"#,
            name = agent.name,
            role = agent.role,
            age = agent.age,
            stance = agent.stance,
            concerns = agent.concerns.join(", "),
            sentiment = sentiment,
        )
    }

    /// User prompt for one negotiation turn
    pub fn negotiation_prompt(
        agent: &Agent,
        sentiment: Sentiment,
        selection: &PolicySelection,
        history: &[(String, String)],
        respond_to: Option<&TranscriptEntry>,
    ) -> String {
        let policies = selection
            .options()
            .iter()
            .map(|p| {
                format!(
                    "- {} (Tier {}, {}) in the area of {}",
                    p.title, p.tier, p.impact, p.area
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut prompt = format!(
            r#"You are {name}, a {role} with a {stance} political stance.
You are {age} years old and your main concerns are: {concerns}.

You are reviewing the following policies:
{policies}

Based on your political stance and concerns, your sentiment towards these policies is: {sentiment}.
"#,
            name = agent.name,
            role = agent.role,
            stance = agent.stance,
            age = agent.age,
            concerns = agent.concerns.join(", "),
            policies = policies,
            sentiment = sentiment,
        );

        if !history.is_empty() {
            prompt.push_str("\nRecent discussion:\n");
            for (speaker, text) in history {
                prompt.push_str(&format!("{speaker}: {text}\n"));
            }
        }

        if let Some(target) = respond_to {
            prompt.push_str(&format!(
                "\nRespond directly to this message from {}:\n\"{}\"\n",
                target.speaker.label(),
                target.text
            ));
        }

        prompt.push_str(
            r#"
Please provide a response that:
1. Expresses your opinion on these policies
2. Reflects your sentiment
3. Mentions at least one of your concerns
4. Is written in first person
5. Is between 2-4 sentences
6. Conveys an appropriate emotion (neutral, anger, compassion, frustration, enthusiasm, or concern)

Format your response as a JSON object with two fields:
{
  "message": "Your response here",
  "emotion": "one of: neutral, anger, compassion, frustration, enthusiasm, concern"
}"#,
        );

        prompt
    }

    /// System prompt for the summary phase
    pub fn summary_system() -> &'static str {
        r#"You are an expert policy analyst reviewing a negotiation between a Policy Advisor and various stakeholders regarding refugee education policies.
Summarize faithfully: report what was actually said, not what should have been said.
Focus on the substantive policy discussions rather than procedural aspects."#
    }

    /// User prompt for the summary phase
    pub fn summary_prompt(transcript: &[(String, String)]) -> String {
        let lines = transcript
            .iter()
            .map(|(speaker, text)| format!("{speaker}: {text}"))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"Below is a transcript of a negotiation between a Policy Advisor and various stakeholders regarding refugee education policies.

Please provide a comprehensive summary of the discussion, highlighting:
1. The key points made by each stakeholder
2. Areas of agreement and disagreement
3. The main concerns raised
4. Any compromises or solutions proposed

Format the summary as a cohesive narrative that captures the essence of the negotiation.

TRANSCRIPT:
{lines}

SUMMARY:
"#,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::policy::{PolicyImpact, PolicyOption};

    fn agent() -> Agent {
        Agent::default_roster().remove(0)
    }

    fn selection() -> PolicySelection {
        let mut selection = PolicySelection::new();
        selection.select(PolicyOption::new(
            "a2",
            "Partial Integration",
            "Allow refugees to attend local schools with some restrictions.",
            PolicyImpact::ModerateInclusion,
            2,
            "Access to Education",
        ));
        selection
    }

    #[test]
    fn test_system_prompt_contains_persona() {
        let prompt = PromptTemplate::negotiation_system(&agent(), Sentiment::Neutral);
        assert!(prompt.contains("Minister Santos"));
        assert!(prompt.contains("Education Minister"));
        assert!(prompt.contains("neoliberal"));
        assert!(prompt.contains("Budget constraints"));
        assert!(prompt.contains("neutral"));
    }

    #[test]
    fn test_negotiation_prompt_serializes_policies() {
        let prompt = PromptTemplate::negotiation_prompt(
            &agent(),
            Sentiment::Positive,
            &selection(),
            &[],
            None,
        );
        assert!(prompt.contains("Partial Integration (Tier 2, Moderate Inclusion)"));
        assert!(prompt.contains("in the area of Access to Education"));
        assert!(prompt.contains("your sentiment towards these policies is: positive"));
        assert!(prompt.contains(r#""emotion""#));
        assert!(!prompt.contains("Recent discussion"));
    }

    #[test]
    fn test_negotiation_prompt_includes_history_in_order() {
        let history = vec![
            ("Policy Advisor".to_string(), "What about costs?".to_string()),
            ("Dr. Chen".to_string(), "Equity comes first.".to_string()),
        ];
        let prompt = PromptTemplate::negotiation_prompt(
            &agent(),
            Sentiment::Neutral,
            &selection(),
            &history,
            None,
        );
        let advisor = prompt.find("Policy Advisor: What about costs?").unwrap();
        let chen = prompt.find("Dr. Chen: Equity comes first.").unwrap();
        assert!(advisor < chen);
    }

    #[test]
    fn test_negotiation_prompt_is_deterministic() {
        let a = agent();
        let s = selection();
        let first = PromptTemplate::negotiation_prompt(&a, Sentiment::Negative, &s, &[], None);
        let second = PromptTemplate::negotiation_prompt(&a, Sentiment::Negative, &s, &[], None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_prompt_contains_transcript() {
        let transcript = vec![
            ("Policy Advisor".to_string(), "Here is my plan.".to_string()),
            ("Ms. Patel".to_string(), "It lacks support.".to_string()),
        ];
        let prompt = PromptTemplate::summary_prompt(&transcript);
        assert!(prompt.contains("TRANSCRIPT:"));
        assert!(prompt.contains("Policy Advisor: Here is my plan."));
        assert!(prompt.contains("Ms. Patel: It lacks support."));
        assert!(prompt.ends_with("SUMMARY:\n"));
    }
}
