//! Prompt templates for the orchestrator

use crate::agent::profile::AgentName;

/// Templates for the orchestrator's plan lifecycle
pub struct OrchestratorPromptTemplate;

impl OrchestratorPromptTemplate {
    /// Prompt asking for a short, ordered, human-readable analysis plan
    pub fn draft_plan(roster: &[AgentName], foundational: &[AgentName], code: &str) -> String {
        let mut prompt = format!(
            r#"You are an assistant coordinating a code analysis process. The available agents are:
{}.

Based on the code below, create an analysis plan. Indicate the order in which agents should run with a very short explanation of what each agent does.
Keep it very simple, only a few lines. Do not explain an agent twice; explanations belong inside the plan only.
"#,
            Self::join_names(roster)
        );

        if !foundational.is_empty() {
            prompt.push_str(&format!(
                "Always schedule {} first, in that order, since they are foundational.\n",
                Self::join_names(foundational)
            ));
        }

        prompt.push_str(&format!(
            r#"
Code:
{}

Example:
### Analysis Plan

1. **SyntaxAgent**: Checks for syntax errors and ensures the code is syntactically correct.
2. **SemanticsAgent**: Evaluates the logical structure and meaning of the code."#,
            code
        ));

        prompt
    }

    /// Prompt asking for only the agent names implied by a plan, as JSON
    pub fn parse_plan(plan_text: &str, roster: &[AgentName]) -> String {
        format!(
            r#"Extract the agents to run from the following analysis plan, in the order the plan runs them.

Plan:
{}

Valid agent names: {}

Answer with ONLY a JSON array of agent name strings and nothing else.
Example:
["SyntaxAgent", "SemanticsAgent"]"#,
            plan_text,
            Self::join_names(roster)
        )
    }

    /// Prompt asking to revise a plan given user feedback
    pub fn adjust_plan(prior_plan: &str, feedback: &str, roster: &[AgentName]) -> String {
        format!(
            r#"The user has requested adjustments to the following code analysis plan:
{}

User feedback: {}

The available agents are: {}.
Provide an updated analysis plan based on the user's instructions. Clearly list the agents to be run and their order, with a very short explanation for each."#,
            prior_plan,
            feedback,
            Self::join_names(roster)
        )
    }

    /// Prompt classifying free-text user input into run / adjust / exit
    pub fn decide_next_action(plan: &[AgentName], last_feedback: &str, user_input: &str) -> String {
        format!(
            r#"You are an assistant managing a workflow for analyzing code.
The current plan is: {}

The last feedback was:
{}

The user has input the following: "{}".

Based on this input, determine the next step. Choose one of the following actions:
- 'run' to execute the plan.
- 'adjust' to adjust the plan.
- 'exit' to end the workflow.

Return only the action as a single word: 'run', 'adjust', or 'exit'."#,
            if plan.is_empty() {
                "(empty)".to_string()
            } else {
                Self::join_names(plan)
            },
            if last_feedback.is_empty() {
                "(none)"
            } else {
                last_feedback
            },
            user_input
        )
    }

    fn join_names(names: &[AgentName]) -> String {
        names
            .iter()
            .map(|n| n.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
