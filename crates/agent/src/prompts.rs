//! System prompt templates for the planning and integration agents.
//!
//! Absent context values (first iteration) render as the literal `None`.

use webscout_core::tool::ToolOutputs;

const ABSENT: &str = "None";

/// Render the planning agent's system instruction.
pub fn planning_prompt(
    outputs: Option<&ToolOutputs>,
    plan: Option<&str>,
    feedback: Option<&str>,
    tool_specs: &str,
) -> String {
    let outputs = outputs.map(ToolOutputs::render);
    format!(
        "As an AI Planning Agent collaborating with an Integration Agent, your task is to devise a strategy for addressing queries using specialized tools. Follow this two-step methodology:\n\
         1. **Contemplate**: Thoroughly analyze the problem to develop a detailed plan of action.\n\
         2. **Action**: Specify the inputs and tools necessary to execute your plan effectively.\n\
         Ensure your plan incorporates any available feedback.\n\n\
         Here are the outputs from the tools you have used:\n{outputs}\n\n\
         Here is your previous plan:\n{plan}\n\n\
         Feedback received:\n{feedback}\n\n\
         Tool specifications:\n{tool_specs}\n\
         Continue refining your plan until you have sufficient information to answer the query comprehensively.",
        outputs = outputs.as_deref().unwrap_or(ABSENT),
        plan = plan.unwrap_or(ABSENT),
        feedback = feedback.unwrap_or(ABSENT),
    )
}

/// Render the integration agent's system instruction.
pub fn integration_prompt(outputs: &ToolOutputs, plan: &str) -> String {
    format!(
        "As an AI Integration Agent working with a Planning Agent, your role is to synthesize the outputs from the Planning Agent into a coherent response. Here's how to proceed:\n\
         1. **Evaluate Information**: Consider the plan, tool outputs, and the original query.\n\
         2. **Provide Feedback**: If the information is incomplete, give feedback to the Planning Agent to refine the plan.\n\
         3. **Deliver Response**: If the information is sufficient, craft a comprehensive response to the query, citing sources appropriately.\n\n\
         Tool outputs are listed per source: each block starts with the URL of the source followed by the content from that URL. Ensure to use these sources for citations.\n\n\
         Here are the tool outputs:\n{outputs}\n\n\
         Here is the plan from the Planning Agent:\n{plan}\n",
        outputs = outputs.render(),
    )
}
