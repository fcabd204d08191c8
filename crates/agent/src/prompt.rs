//! System instruction construction.
//!
//! The instruction is the first (user) turn of every conversation. It
//! explains the plan → action → observe protocol, renders the tool list
//! from the registry, and pins the JSON reply format. An override from
//! config replaces the preamble and rules; the tool list and reply
//! format are always appended since the loop depends on them.

use stepwise_core::tool::ToolDefinition;

const PREAMBLE: &str = "\
You are a helpful AI Assistant who is specialized in resolving user queries.
You work in plan, action, observe mode.

For the given user query and available tools, plan the step by step execution.
Based on the planning, select the relevant tool from the available tools, then
perform an action to call the tool. Wait for the observation, and based on the
observation from the tool call, resolve the user query.";

const RULES: &str = "\
Rules:
- Follow the Output JSON Format.
- Always perform one step at a time and wait for the next input.
- Carefully analyze the user query.
- When building web applications, use create_folder, run_command (like `npm create vite@latest`, `npm install`, `npm run dev`) and create_file to scaffold projects.
- After building and starting a dev server, use launch_browser to open it (usually at localhost).";

const OUTPUT_FORMAT: &str = r#"Output JSON Format:
{
    "step": "plan | action | output",
    "content": "string",
    "function": "The name of the function if the step is action",
    "input": "The input parameter for the function"
}

Tool results come back to you as {"step": "observe", "output": "..."}."#;

/// Build the system instruction for a set of tools.
pub fn system_instruction(tools: &[ToolDefinition], override_text: Option<&str>) -> String {
    let mut out = String::new();

    match override_text.map(str::trim).filter(|s| !s.is_empty()) {
        Some(custom) => out.push_str(custom),
        None => {
            out.push_str(PREAMBLE);
            out.push_str("\n\n");
            out.push_str(RULES);
        }
    }

    out.push_str("\n\nAvailable Tools:\n");
    for tool in tools {
        out.push_str(&format!(
            "- {}: {} Input: {}.\n",
            tool.name, tool.description, tool.input
        ));
    }

    out.push('\n');
    out.push_str(OUTPUT_FORMAT);
    out
}
