//! The agent loop that drives one todo request to completion.
//!
//! The model follows a **Plan → Action → Observation → Output** protocol:
//!
//! 1. **Seed** a session with the system prompt and the user's query
//! 2. **Send** the whole transcript to the model
//! 3. **Decode** the reply: a `plan` loops back, an `action` runs a tool
//!    and feeds its result back as an `observation`
//! 4. **Return** the text of the first `output` message
//!
//! The loop stops early on a protocol violation, an unknown tool, a
//! provider failure, cancellation, or when the cycle limit is reached.

pub mod loop_runner;
pub mod prompt;

#[cfg(test)]
mod test_helpers;

pub use loop_runner::{AgentLoop, AgentRun, AgentState, DEFAULT_MAX_CYCLES};
pub use prompt::system_prompt;
