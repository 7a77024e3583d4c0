//! Agent loop — the LLM ↔ tool-calling main loop.
//!
//! One [`AgentLoop`] is built at startup and shared between requests. Each
//! call to [`AgentLoop::run`] owns a fresh [`Conversation`], so concurrent
//! goals never see each other's messages.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use scenewright_core::config::AgentConfig;
use scenewright_core::utils::truncate_string;
use scenewright_providers::{LlmProvider, LlmRequestConfig};

use crate::conversation::Conversation;
use crate::error::AgentError;
use crate::progress::{Progress, ProgressSink};
use crate::tools::ToolRegistry;
use crate::verification::{Verdict, VerificationPolicy, RETRY_CONCLUSION};

/// Answer reported when the model ends with an empty turn.
const EMPTY_ANSWER: &str = "No final message from LLM.";

/// Per-run limits and request parameters.
#[derive(Clone, Debug)]
pub struct LoopSettings {
    pub model: String,
    pub request: LlmRequestConfig,
    /// Ceiling on model calls per goal.
    pub max_iterations: u32,
    /// Ceiling on corrective re-prompts per goal.
    pub max_verification_retries: u32,
}

impl LoopSettings {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            model: config.model.clone(),
            request: LlmRequestConfig {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
            max_iterations: config.max_iterations,
            max_verification_retries: config.max_verification_retries,
        }
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

/// How a successful run ended.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentOutcome {
    pub answer: String,
    /// Model calls made.
    pub iterations: u32,
    /// Tool calls executed, including ones that produced error records.
    pub tool_calls: usize,
    pub verification_retries: u32,
}

// ─────────────────────────────────────────────
// AgentLoop
// ─────────────────────────────────────────────

pub struct AgentLoop {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    policy: Arc<dyn VerificationPolicy>,
    settings: LoopSettings,
    system_prompt: String,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        policy: Arc<dyn VerificationPolicy>,
        settings: LoopSettings,
        system_prompt: impl Into<String>,
    ) -> Self {
        info!(
            model = %settings.model,
            provider = provider.display_name(),
            tools = tools.len(),
            policy = policy.name(),
            max_iterations = settings.max_iterations,
            "agent loop initialized"
        );
        Self {
            provider,
            tools,
            policy,
            settings,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn settings(&self) -> &LoopSettings {
        &self.settings
    }

    /// Work on `goal` until the model gives a final answer.
    ///
    /// Tool failures are fed back to the model and never end the run. A
    /// failed model call, or running out of iterations, does.
    pub async fn run(&self, goal: &str, progress: &ProgressSink) -> Result<AgentOutcome, AgentError> {
        progress
            .emit(Progress::Status(
                "Agent waking up... Analyzing user prompt.".into(),
            ))
            .await;

        let mut conversation = Conversation::new(&self.system_prompt, goal);
        let tool_defs = self.tools.get_definitions();
        let mut tool_calls = 0usize;
        let mut retries = 0u32;

        for iteration in 1..=self.settings.max_iterations {
            debug!(iteration, messages = conversation.len(), "LLM call");

            let response = match self
                .provider
                .chat(
                    conversation.messages(),
                    Some(&tool_defs),
                    &self.settings.model,
                    &self.settings.request,
                )
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    error!(error = %e, iteration, "model call failed");
                    let hint = if e.is_transient() {
                        " (temporary, running the goal again may help)"
                    } else {
                        ""
                    };
                    progress
                        .emit(Progress::Error(format!("Model call failed: {e}{hint}")))
                        .await;
                    return Err(e.into());
                }
            };

            if response.has_tool_calls() {
                progress
                    .emit(Progress::Llm("has decided to use tools. Executing...".into()))
                    .await;

                let calls = response.tool_calls;
                conversation.push_assistant(response.content, calls.clone())?;

                for call in &calls {
                    let name = call.function.name.as_str();
                    info!(tool = %name, iteration, "executing tool call");
                    progress
                        .emit(Progress::ToolCall {
                            name: name.to_string(),
                            arguments: call.function.arguments.clone(),
                        })
                        .await;

                    let output = match self.tools.dispatch(name, &call.function.arguments).await {
                        Ok(output) => {
                            progress
                                .emit(Progress::ToolResponse {
                                    name: name.to_string(),
                                    output: output.to_string(),
                                })
                                .await;
                            output
                        }
                        Err(e) => {
                            warn!(tool = %name, error = %e, "tool call rejected");
                            progress.emit(Progress::Error(e.to_string())).await;
                            e.to_record()
                        }
                    };

                    debug!(
                        tool = %name,
                        result = %truncate_string(&output.to_string(), 200),
                        "tool result"
                    );
                    conversation.push_tool_result(&call.id, name, output)?;
                    tool_calls += 1;
                }

                progress
                    .emit(Progress::Status(
                        "Sending tool results back to LLM for next step...".into(),
                    ))
                    .await;
                continue;
            }

            let answer = response
                .content
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| EMPTY_ANSWER.to_string());

            let verdict = self.policy.check(goal, conversation.records());
            if verdict != Verdict::NotApplicable {
                progress
                    .emit(Progress::Verification(
                        "MANDATORY VERIFICATION: Checking if scene matches original request..."
                            .into(),
                    ))
                    .await;
            }

            match verdict {
                Verdict::Fail(failure) => {
                    for line in failure.report_lines() {
                        progress.emit(Progress::Verification(line)).await;
                    }
                    // A re-prompt needs another model call to answer it.
                    let calls_left = iteration < self.settings.max_iterations;
                    if calls_left && retries < self.settings.max_verification_retries {
                        retries += 1;
                        info!(retries, "verification failed, re-prompting");
                        progress
                            .emit(Progress::Verification(RETRY_CONCLUSION.into()))
                            .await;
                        conversation.push_assistant(Some(answer), Vec::new())?;
                        conversation.push_user(failure.corrective_message())?;
                        continue;
                    }
                    warn!(retries, calls_left, "verification budget exhausted, accepting answer");
                    progress
                        .emit(Progress::Verification(format!(
                            "VERIFICATION GAVE UP: still failing after {retries} corrective \
                             attempt(s), accepting the answer as is."
                        )))
                        .await;
                }
                Verdict::Pass => {
                    progress
                        .emit(Progress::Verification(
                            "✅ VERIFICATION PASSED: Scene matches request!".into(),
                        ))
                        .await;
                }
                Verdict::Inconclusive | Verdict::NotApplicable => {}
            }

            info!(iterations = iteration, tool_calls, "goal finished");
            progress.emit(Progress::Final(answer.clone())).await;
            return Ok(AgentOutcome {
                answer,
                iterations: iteration,
                tool_calls,
                verification_retries: retries,
            });
        }

        let limit = self.settings.max_iterations;
        error!(limit, "iteration limit reached without a final answer");
        progress
            .emit(Progress::Error(format!(
                "Stopped after {limit} model calls without a final answer."
            )))
            .await;
        Err(AgentError::IterationLimit(limit))
    }

    /// Run `goal` without progress reporting and return only the answer.
    pub async fn process_direct(&self, goal: &str) -> Result<String, AgentError> {
        Ok(self.run(goal, &ProgressSink::none()).await?.answer)
    }
}
