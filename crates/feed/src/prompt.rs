use dialoguer::Confirm;
use quantdesk_core::data::error::DataError;
use quantdesk_core::data::port::OverwritePrompt;

/// # Summary
/// 基于 `dialoguer` 的终端确认实现，默认答案为否。
#[derive(Debug, Default, Clone)]
pub struct TerminalPrompt;

impl OverwritePrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool, DataError> {
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| DataError::Prompt(e.to_string()))
    }
}
