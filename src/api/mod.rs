pub mod anthropic;

use crate::error::CodeswitchError;

/// Trait for model providers that turn a conversion prompt into reply text.
pub trait Translator {
    fn complete(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, CodeswitchError>> + Send;
}
