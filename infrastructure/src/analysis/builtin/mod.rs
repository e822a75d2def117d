//! Built-in analysis tools
//!
//! One line-oriented heuristic per review concern. None of them execute the
//! code under review; they work on the masked lines produced by
//! [`Source`](super::source::Source).

mod best_practices;
mod documentation;
mod efficiency;
mod error_handling;
mod security;
mod semantics;
mod structure;
mod style;
mod syntax;

pub use best_practices::BestPracticesChecker;
pub use documentation::DocumentationChecker;
pub use efficiency::EfficiencyChecker;
pub use error_handling::ErrorHandlingChecker;
pub use security::SecurityScanner;
pub use semantics::SemanticsChecker;
pub use structure::StructureChecker;
pub use style::StyleChecker;
pub use syntax::SyntaxChecker;

use async_trait::async_trait;
use std::sync::Arc;
use tutor_application::ports::analysis_tool::{AnalysisTool, ToolError};
use tutor_domain::agent::findings::Findings;
use tutor_domain::agent::profile::Concern;

/// A synchronous check over source text
pub trait Heuristic: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn check(&self, code: &str) -> Findings;
}

/// Adapts a [`Heuristic`] to the [`AnalysisTool`] port
pub struct BuiltinTool<H>(pub H);

#[async_trait]
impl<H: Heuristic + 'static> AnalysisTool for BuiltinTool<H> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn description(&self) -> &str {
        self.0.description()
    }

    async fn analyze(&self, code: &str) -> Result<Findings, ToolError> {
        Ok(self.0.check(code))
    }
}

/// The built-in tool for a concern
pub fn builtin_tool(concern: Concern) -> Arc<dyn AnalysisTool> {
    match concern {
        Concern::Syntax => Arc::new(BuiltinTool(SyntaxChecker)),
        Concern::Semantics => Arc::new(BuiltinTool(SemanticsChecker)),
        Concern::Style => Arc::new(BuiltinTool(StyleChecker)),
        Concern::Structure => Arc::new(BuiltinTool(StructureChecker)),
        Concern::Security => Arc::new(BuiltinTool(SecurityScanner)),
        Concern::Efficiency => Arc::new(BuiltinTool(EfficiencyChecker)),
        Concern::Documentation => Arc::new(BuiltinTool(DocumentationChecker)),
        Concern::ErrorHandling => Arc::new(BuiltinTool(ErrorHandlingChecker)),
        Concern::BestPractices => Arc::new(BuiltinTool(BestPracticesChecker)),
    }
}
