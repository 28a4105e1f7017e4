//! Output formatting module

use anyhow::Result;
use provas_core::{ExtractionOutput, RawDocument};

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format the extraction result of one document
    fn format_document(&mut self, document: &RawDocument, output: &ExtractionOutput) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

#[cfg(test)]
pub(crate) mod fixtures {
    use provas_core::{ExamProcessor, ExtractionOutput, RawDocument};

    pub const EXAM: &str = "QUESTÃO 7\n\
Observe o gráfico que relaciona a produção de soja e a área plantada no país.\n\
Assinale a alternativa correta.\n\
A) A produção cresceu mais que a área\n\
B) A área cresceu mais que a produção\n\
C) ×××× |||| 9999\n\
D) A produção caiu durante todo o período\n\
E) A área plantada permaneceu constante\n\
Gabarito: A\n";

    pub fn processed() -> (RawDocument, ExtractionOutput) {
        let document = RawDocument::new(EXAM, "2021", "enem_2021.txt");
        let output = ExamProcessor::with_defaults().unwrap().process(&document);
        (document, output)
    }
}
