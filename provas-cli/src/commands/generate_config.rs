//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        std::fs::write(&self.output, template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Adjust chunk sizes and keyword sets for your exams");
        println!("2. Validate your configuration:");
        println!("   provas validate -c {}", self.output.display());
        println!("3. Use it for processing:");
        println!("   provas process -i prova.txt -c {}", self.output.display());

        Ok(())
    }
}

/// Template whose active settings equal the built-in defaults
fn template() -> &'static str {
    r#"# provas configuration

[segmentation]
# question_based, semantic_group, contextual_overlap, adaptive_size or mixed
strategy = "question_based"

# Chunk bounds, in bytes
min_chunk_size = 100
max_chunk_size = 2000

# Context windows kept around each chunk
overlap_window_size = 200
overlap_words = 20

# Worker threads (0 = all cores)
threads = 0

# Area given to records whose text matches no keyword set
default_subject_area = "Geral"

# Signals used by the mixed strategy, tried in this order
[segmentation.mixed]
# Question headers per 1000 bytes
header_density = 0.3
# Fraction of chunks sharing the dominant theme
thematic_coherence = 0.6
# Fraction of chunks referring to an earlier text
context_dependency = 0.3

[output]
# text, json or markdown
format = "text"
pretty_json = true
include_chunks = false

# Extra keyword sets appended to the built-in catalog.
# A set named like a built-in area extends that area.
#
# [[keywords.subject_areas]]
# name = "Redação"
# keywords = ["dissertação", "argumentação", "proposta de intervenção"]
#
# [[keywords.topics]]
# name = "Ecologia"
# keywords = ["bioma", "cadeia alimentar"]
"#
}
