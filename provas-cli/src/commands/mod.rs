//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;
use provas_core::{KeywordCatalog, SegmentationStrategy};

pub mod generate_config;
pub mod process;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment exam text files and extract exercise records
    Process(process::ProcessArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Write a configuration file with the default settings
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Check a configuration file
    Validate(validate::ValidateArgs),
}

impl Commands {
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Process(args) => args.execute(),
            Commands::List { subcommand } => {
                print!("{}", subcommand.render());
                Ok(())
            }
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
        }
    }
}

/// List subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ListCommands {
    /// List segmentation strategies
    Strategies,

    /// List available output formats
    Formats,

    /// List built-in subject areas, in tie-break priority order
    Areas,
}

impl ListCommands {
    fn render(self) -> String {
        let mut out = String::new();
        match self {
            ListCommands::Strategies => {
                out.push_str("Available strategies:\n");
                for strategy in SegmentationStrategy::ALL {
                    out.push_str(&format!(
                        "  {:<20} {}\n",
                        strategy.name(),
                        strategy_summary(strategy)
                    ));
                }
            }
            ListCommands::Formats => {
                out.push_str("Available formats:\n");
                out.push_str("  text       One block per exercise record\n");
                out.push_str(
                    "  json       Array of documents with records, discards and statistics\n",
                );
                out.push_str("  markdown   One section per exercise record\n");
            }
            ListCommands::Areas => {
                out.push_str("Built-in subject areas:\n");
                for area in KeywordCatalog::default().area_names() {
                    out.push_str(&format!("  {area}\n"));
                }
            }
        }
        out
    }
}

fn strategy_summary(strategy: SegmentationStrategy) -> &'static str {
    match strategy {
        SegmentationStrategy::QuestionBased => "One chunk per question header (default)",
        SegmentationStrategy::SemanticGroup => "Question chunks merged by subject theme",
        SegmentationStrategy::ContextualOverlap => "Question chunks with neighbour context",
        SegmentationStrategy::AdaptiveSize => "Density-driven sizes that keep option lists whole",
        SegmentationStrategy::Mixed => "Picks one of the above from document signals",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_strategies_names_every_strategy() {
        let listing = ListCommands::Strategies.render();
        for strategy in SegmentationStrategy::ALL {
            assert!(listing.contains(strategy.name()));
        }
    }

    #[test]
    fn test_list_areas_in_priority_order() {
        let listing = ListCommands::Areas.render();
        let math = listing.find("Matemática").unwrap();
        let languages = listing.find("Linguagens").unwrap();
        assert!(math < languages);
    }

    #[test]
    fn test_list_formats() {
        let listing = ListCommands::Formats.render();
        for format in ["text", "json", "markdown"] {
            assert!(listing.contains(format));
        }
    }
}
