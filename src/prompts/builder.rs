use anyhow::Result;
use std::path::Path;

use super::loader::PromptLoader;
use super::templates::{
    CORE_MATCHING_DEFAULT, EMPHASIS_DEFAULT, OUTPUT_FORMAT_DEFAULT, ROLE_DEFAULT, STRICT_DEFAULT,
};
use crate::types::Suspect;

/// Builds the system prompt for each suspect
pub struct PromptBuilder {
    loader: PromptLoader,
}

impl PromptBuilder {
    pub fn new(data_path: impl AsRef<Path>) -> Self {
        Self {
            loader: PromptLoader::new(data_path),
        }
    }

    pub fn loader(&self) -> &PromptLoader {
        &self.loader
    }

    /// Build the system instruction for one suspect.
    ///
    /// `speaker_ids` are all suspects in the game, offered to the model as
    /// valid `speaker` values.
    pub fn build_system_prompt(&self, suspect: &Suspect, speaker_ids: &[String]) -> Result<String> {
        let mut sections = vec![];

        // 1. Response format
        let speakers = if speaker_ids.is_empty() {
            suspect.id.clone()
        } else {
            speaker_ids.join("|")
        };
        sections.push(
            self.loader
                .load_section("output_format", OUTPUT_FORMAT_DEFAULT)?
                .replace("{speakers}", &speakers),
        );

        // 2. Private core statements
        sections.push(self.format_core_statements(suspect));

        // 3. Matching, emphasis and strictness rules
        sections.push(self.loader.load_section("core_matching", CORE_MATCHING_DEFAULT)?);
        sections.push(self.loader.load_section("emphasis", EMPHASIS_DEFAULT)?);
        sections.push(
            self.loader
                .load_section("strict", STRICT_DEFAULT)?
                .replace("{id}", &suspect.id),
        );

        // 4. Role
        sections.push(
            self.loader
                .load_section("role", ROLE_DEFAULT)?
                .replace("{id}", &suspect.id),
        );

        // 5. Case truth, shared by every suspect
        sections.push(self.loader.load_truth_pack()?);

        // 6. Character sheet
        if !suspect.sheet.trim().is_empty() {
            sections.push(format!("## Character Sheet: {}\n\n{}", suspect.name, suspect.sheet.trim()));
        }

        Ok(sections.join("\n\n---\n\n"))
    }

    fn format_core_statements(&self, suspect: &Suspect) -> String {
        let mut block = String::from("## Core Statements (private)\n\n");
        if suspect.core_statements.is_empty() {
            block.push_str("You have no core statements. Never set utterance_type to \"core\".\n");
            return block;
        }
        for (i, statement) in suspect.core_statements.iter().enumerate() {
            block.push_str(&format!("{}. {}\n", i + 1, statement));
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn suspect_a() -> Suspect {
        Suspect::new("A", "A")
            .with_core_statements(["나는 죽이지 않았다.", "D가 죽였다."])
            .with_sheet("직설/단호")
    }

    #[test]
    fn prompt_contains_every_section() {
        let dir = tempfile::tempdir().unwrap();
        let builder = PromptBuilder::new(dir.path());
        let ids = vec!["A".to_string(), "B".to_string()];
        let prompt = builder.build_system_prompt(&suspect_a(), &ids).unwrap();

        assert!(prompt.contains("\"json_list\""));
        assert!(prompt.contains("\"speaker\": \"A|B\""));
        assert!(prompt.contains("1. 나는 죽이지 않았다."));
        assert!(prompt.contains("2. D가 죽였다."));
        assert!(prompt.contains("You play suspect A"));
        assert!(prompt.contains("## Truth Pack"));
        assert!(prompt.contains("## Character Sheet: A\n\n직설/단호"));
        assert!(!prompt.contains("{id}"));
    }

    #[test]
    fn sections_can_be_overridden_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("prompts")).unwrap();
        fs::write(dir.path().join("prompts").join("role.md"), "Only {id} speaks.").unwrap();
        fs::create_dir_all(dir.path().join("case")).unwrap();
        fs::write(dir.path().join("case").join("truth_pack.md"), "범인: B").unwrap();

        let builder = PromptBuilder::new(dir.path());
        let prompt = builder.build_system_prompt(&suspect_a(), &[]).unwrap();
        assert!(prompt.contains("Only A speaks."));
        assert!(prompt.contains("범인: B"));
        assert!(prompt.contains("\"speaker\": \"A\""));
    }

    #[test]
    fn suspect_without_core_statements_is_told_so() {
        let dir = tempfile::tempdir().unwrap();
        let builder = PromptBuilder::new(dir.path());
        let prompt = builder
            .build_system_prompt(&Suspect::new("E", "E"), &[])
            .unwrap();
        assert!(prompt.contains("Never set utterance_type to \"core\""));
        assert!(!prompt.contains("## Character Sheet"));
    }
}
