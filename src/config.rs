use std::path::PathBuf;

/// Runtime configuration passed explicitly to the write path and the CLI.
/// Nothing in the analytics core reads ambient state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub default_player_id: String,
    pub allowed_body_parts: Vec<String>,
}

impl AppConfig {
    pub fn new(data_file: PathBuf) -> Self {
        Self {
            data_file,
            ..Self::default()
        }
    }

    pub fn is_allowed_body_part(&self, name: &str) -> bool {
        self.allowed_body_parts.iter().any(|part| part == name)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("pain_events.csv"),
            default_player_id: "player_001".to_string(),
            allowed_body_parts: [
                "Head / Neck",
                "Left Shoulder",
                "Right Shoulder",
                "Chest",
                "Abdomen",
                "Upper Back",
                "Lower Back",
                "Left Hip",
                "Right Hip",
                "Left Hamstring",
                "Right Hamstring",
                "Left Knee",
                "Right Knee",
                "Left Ankle",
                "Right Ankle",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}
