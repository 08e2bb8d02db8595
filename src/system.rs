use std::env;

/// Facts about the user's machine that go into the system prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentFacts {
    pub os_name: String,
    pub os_arch: String,
    pub os_version: String,
    pub home_dir: String,
    pub terminal_program: Option<String>,
    pub shell: Option<String>,
    pub editor: Option<String>,
    pub visual_editor: Option<String>,
}

impl EnvironmentFacts {
    /// Detects the current system environment.
    pub fn detect() -> Self {
        let os_info = os_info::get();
        let home_dir = dirs::home_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        Self::from_lookup(
            env::consts::OS,
            env::consts::ARCH,
            os_info.version().to_string(),
            home_dir,
            |key| env::var(key).ok(),
        )
    }

    /// Builds the facts from explicit platform values and an environment lookup.
    /// Empty variables count as unset.
    pub fn from_lookup(
        platform: &str,
        arch: &str,
        os_version: String,
        home_dir: String,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            os_name: display_platform(platform).to_string(),
            os_arch: arch.to_string(),
            os_version,
            home_dir,
            terminal_program: var("TERM_PROGRAM"),
            shell: var("SHELL"),
            editor: var("EDITOR"),
            visual_editor: var("GUI_EDITOR").or_else(|| var("VISUAL")),
        }
    }
}

fn display_platform(platform: &str) -> &str {
    match platform {
        "windows" => "Windows",
        "macos" => "macOS",
        other => other,
    }
}
