use clap::Parser;

const FAQ: &str = concat!(
    "How to config API Key?\n",
    "  1. Create an account on https://openrouter.ai\n",
    "  2. Create a new Key from https://openrouter.ai/settings/keys\n",
    "  3. Add the provided key in your .bashrc/.zshrc file using the\n",
    "     following environment variable: MAGICCOMMAND_OPENROUTER_KEY\n",
    "\n",
    "FAQ:\n",
    "  Q: How to use \"?\" as a command?\n",
    "  A: Add this line to your .bashrc/.zshrc file:\n",
    "     alias \\?='magiccommand'\n",
    "\n",
    "  Q: How to list all models?\n",
    "  A: Visit the OpenRouter website to see the list of available models.\n",
    "     You can also use `magiccommand rank` to rank them by context length.\n",
    "\n",
    "  Q: How to change the default model?\n",
    "  A: Use the following environment variable: MAGICCOMMAND_OPENROUTER_MODEL\n",
    "     You will need to use the ID provided on the OpenRouter page for the model you want to use.",
);

#[derive(Parser, Debug)]
#[command(
    name = "magiccommand",
    author,
    version,
    about = "Turn a plain-language request into a ready-to-run shell command",
    disable_version_flag = true,
    after_help = FAQ
)]
pub struct Args {
    /// What you want to do, in plain words
    pub query: Vec<String>,

    /// Show more details when using commands
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Show installed version
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Rank available models by context length
    #[arg(short, long)]
    pub rank: bool,
}

/// What the invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Version,
    Help,
    Rank,
    /// `None` when no query words were given.
    Ask(Option<String>),
}

impl Mode {
    /// Version and help never read the config file.
    pub fn needs_config(&self) -> bool {
        matches!(self, Mode::Rank | Mode::Ask(_))
    }
}

impl Args {
    /// Flags win; otherwise a query made of a single keyword selects that mode.
    pub fn mode(&self) -> Mode {
        let keyword = match self.query.as_slice() {
            [word] => Some(word.as_str()),
            _ => None,
        };

        if self.version || matches!(keyword, Some("version" | "v")) {
            Mode::Version
        } else if matches!(keyword, Some("help" | "h")) {
            Mode::Help
        } else if self.rank || matches!(keyword, Some("rank" | "r")) {
            Mode::Rank
        } else {
            let query = self.query.join(" ");
            let query = query.trim();
            Mode::Ask((!query.is_empty()).then(|| query.to_string()))
        }
    }
}
