use crate::system::EnvironmentFacts;

const SYSTEM_PROMPT_FOR_COMMAND: &str = "You are a CLI assistant. You need to write the most optimized and complete \
command possible for the following user-provided query, including all relevant options.
Only output the final command, ready to copy-paste. No explanations, no extra text, no yapping. No markdown is \
ever allowed. You're forbidden to use any code block, neither code fences.
If there are multiple ways, pick the best one. Ignore any comments or explanations. Only output the final command \
and nothing else.
Make sure to respect user-configuration provided values as much as possible, when necessary: this means you should \
NOT use it when there is a better way, BUT, you should use it to open the best editor when you need to open one for \
example.
If the user is asking you a question, which CAN'T be resolved by only executing a command, you will be authorized \
to reply to it in a human-readable way, but, always, in a comment.
Reminder: ZERO TEXT ARE ALLOWED, at the exception of the final command and possibly a comment. You need to be \
absolutely sure that comment IS NECESSARY before adding it. Do not jump double lines, only one if needed.
Reminder: Comments are only allowed when necessary, and need to start by an hashtag (#), if you need to jump lines \
in your comment, you will use a new line AND an hashtag (#).
Reminder: NO COMMENT ARE ALLOWED, except if it is REALLY NECESSARY, you shouldn't use them in majority of cases.";

/// Builds the system prompt for the ask request. Optional facts that are not
/// set produce no line at all.
pub fn build_system_prompt(facts: &EnvironmentFacts) -> String {
    let mut lines = vec![
        format!("- OS: {} {}", facts.os_name, facts.os_arch),
        format!("- Version: {}", facts.os_version),
        format!("- Homedir: {}", facts.home_dir),
    ];

    let optional = [
        ("Terminal", &facts.terminal_program),
        ("Shell", &facts.shell),
        ("Editor", &facts.editor),
        ("Visual editor", &facts.visual_editor),
    ];
    lines.extend(
        optional
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("- {}: {}", label, v))),
    );

    format!(
        "{}\n\nUser-configuration:\n{}",
        SYSTEM_PROMPT_FOR_COMMAND,
        lines.join("\n")
    )
}
