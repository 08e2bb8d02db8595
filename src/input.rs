use crate::core::error::MagicError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Ask for the request interactively when none was given on the command line.
pub fn prompt_query() -> Result<String, MagicError> {
    let mut editor = DefaultEditor::new()?;
    let line = match editor.readline("Prompt: ") {
        Ok(line) => line,
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            return Err(MagicError::Input("Prompt cancelled".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    non_empty_query(&line)
}

fn non_empty_query(line: &str) -> Result<String, MagicError> {
    let query = line.trim();
    if query.is_empty() {
        return Err(MagicError::Input("No query provided".to_string()));
    }
    Ok(query.to_string())
}
