use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Print,
    Clipboard,
}

pub fn handle_output(text: &str, mode: OutputMode) -> Result<(), Error> {
    match mode {
        OutputMode::Print => {
            println!("{}", text);
        }
        OutputMode::Clipboard => {
            copy_to_clipboard(text)?;
            eprintln!("Embed snippet copied to clipboard");
        }
    }
    Ok(())
}

pub fn copy_to_clipboard(text: &str) -> Result<(), Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)?;
    tracing::info!(bytes = text.len(), "copied to clipboard");
    Ok(())
}
