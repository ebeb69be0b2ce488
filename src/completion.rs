//! # Shell Completion Module
//!
//! Completion scripts for the `moodify` command, generated by `clap_complete`.
//!
//! ```bash
//! moodify completion bash > ~/.local/share/bash-completion/completions/moodify
//! moodify completion fish > ~/.config/fish/completions/moodify.fish
//! ```

use crate::cli::Shell;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io::Write;

/// Write the completion script for `cmd` to `out`.
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, out);
}

/// Convert our Shell enum to clap_complete's Shell enum
#[must_use]
pub fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::CommandFactory;

    #[test]
    fn test_shell_conversion() {
        assert_eq!(shell_to_completion_shell(Shell::Bash), CompletionShell::Bash);
        assert_eq!(shell_to_completion_shell(Shell::Zsh), CompletionShell::Zsh);
        assert_eq!(shell_to_completion_shell(Shell::PowerShell), CompletionShell::PowerShell);
    }

    #[test]
    fn test_bash_script_mentions_subcommands() {
        let mut out = Vec::new();
        generate_completions(CompletionShell::Bash, &mut Args::command(), &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("moodify"));
        assert!(script.contains("history"));
        assert!(script.contains("completion"));
    }
}
