use std::fs;
use std::path::Path;

use colored::Colorize;
use tf_chess::{ChessMatch, RulesConfig};

pub fn run(
    moves: &[String],
    file: Option<&Path>,
    strict_double_step: bool,
    teleport: bool,
) -> Result<(), String> {
    let mut lines = Vec::new();
    if let Some(path) = file {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        lines.extend(move_lines(&text));
    }
    lines.extend(moves.iter().map(|m| m.trim().to_string()));

    let config = RulesConfig::default()
        .with_clear_double_step(strict_double_step)
        .with_teleport(teleport);
    let mut game = ChessMatch::new(config);

    let mut rejected = 0;
    for line in &lines {
        match game.play_str(line) {
            Ok(result) if result.valid => {
                if let Some(record) = game.history().last() {
                    println!("  {} {record}", "ok".green().bold());
                }
                print_board(&game);
            }
            Ok(result) => {
                rejected += 1;
                let reason = result.reason().unwrap_or_default();
                println!("  {} {line}: {reason}", "illegal".yellow().bold());
            }
            Err(e) => {
                rejected += 1;
                println!("  {} {line}: {e}", "invalid".red().bold());
            }
        }
    }

    if game.history().is_empty() {
        print_board(&game);
    }
    println!(
        "  {} {}",
        game.state().to_string().bold(),
        format!(
            "({} applied, {rejected} rejected)",
            game.history().len()
        )
        .dimmed()
    );
    Ok(())
}

fn print_board(game: &ChessMatch) {
    println!();
    for row in game.board().render().lines() {
        println!("  {row}");
    }
    println!();
}

/// Move lines from a script: blank lines and `#` comments are skipped.
fn move_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_skip_comments_and_blanks() {
        let script = "# opening\ne2 e4\n\n  e7 e5  # reply\n";
        let lines: Vec<String> = move_lines(script).collect();
        assert_eq!(lines, vec!["e2 e4", "e7 e5"]);
    }
}
