//! Line-oriented shell over a [`Roller`].
//!
//! One command per line:
//! - `roll <notation> [adv|dis|crit]...`
//! - `quick <die> [adv|dis|crit]...`
//! - `attack <weapon> [adv|dis|2h]...`
//! - `cast <spell> [adv|dis]...`
//! - `history [n]`, `help`, `quit`

use std::io::{self, BufRead, Write};
use thorvik_core::{
    format_error, get_spell, get_weapon, AttackOptions, CharacterProfile, DieType, RollPolicy,
    Roller,
};

/// What the shell should do after a line.
#[derive(Debug, PartialEq, Eq)]
pub enum LineResult {
    Continue,
    Quit,
}

pub fn run_shell(mut roller: Roller, character: CharacterProfile) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("=== Thorvik Roller ===");
    println!("Character: {} (level {})", character.name, character.level);
    println!("Type `help` for commands.");
    println!();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (output, result) = handle_line(&mut roller, &character, line);
        for text in output {
            writeln!(stdout, "{text}")?;
        }
        stdout.flush()?;
        if result == LineResult::Quit {
            break;
        }
    }
    Ok(())
}

/// Handle one line, returning the text to print.
pub fn handle_line(
    roller: &mut Roller,
    character: &CharacterProfile,
    line: &str,
) -> (Vec<String>, LineResult) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, rest)) = parts.split_first() else {
        return (Vec::new(), LineResult::Continue);
    };

    let output = match command {
        "quit" | "exit" => return (vec!["Goodbye!".to_string()], LineResult::Quit),
        "help" => help_text(),
        "roll" => {
            let (notation, flags) = split_name(rest);
            if notation.is_empty() {
                vec!["[ERROR] Usage: roll <notation> [adv|dis|crit]".to_string()]
            } else {
                let result = roller.roll(&notation, policy_from_flags(&flags));
                vec![thorvik_core::format_result(&result)]
            }
        }
        "quick" => match rest.split_first() {
            Some((die, flags)) => match die.parse::<DieType>() {
                Ok(die) => {
                    let result = roller.quick_roll(die, policy_from_flags(&flags.iter().map(|s| s.to_string()).collect::<Vec<_>>()));
                    vec![thorvik_core::format_result(&result)]
                }
                Err(e) => vec![format!("[ERROR] {e}")],
            },
            None => vec!["[ERROR] Usage: quick <die>".to_string()],
        },
        "attack" => {
            let (name, flags) = split_name(rest);
            if name.is_empty() {
                vec!["[ERROR] Usage: attack <weapon> [adv|dis|2h]".to_string()]
            } else if let Some(weapon) = get_weapon(&name) {
                match roller.weapon_attack(character, &weapon, options_from_flags(&flags)) {
                    Ok(outcome) => vec![outcome.summary()],
                    Err(e) => vec![format_error(&e)],
                }
            } else {
                vec![format!("[ERROR] Unknown weapon: {name}")]
            }
        }
        "cast" => {
            let (name, flags) = split_name(rest);
            if name.is_empty() {
                vec!["[ERROR] Usage: cast <spell> [adv|dis]".to_string()]
            } else if let Some(spell) = get_spell(&name) {
                match roller.spell_attack(character, &spell, options_from_flags(&flags)) {
                    Ok(outcome) => vec![outcome.summary()],
                    Err(e) => vec![format_error(&e)],
                }
            } else {
                vec![format!("[ERROR] Unknown spell: {name}")]
            }
        }
        "history" => {
            let limit = rest.first().and_then(|n| n.parse().ok()).unwrap_or(10);
            let records = roller.history().recent(limit);
            if records.is_empty() {
                vec!["No rolls yet.".to_string()]
            } else {
                records
                    .iter()
                    .map(|r| {
                        let source = r.source.as_deref().unwrap_or("-");
                        let damage = r.damage.map(|d| format!(", damage {d}")).unwrap_or_default();
                        let crit = if r.is_critical { " (critical)" } else { "" };
                        format!(
                            "[{}] {} {}: {} = {}{damage}{crit}",
                            r.timestamp.format("%H:%M:%S"),
                            r.roll_type,
                            source,
                            r.notation,
                            r.final_result
                        )
                    })
                    .collect()
            }
        }
        other => vec![format!("[ERROR] Unknown command: {other}")],
    };
    (output, LineResult::Continue)
}

const FLAGS: [&str; 8] = [
    "adv",
    "advantage",
    "dis",
    "disadvantage",
    "crit",
    "critical",
    "2h",
    "two-handed",
];

/// Split words into a name or notation (which may contain spaces) and
/// lowercased flags.
fn split_name(words: &[&str]) -> (String, Vec<String>) {
    let mut name = Vec::new();
    let mut flags = Vec::new();
    for word in words {
        let lower = word.to_lowercase();
        if FLAGS.contains(&lower.as_str()) {
            flags.push(lower);
        } else {
            name.push(*word);
        }
    }
    (name.join(" "), flags)
}

fn policy_from_flags(flags: &[String]) -> RollPolicy {
    let mut policy = RollPolicy::default();
    for flag in flags {
        match flag.as_str() {
            "adv" | "advantage" => policy.advantage = true,
            "dis" | "disadvantage" => policy.disadvantage = true,
            "crit" | "critical" => policy.critical = true,
            _ => {}
        }
    }
    policy
}

fn options_from_flags(flags: &[String]) -> AttackOptions {
    let policy = policy_from_flags(flags);
    AttackOptions {
        advantage: policy.advantage,
        disadvantage: policy.disadvantage,
        two_handed: flags.iter().any(|f| matches!(f.as_str(), "2h" | "two-handed")),
    }
}

fn help_text() -> Vec<String> {
    [
        "Commands:",
        "  roll <notation> [adv|dis|crit]  - Roll an expression like 2d6+1d4+5",
        "  quick <die> [adv|dis|crit]      - Roll one d4/d6/d8/d10/d12/d20/d100",
        "  attack <weapon> [adv|dis|2h]    - Weapon attack from the library",
        "  cast <spell> [adv|dis]          - Spell attack from the library",
        "  history [n]                     - Show the last n rolls",
        "  quit                            - Exit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
