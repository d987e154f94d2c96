//! Roll a handful of expressions and print the formatted results.
//!
//! Run with: `cargo run -p thorvik-core --example roll_demo`

use thorvik_core::{format_result, roll, RollPolicy};

fn main() {
    println!("=== Thorvik dice ===\n");

    show("1d20", RollPolicy::default(), "Basic d20");
    show("2d6+3", RollPolicy::default(), "2d6 with modifier");
    show("2d6+1d4+5", RollPolicy::default(), "Compound expression");
    show("8d6", RollPolicy::default(), "Fireball damage");
    show("1d8+3", RollPolicy::default().with_critical(true), "Critical longsword");
    show("1d20+5", RollPolicy::default().with_advantage(), "d20+5 with advantage");
    show("1d20+5", RollPolicy::default().with_disadvantage(), "d20+5 with disadvantage");
    show(
        "1d20",
        RollPolicy::default().with_advantage().with_disadvantage(),
        "Advantage and disadvantage cancel",
    );
    show("d20", RollPolicy::default(), "Missing count");
}

fn show(notation: &str, policy: RollPolicy, description: &str) {
    println!("{description}: {}", format_result(&roll(notation, policy)));
}
